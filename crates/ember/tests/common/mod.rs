//! Shared fixtures for the compiler integration tests: an in-memory project and a couple of
//! tiny plugins standing in for real language support.

#![allow(dead_code)]

use std::{
  borrow::Cow,
  sync::{Arc, LazyLock},
};

use ember::{
  Compiler, CompilerOptions, HookAnalyzeDepsArgs, HookNoopReturn, HookTransformArgs,
  HookTransformOutput, HookTransformReturn, MemoryFileSystem, ModuleType, Plugin, PluginContext,
  ResolveKind, SharedPlugin, TransformHookFilter,
};
use regex::Regex;

pub const ROOT: &str = "/project";

pub fn path(relative: &str) -> String {
  format!("{ROOT}/{relative}")
}

pub fn project(files: &[(&str, &str)]) -> Arc<MemoryFileSystem> {
  let fs = MemoryFileSystem::new();
  for (relative, content) in files {
    fs.write(path(relative), content);
  }
  Arc::new(fs)
}

/// A compiler over `fs` with the analyze and less plugins registered in front of `plugins`.
pub fn compiler(
  fs: &Arc<MemoryFileSystem>,
  config: serde_json::Value,
  plugins: Vec<SharedPlugin>,
) -> Compiler {
  init_tracing();
  let mut config = config;
  config["root"] = serde_json::Value::from(ROOT);
  let options: CompilerOptions = serde_json::from_value(config).unwrap();
  Compiler::builder(options)
    .plugins(plugins)
    .plugin(Arc::new(LessPlugin))
    .plugin(Arc::new(AnalyzePlugin))
    .file_system(Arc::clone(fs) as _)
    .build()
    .unwrap()
}

/// `RUST_LOG=ember=debug cargo test` shows the compiler logs next to a failing test.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

pub fn resource_text(compiler: &Compiler, name: &str) -> String {
  let bytes = compiler.resource(name).unwrap_or_else(|| panic!("missing resource {name}"));
  String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn ids<T: ToString>(ids: &[T]) -> Vec<String> {
  ids.iter().map(ToString::to_string).collect()
}

static STATIC_IMPORT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?m)^\s*import\s+(?:[\w{}*,\s]+\s+from\s+)?["']([^"']+)["']"#).unwrap());
static DYNAMIC_IMPORT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"import\(\s*["']([^"']+)["']\s*\)"#).unwrap());
static CSS_IMPORT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?m)^\s*@import\s+["']([^"']+)["']"#).unwrap());
static SCRIPT_SRC: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"<script[^>]*\ssrc=["']([^"']+)["']"#).unwrap());
static LINK_HREF: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"<link[^>]*\shref=["']([^"']+)["']"#).unwrap());
static ACCEPT_DEP: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"hot\.accept\(\s*["']([^"']+)["']\s*\)"#).unwrap());
static ACCEPT_SELF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"hot\.accept\(\s*\)").unwrap());

/// Finds dependencies with a handful of regexes. `hot.accept()` marks the module as accepting
/// its own updates and `hot.accept("./dep")` marks the edge to `./dep`.
pub struct AnalyzePlugin;

#[async_trait::async_trait]
impl Plugin for AnalyzePlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("test:analyze")
  }

  async fn analyze_deps(
    &self,
    _ctx: &PluginContext,
    args: &mut HookAnalyzeDepsArgs<'_>,
  ) -> HookNoopReturn {
    let content = args.content.clone();
    let patterns: [(&Regex, ResolveKind); 5] = [
      (&SCRIPT_SRC, ResolveKind::ScriptSrc),
      (&LINK_HREF, ResolveKind::LinkHref),
      (&CSS_IMPORT, ResolveKind::CssAtImport),
      (&STATIC_IMPORT, ResolveKind::Import),
      (&DYNAMIC_IMPORT, ResolveKind::DynamicImport),
    ];
    for (regex, kind) in patterns {
      for captures in regex.captures_iter(&content) {
        args.add_dep(&captures[1], kind.clone());
      }
    }
    for captures in ACCEPT_DEP.captures_iter(&content) {
      args.push(
        ember::AnalyzedDependency::new(&captures[1], ResolveKind::Import).with_hmr_accepted(true),
      );
    }
    args.hmr_self_accepted |= ACCEPT_SELF.is_match(&content);
    Ok(())
  }
}

/// Turns `.less` modules into css by stripping `//` comment lines.
pub struct LessPlugin;

#[async_trait::async_trait]
impl Plugin for LessPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("test:less")
  }

  fn transform_filter(&self) -> Option<TransformHookFilter> {
    TransformHookFilter::new(&[r"\.less$"], vec![]).ok()
  }

  async fn transform(&self, _ctx: &PluginContext, args: &HookTransformArgs<'_>) -> HookTransformReturn {
    let css = args
      .content
      .lines()
      .filter(|line| !line.trim_start().starts_with("//"))
      .collect::<Vec<_>>()
      .join("\n");
    let mut output = HookTransformOutput::new(css);
    output.module_type = Some(ModuleType::Css);
    Ok(Some(output))
  }
}
