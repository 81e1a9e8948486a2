use ember_common::{
  CompilerOptions, EnforceResource, FilenameTemplate, NormalizedCompilerOptions,
};
use ember_error::CompileError;
use regex::Regex;
use sugar_path::SugarPath;

fn compile_patterns(option: &str, patterns: Vec<String>) -> Result<Vec<Regex>, CompileError> {
  patterns
    .into_iter()
    .map(|pattern| {
      Regex::new(&pattern)
        .map_err(|err| CompileError::config(format!("`{option}` has an invalid pattern: {err}")))
    })
    .collect()
}

pub fn normalize_options(raw_options: CompilerOptions) -> Result<NormalizedCompilerOptions, CompileError> {
  let defaults = NormalizedCompilerOptions::default();

  let input = raw_options.input.unwrap_or_default();
  if input.is_empty() {
    return Err(CompileError::config("`input` must contain at least one entry"));
  }

  let root = match raw_options.root {
    Some(root) if root.is_absolute() => root.normalize(),
    Some(root) => root.absolutize(),
    None => std::env::current_dir()
      .map_err(|err| CompileError::config(format!("Failed to read the current dir: {err}")))?,
  };

  let concurrency = raw_options.concurrency.unwrap_or(defaults.concurrency);
  if concurrency == 0 {
    return Err(CompileError::config("`concurrency` must be greater than 0"));
  }

  let partial_bundling = raw_options.partial_bundling.unwrap_or_default();
  let enforce_resources = partial_bundling
    .enforce_resources
    .unwrap_or_default()
    .into_iter()
    .map(|resource| {
      Ok(EnforceResource {
        test: compile_patterns("partialBundling.enforceResources", resource.test)?,
        name: resource.name,
      })
    })
    .collect::<Result<Vec<_>, CompileError>>()?;
  let immutable_modules = compile_patterns(
    "partialBundling.immutableModules",
    partial_bundling.immutable_modules.unwrap_or_else(|| vec!["node_modules/".to_string()]),
  )?;

  let extensions = raw_options
    .resolve
    .and_then(|resolve| resolve.extensions)
    .map(|extensions| {
      extensions.into_iter().map(|ext| ext.trim_start_matches('.').to_string()).collect()
    })
    .unwrap_or(defaults.extensions);

  let filename = raw_options
    .output
    .and_then(|output| output.filename)
    .map_or(defaults.filename, FilenameTemplate::new);

  Ok(NormalizedCompilerOptions {
    input,
    root,
    concurrency,
    module_error_policy: raw_options.module_error_policy.unwrap_or_default(),
    external: compile_patterns("external", raw_options.external.unwrap_or_default())?,
    extensions,
    enforce_resources,
    immutable_modules,
    filename,
    sourcemap: raw_options.sourcemap.unwrap_or(defaults.sourcemap),
    builtin_plugins: raw_options.builtin_plugins.unwrap_or(defaults.builtin_plugins),
  })
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use ember_common::ModuleErrorPolicy;

  use super::*;

  fn options(value: serde_json::Value) -> CompilerOptions {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn fills_in_defaults() {
    let normalized =
      normalize_options(options(serde_json::json!({ "input": { "index": "./index.html" }, "root": "/app" })))
        .unwrap();

    assert_eq!(normalized.root, PathBuf::from("/app"));
    assert_eq!(normalized.module_error_policy, ModuleErrorPolicy::Abort);
    assert!(normalized.is_immutable("node_modules/lodash/index.js"));
    assert_eq!(normalized.filename.template(), "[resourceName].[ext]");
    assert!(normalized.sourcemap && normalized.builtin_plugins);
  }

  #[test]
  fn rejects_bad_shapes() {
    let no_input = normalize_options(options(serde_json::json!({ "root": "/app" })));
    assert!(matches!(no_input, Err(CompileError::Config { .. })));

    let bad_regex = normalize_options(options(serde_json::json!({
      "input": { "index": "./index.js" },
      "external": ["(unclosed"],
    })));
    assert!(matches!(bad_regex, Err(CompileError::Config { message }) if message.contains("external")));

    let zero = normalize_options(options(serde_json::json!({
      "input": { "index": "./index.js" },
      "concurrency": 0,
    })));
    assert!(zero.is_err());
  }
}
