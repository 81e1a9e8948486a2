use std::{
  borrow::Cow,
  io,
  path::{Path, PathBuf},
  sync::Arc,
};

use ember_common::{NormalizedCompilerOptions, ResolveKind};
use ember_fs::{FileMetadata, OxcResolverFileSystem};
use ember_plugin::{
  HookNoopReturn, HookResolveArgs, HookResolveOutput, HookResolveReturn, Plugin, PluginContext,
};
use oxc_resolver::{FsCache, ResolveError, ResolveOptions as OxcResolverOptions, ResolverGeneric};
use sugar_path::SugarPath;

use crate::types::SharedFileSystem;

#[inline]
fn is_http_url(s: &str) -> bool {
  s.starts_with("http://") || s.starts_with("https://") || s.starts_with("//")
}

#[inline]
fn is_data_url(s: &str) -> bool {
  s.trim_start().starts_with("data:")
}

#[inline]
fn is_path_like(specifier: &str) -> bool {
  specifier.starts_with("./") || specifier.starts_with("../") || Path::new(specifier).is_absolute()
}

/// Hands the shared file system to `oxc_resolver`, which needs an owned, sized one.
struct ResolverFileSystem(SharedFileSystem);

impl OxcResolverFileSystem for ResolverFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    self.0.read_to_string(path)
  }

  fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    self.0.metadata(path)
  }

  fn symlink_metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    self.0.symlink_metadata(path)
  }

  fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    self.0.read_link(path)
  }
}

type FsResolver = ResolverGeneric<FsCache<ResolverFileSystem>>;

/// Resolves specifiers against the file system with `oxc_resolver`, trying the configured
/// extensions, `index` files and `package.json` fields. `require` calls use the `require`
/// export conditions, everything else uses `import`.
pub struct FsResolvePlugin {
  root: PathBuf,
  import_resolver: FsResolver,
  require_resolver: FsResolver,
}

impl FsResolvePlugin {
  pub const NAME: &'static str = "ember:fs-resolve";

  pub fn new(fs: SharedFileSystem, options: &NormalizedCompilerOptions) -> Self {
    let import_options = OxcResolverOptions {
      main_fields: vec!["module".to_string(), "main".to_string()],
      condition_names: vec!["import".to_string(), "default".to_string()],
      extensions: options.extensions.iter().map(|ext| format!(".{ext}")).collect(),
      builtin_modules: false,
      ..Default::default()
    };
    let require_options = OxcResolverOptions {
      main_fields: vec!["main".to_string(), "module".to_string()],
      condition_names: vec!["require".to_string(), "default".to_string()],
      ..import_options.clone()
    };

    let import_resolver = ResolverGeneric::new_with_cache(
      Arc::new(FsCache::new(ResolverFileSystem(fs))),
      import_options,
    );
    let require_resolver = import_resolver.clone_with_options(require_options);

    Self { root: options.root.clone(), import_resolver, require_resolver }
  }

  fn resolve_path(
    &self,
    importer: Option<&Path>,
    specifier: &str,
    kind: &ResolveKind,
  ) -> Result<PathBuf, ResolveError> {
    let resolver = match kind {
      ResolveKind::Require => &self.require_resolver,
      _ => &self.import_resolver,
    };
    let dir = importer.and_then(Path::parent).unwrap_or(&self.root);

    let mut resolution = resolver.resolve(dir, specifier);
    if resolution.is_err() {
      // `/src/main.js` and entries without a leading `./` also name files under the root.
      let under_root = if Path::new(specifier).is_absolute() {
        Some(self.root.join(specifier.trim_start_matches('/')).normalize())
      } else if importer.is_none() && !is_path_like(specifier) {
        Some(self.root.join(specifier).normalize())
      } else {
        None
      };
      if let Some(under_root) = under_root {
        let fallback = resolver.resolve(dir, &under_root.to_slash_lossy());
        if fallback.is_ok() {
          resolution = fallback;
        }
      }
    }
    resolution.map(|resolution| resolution.path().to_path_buf())
  }
}

#[async_trait::async_trait]
impl Plugin for FsResolvePlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed(Self::NAME)
  }

  async fn build_start(&self, _ctx: &PluginContext) -> HookNoopReturn {
    // Files may have appeared or gone since the last build.
    self.import_resolver.clear_cache();
    Ok(())
  }

  async fn resolve(&self, _ctx: &PluginContext, args: &HookResolveArgs<'_>) -> HookResolveReturn {
    if is_http_url(args.source) || is_data_url(args.source) {
      return Ok(Some(HookResolveOutput::external(args.source)));
    }

    let (specifier, query) = args.source.split_once('?').unwrap_or((args.source, ""));
    match self.resolve_path(args.importer_path, specifier, args.kind) {
      Ok(path) => Ok(Some(HookResolveOutput {
        resolved_path: path.to_slash_lossy().into_owned(),
        query: query.to_string(),
        external: false,
        side_effects: None,
      })),
      Err(ResolveError::NotFound(_)) => Ok(None),
      Err(err) => Err(err.into()),
    }
  }
}
