use std::path::Path;

use ember_common::{ModuleId, ResolveKind};

#[derive(Debug, Clone)]
pub struct HookResolveArgs<'a> {
  /// The specifier as written in the importer.
  pub source: &'a str,
  pub importer: Option<&'a ModuleId>,
  /// Absolute resolved path of the importer, which importer filters match against.
  pub importer_path: Option<&'a Path>,
  pub kind: &'a ResolveKind,
  pub is_hmr: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookResolveOutput {
  /// Absolute path for modules, or the bare specifier for externals.
  pub resolved_path: String,
  /// Query or variant suffix, without the leading `?`.
  pub query: String,
  pub external: bool,
  pub side_effects: Option<bool>,
}

impl HookResolveOutput {
  pub fn new(resolved_path: impl Into<String>) -> Self {
    Self { resolved_path: resolved_path.into(), ..Default::default() }
  }

  pub fn external(specifier: impl Into<String>) -> Self {
    Self { resolved_path: specifier.into(), external: true, ..Default::default() }
  }

  pub fn module_id(&self, root: &Path) -> ModuleId {
    if self.external {
      ModuleId::external(&self.resolved_path)
    } else {
      ModuleId::new(&self.resolved_path, &self.query, root)
    }
  }
}
