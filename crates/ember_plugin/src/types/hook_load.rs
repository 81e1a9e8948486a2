use arcstr::ArcStr;
use ember_common::{ModuleId, ModuleType};

#[derive(Debug, Clone)]
pub struct HookLoadArgs<'a> {
  pub id: &'a ModuleId,
  pub resolved_path: &'a str,
  pub query: &'a str,
  pub is_hmr: bool,
}

#[derive(Debug, Clone)]
pub struct HookLoadOutput {
  pub content: ArcStr,
  /// Falls back to the type implied by the file extension.
  pub module_type: Option<ModuleType>,
  pub source_map: Option<ArcStr>,
}

impl HookLoadOutput {
  pub fn new(content: impl Into<ArcStr>) -> Self {
    Self { content: content.into(), module_type: None, source_map: None }
  }

  #[must_use]
  pub fn with_module_type(mut self, module_type: ModuleType) -> Self {
    self.module_type = Some(module_type);
    self
  }
}
