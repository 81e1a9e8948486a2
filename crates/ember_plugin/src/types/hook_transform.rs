use arcstr::ArcStr;
use ember_common::{ModuleId, ModuleType};

#[derive(Debug, Clone)]
pub struct HookTransformArgs<'a> {
  pub id: &'a ModuleId,
  pub resolved_path: &'a str,
  pub content: &'a ArcStr,
  pub module_type: &'a ModuleType,
  /// Source maps produced by earlier transform steps, oldest first.
  pub source_map_chain: &'a [ArcStr],
  pub is_hmr: bool,
}

#[derive(Debug, Clone)]
pub struct HookTransformOutput {
  pub content: ArcStr,
  pub source_map: Option<ArcStr>,
  /// A transform may change the module type, e.g. from `less` to `css`.
  pub module_type: Option<ModuleType>,
}

impl HookTransformOutput {
  pub fn new(content: impl Into<ArcStr>) -> Self {
    Self { content: content.into(), source_map: None, module_type: None }
  }
}
