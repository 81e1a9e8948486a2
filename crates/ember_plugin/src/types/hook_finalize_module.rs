use ember_common::{AnalyzedDependency, Module};

#[derive(Debug)]
pub struct HookFinalizeModuleArgs<'a> {
  pub module: &'a mut Module,
  pub deps: &'a [AnalyzedDependency],
  pub is_hmr: bool,
}
