use ember_common::{AnalyzedDependency, Module, ModuleId};
use ember_plugin::HookResolveOutput;

pub struct ResolvedDependency {
  pub dep: AnalyzedDependency,
  /// Position in the importer's dependency list.
  pub order: usize,
  pub resolved: HookResolveOutput,
}

pub struct ModuleTaskResult {
  pub module: Module,
  pub deps: Vec<ResolvedDependency>,
  pub warnings: Vec<anyhow::Error>,
}

pub enum ModuleLoaderMsg {
  ModuleDone(Box<ModuleTaskResult>),
  BuildErrors { id: ModuleId, errors: Vec<anyhow::Error> },
}
