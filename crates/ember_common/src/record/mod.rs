pub mod record_manager;

use arcstr::ArcStr;

use crate::{AnalyzedDependency, ModuleId, ModuleType, ResolveKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRecord {
  pub plugin: String,
  pub hook: String,
  pub source: String,
  pub importer: Option<ModuleId>,
  pub kind: ResolveKind,
  pub is_hmr: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRecord {
  pub plugin: String,
  pub hook: String,
  /// Content produced by this transform step.
  pub content: ArcStr,
  pub source_map: Option<ArcStr>,
  pub module_type: ModuleType,
  pub is_hmr: bool,
}

/// Load and finalize steps, which change the module without producing new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
  pub plugin: String,
  pub hook: String,
  pub module_type: ModuleType,
  pub is_hmr: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeDepsRecord {
  pub plugin: String,
  pub hook: String,
  pub module_type: ModuleType,
  pub deps: Vec<AnalyzedDependency>,
  pub is_hmr: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePotRecord {
  /// The partition policy or plugin that produced or rewrote the pot.
  pub name: String,
  pub hook: String,
  pub resource_pot: ArcStr,
  pub modules: Vec<ModuleId>,
  pub resources: Vec<String>,
  pub is_hmr: bool,
}

/// Every record appended for one id, in invocation order per kind.
#[derive(Debug, Clone, Default)]
pub struct ModuleRecords {
  pub resolve: Vec<ResolveRecord>,
  pub transform: Vec<TransformRecord>,
  pub process: Vec<ProcessRecord>,
  pub analyze_deps: Vec<AnalyzeDepsRecord>,
  pub resource_pot: Vec<ResourcePotRecord>,
}

impl ModuleRecords {
  fn append(&mut self, other: Self) {
    self.resolve.extend(other.resolve);
    self.transform.extend(other.transform);
    self.process.extend(other.process);
    self.analyze_deps.extend(other.analyze_deps);
    self.resource_pot.extend(other.resource_pot);
  }
}
