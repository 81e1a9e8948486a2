use arcstr::ArcStr;
use ember_common::{AnalyzedDependency, ModuleId, ModuleType, ResolveKind};

#[derive(Debug)]
pub struct HookAnalyzeDepsArgs<'a> {
  pub id: &'a ModuleId,
  pub content: &'a ArcStr,
  pub module_type: &'a ModuleType,
  pub is_hmr: bool,
  /// Accumulated across plugins, in the order the importer requests them.
  pub deps: Vec<AnalyzedDependency>,
  /// Set by a plugin when the module accepts its own hot updates.
  pub hmr_self_accepted: bool,
}

impl HookAnalyzeDepsArgs<'_> {
  /// Appends a dependency unless the same `(source, kind)` pair was already reported.
  pub fn add_dep(&mut self, source: impl Into<ArcStr>, kind: ResolveKind) {
    self.push(AnalyzedDependency::new(source, kind));
  }

  pub fn push(&mut self, dep: AnalyzedDependency) {
    if let Some(existing) =
      self.deps.iter_mut().find(|existing| existing.source == dep.source && existing.kind == dep.kind)
    {
      existing.hmr_accepted |= dep.hmr_accepted;
    } else {
      self.deps.push(dep);
    }
  }
}
