use arcstr::ArcStr;

use crate::ResolveKind;

/// A dependency reported by an `analyze_deps` hook, before it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalyzedDependency {
  pub source: ArcStr,
  pub kind: ResolveKind,
  /// The importer declares it handles hot updates of this dependency itself.
  pub hmr_accepted: bool,
}

impl AnalyzedDependency {
  pub fn new(source: impl Into<ArcStr>, kind: ResolveKind) -> Self {
    Self { source: source.into(), kind, hmr_accepted: false }
  }

  #[must_use]
  pub fn with_hmr_accepted(mut self, hmr_accepted: bool) -> Self {
    self.hmr_accepted = hmr_accepted;
    self
  }
}
