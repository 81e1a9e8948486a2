use ember_common::{ModuleGraph, ModuleId};
use rustc_hash::FxHashSet;

use super::diff::ModuleGraphDiff;

/// Splits the modules of `module_graph` into `(immutable, mutable)`. A module is mutable when it
/// was added or changed, its edges changed, or it transitively imports such a module. Both lists
/// are sorted by id.
pub fn partition_by_mutability(
  module_graph: &ModuleGraph,
  diff: &ModuleGraphDiff,
) -> (Vec<ModuleId>, Vec<ModuleId>) {
  let mut mutable = FxHashSet::default();
  let mut stack = diff
    .added
    .iter()
    .chain(&diff.changed)
    .chain(&diff.dependencies_changed)
    .filter(|id| module_graph.has_module(id))
    .collect::<Vec<_>>();

  while let Some(id) = stack.pop() {
    if !mutable.insert(id) {
      continue;
    }
    stack.extend(module_graph.dependents(id).into_iter().map(|(importer, _)| importer));
  }

  let (mut mutable_modules, mut immutable_modules): (Vec<_>, Vec<_>) =
    module_graph.module_ids().cloned().partition(|id| mutable.contains(id));
  immutable_modules.sort();
  mutable_modules.sort();
  (immutable_modules, mutable_modules)
}
