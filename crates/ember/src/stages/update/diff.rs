use ember_common::{ModuleGraph, ModuleId};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ModuleGraphDiff {
  pub added: Vec<ModuleId>,
  pub changed: Vec<ModuleId>,
  pub removed: Vec<ModuleId>,
  /// Modules present in both graphs whose outgoing edges differ.
  pub dependencies_changed: Vec<ModuleId>,
}

/// Compares two graphs by module identity and content hash. All lists are sorted by id.
pub fn diff_module_graphs(prev: &ModuleGraph, next: &ModuleGraph) -> ModuleGraphDiff {
  let mut diff = ModuleGraphDiff::default();

  for module in next.modules() {
    let Some(prev_module) = prev.module(&module.id) else {
      diff.added.push(module.id.clone());
      continue;
    };
    if prev_module.content_hash != module.content_hash
      || prev_module.external != module.external
      || prev_module.error != module.error
    {
      diff.changed.push(module.id.clone());
    }
    if prev.dependencies(&module.id) != next.dependencies(&module.id) {
      diff.dependencies_changed.push(module.id.clone());
    }
  }
  diff.removed = prev.module_ids().filter(|id| !next.has_module(id)).cloned().collect();

  diff.added.sort();
  diff.changed.sort();
  diff.removed.sort();
  diff.dependencies_changed.sort();
  diff
}
