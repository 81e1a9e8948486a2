use ember_common::{DynamicResourcesMap, ModuleGraph, ModuleId, ResourcePot};
use rustc_hash::{FxHashMap, FxHashSet};

/// For every pot, the pots that a dynamic import from one of its members pulls in: the pot of
/// the imported module and of everything that module reaches statically.
pub fn compute_dynamic_resources_map(
  module_graph: &ModuleGraph,
  resource_pots: &[ResourcePot],
) -> DynamicResourcesMap {
  let pot_of = resource_pots
    .iter()
    .flat_map(|pot| pot.modules.iter().map(move |id| (id, pot.id.as_str())))
    .collect::<FxHashMap<&ModuleId, &str>>();

  let mut map = DynamicResourcesMap::default();
  for pot in resource_pots {
    let mut reached = FxHashSet::default();
    for id in &pot.modules {
      for (dep, edge) in module_graph.dependencies(id) {
        if !edge.is_dynamic() {
          continue;
        }
        let mut stack = vec![dep];
        let mut visited = FxHashSet::default();
        while let Some(id) = stack.pop() {
          if !visited.insert(id) {
            continue;
          }
          if let Some(target) = pot_of.get(id) {
            reached.insert(*target);
          }
          stack.extend(
            module_graph.dependencies(id).into_iter().filter(|(_, e)| e.is_static()).map(|(d, _)| d),
          );
        }
      }
    }
    reached.remove(pot.id.as_str());
    if !reached.is_empty() {
      let mut reached = reached.into_iter().map(ToString::to_string).collect::<Vec<_>>();
      reached.sort();
      map.insert(pot.id.to_string(), reached);
    }
  }
  map
}
