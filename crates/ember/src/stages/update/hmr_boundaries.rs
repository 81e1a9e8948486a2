use ember_common::{HmrBoundaries, ModuleGraph, ModuleId};

/// For every changed module, the importer chains along which the update propagates. A chain
/// starts at the changed module and ends at the first module that accepts it: a module marked
/// as hmr-accepting, or an importer whose edge to the previous link accepts it. A chain ending at
/// an entry that does not accept the update means the page has to reload, which is reported as
/// the second value.
pub fn compute_hmr_boundaries(
  module_graph: &ModuleGraph,
  changed: &[ModuleId],
) -> (HmrBoundaries, bool) {
  let mut boundaries = HmrBoundaries::default();
  let mut reload_required = false;

  for id in changed {
    let Some(module) = module_graph.module(id) else { continue };
    let mut chains = vec![];
    if module.hmr_accepted {
      chains.push(vec![id.clone()]);
    } else {
      let mut path = vec![id.clone()];
      reload_required |= walk(module_graph, &mut path, &mut chains);
    }
    boundaries.insert(id.clone(), chains);
  }

  (boundaries, reload_required)
}

/// Depth-first over the importers of the last module in `path`. Every distinct importer path is
/// followed up to its boundary, so each module that re-executes shows up in some chain. An
/// importer already on `path` closes a cycle and is skipped.
fn walk(
  module_graph: &ModuleGraph,
  path: &mut Vec<ModuleId>,
  chains: &mut Vec<Vec<ModuleId>>,
) -> bool {
  let Some(current) = path.last().cloned() else { return false };
  let dependents = module_graph.dependents(&current);
  if dependents.is_empty() {
    chains.push(path.clone());
    return true;
  }

  let mut reload_required = false;
  for (importer, edge) in dependents {
    if path.contains(importer) {
      continue;
    }
    path.push(importer.clone());
    let accepted =
      edge.hmr_accepted() || module_graph.module(importer).is_some_and(|module| module.hmr_accepted);
    if accepted {
      chains.push(path.clone());
    } else if module_graph.is_entry(importer) {
      chains.push(path.clone());
      reload_required = true;
    } else {
      reload_required |= walk(module_graph, path, chains);
    }
    path.pop();
  }
  reload_required
}

#[cfg(test)]
mod tests {
  use ember_common::{Module, ModuleGraphEdgeDataItem, ModuleType, ResolveKind};

  use super::*;

  fn ids(chain: &[&str]) -> Vec<ModuleId> {
    chain.iter().map(|id| ModuleId::from(*id)).collect()
  }

  fn chain_graph(accepting: &str) -> ModuleGraph {
    let mut graph = ModuleGraph::new();
    for id in ["entry.js", "a.js", "b.js", "c.js"] {
      let mut module = Module::new(id.into(), ModuleType::Js);
      module.hmr_accepted = id == accepting;
      graph.add_module(module);
    }
    graph.entries.insert("entry.js".into(), "entry".into());
    for (from, to) in [("entry.js", "a.js"), ("a.js", "b.js"), ("b.js", "c.js")] {
      let item = ModuleGraphEdgeDataItem {
        source: to.into(),
        kind: ResolveKind::Import,
        order: 0,
        hmr_accepted: false,
      };
      graph.add_edge(&from.into(), &to.into(), item).unwrap();
    }
    graph
  }

  #[test]
  fn stops_at_accepting_module() {
    let graph = chain_graph("b.js");
    let (boundaries, reload_required) = compute_hmr_boundaries(&graph, &ids(&["c.js"]));
    assert_eq!(boundaries[&ModuleId::from("c.js")], vec![ids(&["c.js", "b.js"])]);
    assert!(!reload_required);
  }

  #[test]
  fn reaching_an_entry_requires_reload() {
    let graph = chain_graph("none");
    let (boundaries, reload_required) = compute_hmr_boundaries(&graph, &ids(&["c.js"]));
    assert_eq!(
      boundaries[&ModuleId::from("c.js")],
      vec![ids(&["c.js", "b.js", "a.js", "entry.js"])]
    );
    assert!(reload_required);
  }

  #[test]
  fn every_importer_path_gets_a_chain() {
    let mut graph = ModuleGraph::new();
    for id in ["entry.js", "x.js", "b1.js", "b2.js", "c.js"] {
      let mut module = Module::new(id.into(), ModuleType::Js);
      module.hmr_accepted = id == "x.js";
      graph.add_module(module);
    }
    graph.entries.insert("entry.js".into(), "entry".into());
    let edges = [
      ("entry.js", "x.js"),
      ("x.js", "b1.js"),
      ("x.js", "b2.js"),
      ("b1.js", "c.js"),
      ("b2.js", "c.js"),
    ];
    for (order, (from, to)) in edges.into_iter().enumerate() {
      let item = ModuleGraphEdgeDataItem {
        source: to.into(),
        kind: ResolveKind::Import,
        order,
        hmr_accepted: false,
      };
      graph.add_edge(&from.into(), &to.into(), item).unwrap();
    }

    let (boundaries, reload_required) = compute_hmr_boundaries(&graph, &ids(&["c.js"]));
    let mut chains = boundaries[&ModuleId::from("c.js")].clone();
    chains.sort();
    assert_eq!(chains, vec![ids(&["c.js", "b1.js", "x.js"]), ids(&["c.js", "b2.js", "x.js"])]);
    assert!(!reload_required);
  }

  #[test]
  fn self_accepting_module_is_its_own_boundary() {
    let graph = chain_graph("c.js");
    let (boundaries, reload_required) = compute_hmr_boundaries(&graph, &ids(&["c.js"]));
    assert_eq!(boundaries[&ModuleId::from("c.js")], vec![ids(&["c.js"])]);
    assert!(!reload_required);
  }
}
