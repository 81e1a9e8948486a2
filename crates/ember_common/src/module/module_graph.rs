use std::path::Path;

use arcstr::ArcStr;
use ember_utils::indexmap::FxIndexMap;
use petgraph::{
  stable_graph::{NodeIndex, StableDiGraph},
  visit::EdgeRef,
  Direction,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Module, ModuleGraphEdge, ModuleGraphEdgeDataItem, ModuleId};

/// Modules and the dependency edges between them. Cycles are allowed.
///
/// A published graph is never mutated. Incremental builds clone the published graph and mutate
/// the copy, which is then published as a whole.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
  g: StableDiGraph<Module, ModuleGraphEdge>,
  id_index_map: FxHashMap<ModuleId, NodeIndex>,
  /// Entry module -> entry name, in configuration order.
  pub entries: FxIndexMap<ModuleId, ArcStr>,
  pub generation: u64,
}

impl ModuleGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts `module`, or replaces the module with the same id while keeping its edges.
  /// Returns `true` if the module was not in the graph before.
  pub fn add_module(&mut self, module: Module) -> bool {
    if let Some(idx) = self.id_index_map.get(&module.id) {
      self.g[*idx] = module;
      return false;
    }
    let id = module.id.clone();
    let idx = self.g.add_node(module);
    self.id_index_map.insert(id, idx);
    true
  }

  pub fn remove_module(&mut self, id: &ModuleId) -> Option<Module> {
    let idx = self.id_index_map.remove(id)?;
    self.g.remove_node(idx)
  }

  pub fn has_module(&self, id: &ModuleId) -> bool {
    self.id_index_map.contains_key(id)
  }

  pub fn module(&self, id: &ModuleId) -> Option<&Module> {
    self.id_index_map.get(id).map(|idx| &self.g[*idx])
  }

  pub fn module_mut(&mut self, id: &ModuleId) -> Option<&mut Module> {
    self.id_index_map.get(id).map(|idx| &mut self.g[*idx])
  }

  pub fn modules(&self) -> impl Iterator<Item = &Module> {
    self.g.node_indices().map(|idx| &self.g[idx])
  }

  pub fn module_ids(&self) -> impl Iterator<Item = &ModuleId> {
    self.id_index_map.keys()
  }

  pub fn len(&self) -> usize {
    self.id_index_map.len()
  }

  pub fn is_empty(&self) -> bool {
    self.id_index_map.is_empty()
  }

  pub fn is_entry(&self, id: &ModuleId) -> bool {
    self.entries.contains_key(id)
  }

  /// Adds a dependency item to the edge `from -> to`. Both modules must be present.
  /// An item with the same `(source, kind)` as an existing one collapses into it.
  pub fn add_edge(
    &mut self,
    from: &ModuleId,
    to: &ModuleId,
    item: ModuleGraphEdgeDataItem,
  ) -> anyhow::Result<()> {
    let (Some(from_idx), Some(to_idx)) = (self.id_index_map.get(from), self.id_index_map.get(to))
    else {
      anyhow::bail!("Cannot add edge {from} -> {to}: both modules must be in the graph");
    };
    match self.g.find_edge(*from_idx, *to_idx) {
      Some(edge_idx) => {
        self.g[edge_idx].add_item(item);
      }
      None => {
        self.g.add_edge(*from_idx, *to_idx, ModuleGraphEdge::new(item));
      }
    }
    Ok(())
  }

  /// Drops every outgoing edge of `id`. Used before re-attaching the dependencies of a rebuilt
  /// module.
  pub fn remove_dependencies(&mut self, id: &ModuleId) {
    let Some(idx) = self.id_index_map.get(id) else { return };
    let edges = self.g.edges_directed(*idx, Direction::Outgoing).map(|e| e.id()).collect::<Vec<_>>();
    for edge in edges {
      self.g.remove_edge(edge);
    }
  }

  pub fn edge(&self, from: &ModuleId, to: &ModuleId) -> Option<&ModuleGraphEdge> {
    let edge_idx = self.g.find_edge(*self.id_index_map.get(from)?, *self.id_index_map.get(to)?)?;
    self.g.edge_weight(edge_idx)
  }

  /// Dependencies of `id`, in the order they were reported by dependency analysis.
  pub fn dependencies(&self, id: &ModuleId) -> Vec<(&ModuleId, &ModuleGraphEdge)> {
    let Some(idx) = self.id_index_map.get(id) else { return vec![] };
    let mut deps = self
      .g
      .edges_directed(*idx, Direction::Outgoing)
      .map(|e| (&self.g[e.target()].id, e.weight()))
      .collect::<Vec<_>>();
    deps.sort_by(|(a_id, a), (b_id, b)| a.order().cmp(&b.order()).then_with(|| a_id.cmp(b_id)));
    deps
  }

  pub fn dependency_ids(&self, id: &ModuleId) -> Vec<ModuleId> {
    self.dependencies(id).into_iter().map(|(id, _)| id.clone()).collect()
  }

  /// Importers of `id`, sorted by id.
  pub fn dependents(&self, id: &ModuleId) -> Vec<(&ModuleId, &ModuleGraphEdge)> {
    let Some(idx) = self.id_index_map.get(id) else { return vec![] };
    let mut dependents = self
      .g
      .edges_directed(*idx, Direction::Incoming)
      .map(|e| (&self.g[e.source()].id, e.weight()))
      .collect::<Vec<_>>();
    dependents.sort_by(|(a, _), (b, _)| a.cmp(b));
    dependents
  }

  pub fn dependent_ids(&self, id: &ModuleId) -> Vec<ModuleId> {
    self.dependents(id).into_iter().map(|(id, _)| id.clone()).collect()
  }

  /// Modules reachable from any entry over any edge.
  pub fn reachable_from_entries(&self) -> FxHashSet<ModuleId> {
    let mut visited = FxHashSet::default();
    let mut stack =
      self.entries.keys().filter_map(|id| self.id_index_map.get(id).copied()).collect::<Vec<_>>();
    while let Some(idx) = stack.pop() {
      if !visited.insert(self.g[idx].id.clone()) {
        continue;
      }
      stack.extend(
        self
          .g
          .neighbors_directed(idx, Direction::Outgoing)
          .filter(|dep| !visited.contains(&self.g[*dep].id)),
      );
    }
    visited
  }

  /// Removes modules that are no longer reachable from an entry and returns them.
  pub fn remove_unreachable(&mut self) -> Vec<Module> {
    let reachable = self.reachable_from_entries();
    let mut unreachable =
      self.module_ids().filter(|id| !reachable.contains(*id)).cloned().collect::<Vec<_>>();
    unreachable.sort();
    unreachable.into_iter().filter_map(|id| self.remove_module(&id)).collect()
  }

  /// Every module in a deterministic order: depth-first preorder from the entries in
  /// configuration order, following dependencies in analysis order. Modules not reachable from
  /// an entry come last, sorted by id.
  pub fn sorted_modules(&self) -> Vec<ModuleId> {
    let mut visited = FxHashSet::default();
    let mut sorted = Vec::with_capacity(self.len());

    for entry in self.entries.keys() {
      let mut stack = vec![entry];
      while let Some(id) = stack.pop() {
        if !self.has_module(id) || !visited.insert(id.clone()) {
          continue;
        }
        sorted.push(id.clone());
        stack.extend(self.dependencies(id).into_iter().rev().map(|(dep, _)| dep));
      }
    }

    let mut rest = self.module_ids().filter(|id| !visited.contains(*id)).cloned().collect::<Vec<_>>();
    rest.sort();
    sorted.extend(rest);
    sorted
  }

  /// Ids of the modules whose resolved path is `path`, whatever their query.
  pub fn module_ids_by_resolved_path(&self, path: &Path, root: &Path) -> Vec<ModuleId> {
    let mut ids = self
      .modules()
      .filter(|module| !module.external && module.id.resolved_path(root) == path)
      .map(|module| module.id.clone())
      .collect::<Vec<_>>();
    ids.sort();
    ids
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ModuleType, ResolveKind};

  fn item(source: &str, order: usize) -> ModuleGraphEdgeDataItem {
    ModuleGraphEdgeDataItem { source: source.into(), kind: ResolveKind::Import, order, hmr_accepted: false }
  }

  fn graph(edges: &[(&str, &str)]) -> ModuleGraph {
    let mut graph = ModuleGraph::new();
    for (from, to) in edges {
      for id in [from, to] {
        graph.add_module(Module::new((*id).into(), ModuleType::Js));
      }
    }
    for (order, (from, to)) in edges.iter().enumerate() {
      graph.add_edge(&(*from).into(), &(*to).into(), item(to, order)).unwrap();
    }
    graph.entries.insert("index.js".into(), "index".into());
    graph
  }

  #[test]
  fn sorted_modules_follow_analysis_order_through_cycles() {
    let graph = graph(&[("index.js", "b.js"), ("index.js", "a.js"), ("a.js", "index.js"), ("b.js", "c.js")]);

    let sorted = graph.sorted_modules();
    assert_eq!(sorted, vec!["index.js".into(), "b.js".into(), "c.js".into(), "a.js".into()]);
  }

  #[test]
  fn remove_unreachable_after_dropping_the_only_importer() {
    let mut graph = graph(&[("index.js", "a.js"), ("a.js", "m.js")]);

    graph.remove_dependencies(&"index.js".into());
    let removed = graph.remove_unreachable().into_iter().map(|m| m.id).collect::<Vec<_>>();

    assert_eq!(removed, vec![ModuleId::from("a.js"), ModuleId::from("m.js")]);
    assert!(!graph.has_module(&"m.js".into()));
    assert_eq!(graph.len(), 1);
  }

  #[test]
  fn replacing_a_module_keeps_its_edges() {
    let mut graph = graph(&[("index.js", "a.js")]);
    let mut module = Module::new("a.js".into(), ModuleType::Ts);
    module.content_hash = "changed".into();

    assert!(!graph.add_module(module));
    assert_eq!(graph.dependent_ids(&"a.js".into()), vec![ModuleId::from("index.js")]);
    assert_eq!(graph.module(&"a.js".into()).unwrap().module_type, ModuleType::Ts);
  }

  #[test]
  fn clones_are_independent_snapshots() {
    let published = graph(&[("index.js", "a.js")]);
    let mut next = published.clone();
    next.remove_module(&"a.js".into());

    assert!(published.has_module(&"a.js".into()));
    assert!(!next.has_module(&"a.js".into()));
  }
}
