use ember_common::{DynamicResourcesMap, ModuleGraph, Resource, ResourcePot, WatchGraph};
use ember_utils::indexmap::FxIndexMap;

use crate::stages::generate::RenderCache;

/// One published, internally consistent state of the compiler. Never mutated after it is
/// published; the next build produces a new one.
#[derive(Debug, Default)]
pub struct Generation {
  pub module_graph: ModuleGraph,
  pub resource_pots: Vec<ResourcePot>,
  pub resources: FxIndexMap<String, Resource>,
  pub render_cache: RenderCache,
  pub watch_graph: WatchGraph,
  pub dynamic_resources_map: DynamicResourcesMap,
}

impl Generation {
  pub fn number(&self) -> u64 {
    self.module_graph.generation
  }
}
