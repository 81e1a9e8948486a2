use arcstr::ArcStr;
use ember_common::{ModuleGraph, Resource, ResourcePot};

#[derive(Debug)]
pub struct HookProcessResourcePotsArgs<'a> {
  pub resource_pots: &'a mut Vec<ResourcePot>,
  pub module_graph: &'a ModuleGraph,
}

#[derive(Debug, Clone, Copy)]
pub struct HookRenderResourcePotArgs<'a> {
  pub resource_pot: &'a ResourcePot,
  pub module_graph: &'a ModuleGraph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResourcePot {
  pub content: ArcStr,
  /// Serialized source map of `content`.
  pub source_map: Option<ArcStr>,
}

#[derive(Debug)]
pub struct HookGenerateResourcesArgs<'a> {
  pub resource_pot: &'a ResourcePot,
  pub rendered: &'a RenderedResourcePot,
  /// Resources generated so far for this pot. Plugins may add, rename or drop entries.
  pub resources: &'a mut Vec<Resource>,
}
