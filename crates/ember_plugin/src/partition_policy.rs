use ember_common::{ModuleGraph, NormalizedCompilerOptions, ResourcePot};

/// Splits a module graph into resource pots.
///
/// Implementations must be a pure function of the graph and the options: the same input has to
/// produce the same pots with the same members in the same order. Every non-external module
/// must end up in exactly one pot.
pub trait PartitionPolicy: Send + Sync {
  fn name(&self) -> &str;

  fn partition(
    &self,
    module_graph: &ModuleGraph,
    options: &NormalizedCompilerOptions,
  ) -> anyhow::Result<Vec<ResourcePot>>;
}
