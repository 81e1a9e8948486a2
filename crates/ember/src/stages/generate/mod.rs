mod dynamic_resources;
mod partition;
mod render_resource_pot;

use arcstr::ArcStr;
use ember_common::{DynamicResourcesMap, ModuleGraph, Resource, ResourcePot};
use ember_error::BuildResult;
use ember_plugin::{HookProcessResourcePotsArgs, PartitionPolicy, SharedPluginDriver};
use ember_utils::{
  indexmap::FxIndexMap,
  rayon::{IntoParallelRefIterator, ParallelIterator},
};
use futures::future::try_join_all;
use rustc_hash::FxHashMap;

pub use self::{
  partition::DefaultPartitionPolicy,
  render_resource_pot::CachedResourcePot,
};
use self::{
  dynamic_resources::compute_dynamic_resources_map, partition::validate_resource_pots,
  render_resource_pot::{resource_pot_hash, RenderedPot},
};
use crate::types::SharedOptions;

pub type RenderCache = FxHashMap<ArcStr, CachedResourcePot>;

pub struct GenerateStage<'a> {
  options: &'a SharedOptions,
  plugin_driver: &'a SharedPluginDriver,
  partition_policy: &'a dyn PartitionPolicy,
  /// Rendered pots of the previous generation.
  render_cache: Option<&'a RenderCache>,
  is_hmr: bool,
}

#[derive(Debug)]
pub struct GenerateStageOutput {
  pub resource_pots: Vec<ResourcePot>,
  /// Sorted by name.
  pub resources: FxIndexMap<String, Resource>,
  pub render_cache: RenderCache,
  pub dynamic_resources_map: DynamicResourcesMap,
  /// Resources whose pot was rendered again instead of taken from the cache.
  pub regenerated_resources: Vec<String>,
}

impl<'a> GenerateStage<'a> {
  pub fn new(
    options: &'a SharedOptions,
    plugin_driver: &'a SharedPluginDriver,
    partition_policy: &'a dyn PartitionPolicy,
    render_cache: Option<&'a RenderCache>,
    is_hmr: bool,
  ) -> Self {
    Self { options, plugin_driver, partition_policy, render_cache, is_hmr }
  }

  pub async fn generate(&self, module_graph: &ModuleGraph) -> BuildResult<GenerateStageOutput> {
    let mut resource_pots = self.partition_policy.partition(module_graph, self.options)?;
    validate_resource_pots(module_graph, &resource_pots)?;
    for resource_pot in &resource_pots {
      self.plugin_driver.add_resource_pot_record(
        resource_pot,
        self.partition_policy.name(),
        "partition",
        self.is_hmr,
      );
    }

    self
      .plugin_driver
      .process_resource_pots(
        &mut HookProcessResourcePotsArgs { resource_pots: &mut resource_pots, module_graph },
        self.is_hmr,
      )
      .await?;
    validate_resource_pots(module_graph, &resource_pots)?;
    resource_pots.sort_by(|a, b| a.id.cmp(&b.id));

    let hashes = resource_pots
      .par_iter()
      .map(|resource_pot| resource_pot_hash(self.options, module_graph, resource_pot))
      .collect::<Vec<_>>();
    let rendered_pots = try_join_all(
      resource_pots
        .iter()
        .zip(hashes)
        .map(|(resource_pot, hash)| self.render_resource_pot(module_graph, resource_pot, hash)),
    )
    .await?;

    let mut resources = vec![];
    let mut render_cache = RenderCache::default();
    let mut regenerated_resources = vec![];
    for (resource_pot, RenderedPot { hash, resources: pot_resources, reused }) in
      resource_pots.iter_mut().zip(rendered_pots)
    {
      resource_pot.resources = pot_resources.iter().map(|resource| resource.name.clone()).collect();
      if !reused {
        regenerated_resources.extend(resource_pot.resources.iter().cloned());
        self.plugin_driver.add_resource_pot_record(
          resource_pot,
          "ember:generate",
          "generate_resources",
          self.is_hmr,
        );
      }
      render_cache.insert(
        resource_pot.id.clone(),
        CachedResourcePot { hash, resources: pot_resources.clone() },
      );
      resources.extend(pot_resources);
    }

    resources.sort_by(|a, b| a.name.cmp(&b.name));
    regenerated_resources.sort();

    let dynamic_resources_map = compute_dynamic_resources_map(module_graph, &resource_pots);
    tracing::debug!(
      resource_pots = resource_pots.len(),
      regenerated = regenerated_resources.len(),
      "generated resources"
    );

    Ok(GenerateStageOutput {
      resources: resources.into_iter().map(|resource| (resource.name.clone(), resource)).collect(),
      resource_pots,
      render_cache,
      dynamic_resources_map,
      regenerated_resources,
    })
  }
}
