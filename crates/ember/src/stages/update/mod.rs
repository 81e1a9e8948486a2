mod diff;
mod hmr_boundaries;
mod mutability;

use std::path::Path;

use ember_common::{ModuleGraph, ModuleId, PathChange, UpdateResult, UpdateType, WatchGraph};
use ember_error::BuildResult;
use ember_plugin::{PartitionPolicy, SharedPluginDriver};
use ember_utils::indexmap::FxIndexSet;
use tokio_util::sync::CancellationToken;

pub use self::{
  diff::{diff_module_graphs, ModuleGraphDiff},
  hmr_boundaries::compute_hmr_boundaries,
  mutability::partition_by_mutability,
};
use super::{generate::GenerateStage, scan::ScanStage};
use crate::{
  types::{generation::Generation, SharedOptions},
  utils::watch_files::{apply_watch_files, normalize_watch_path},
};

pub struct UpdateStage<'a> {
  options: &'a SharedOptions,
  plugin_driver: &'a SharedPluginDriver,
  partition_policy: &'a dyn PartitionPolicy,
  cancel: CancellationToken,
}

/// Outcome of [`UpdateStage::rebuild`], not yet rendered.
#[derive(Debug)]
pub struct RebuiltGraph {
  pub module_graph: ModuleGraph,
  pub watch_graph: WatchGraph,
  pub result: UpdateResult,
}

impl<'a> UpdateStage<'a> {
  pub fn new(
    options: &'a SharedOptions,
    plugin_driver: &'a SharedPluginDriver,
    partition_policy: &'a dyn PartitionPolicy,
    cancel: CancellationToken,
  ) -> Self {
    Self { options, plugin_driver, partition_policy, cancel }
  }

  /// Builds the generation that follows `previous` after `changes`. `previous` is left untouched;
  /// on error nothing of the new generation survives.
  pub async fn update(
    &self,
    previous: &Generation,
    changes: &[PathChange],
    user_watch_graph: &WatchGraph,
  ) -> BuildResult<(Generation, UpdateResult)> {
    let rebuilt = self.rebuild(previous, changes, user_watch_graph).await?;
    self.generate(previous, rebuilt).await
  }

  /// Re-runs the hook pipeline for the modules affected by `changes` and diffs the outcome
  /// against `previous`. Resource related fields of the result stay empty until
  /// [`UpdateStage::generate`].
  pub async fn rebuild(
    &self,
    previous: &Generation,
    changes: &[PathChange],
    user_watch_graph: &WatchGraph,
  ) -> BuildResult<RebuiltGraph> {
    let root = &self.options.root;
    let mut module_graph = previous.module_graph.clone();
    module_graph.generation = previous.number() + 1;
    let mut watch_graph = previous.watch_graph.clone();

    let mut dirty = FxIndexSet::<ModuleId>::default();
    for (path, update_type) in changes {
      let path = normalize_watch_path(path, root);
      let ids = module_graph.module_ids_by_resolved_path(Path::new(&path), root);
      match update_type {
        UpdateType::Added | UpdateType::Updated => dirty.extend(ids),
        UpdateType::Removed => {
          for id in ids {
            if module_graph.is_entry(&id) {
              // Rebuilding a missing entry fails the update and keeps the previous generation.
              dirty.insert(id);
              continue;
            }
            dirty.extend(module_graph.dependent_ids(&id));
            module_graph.remove_module(&id);
            watch_graph.remove_root(&id);
          }
        }
      }
      dirty.extend(watch_graph.roots_of(&path));
      dirty.extend(user_watch_graph.roots_of(&path));
    }
    // Modules that failed to build or resolve get another chance, a missing file may have
    // appeared.
    dirty.extend(
      module_graph
        .modules()
        .filter(|module| module.error.is_some() && !module.immutable)
        .map(|module| module.id.clone()),
    );
    dirty.retain(|id| module_graph.has_module(id));
    let mut dirty = dirty.into_iter().collect::<Vec<_>>();
    dirty.sort();
    tracing::debug!(generation = module_graph.generation, dirty = dirty.len(), "updating modules");

    let scan_output = ScanStage::new(
      SharedOptions::clone(self.options),
      SharedPluginDriver::clone(self.plugin_driver),
      self.cancel.clone(),
    )
    .scan_incremental(module_graph, dirty)
    .await?;
    let mut module_graph = scan_output.module_graph;
    for warning in &scan_output.warnings {
      tracing::warn!("{warning:#}");
    }

    let pruned = module_graph.remove_unreachable();
    if !pruned.is_empty() {
      tracing::debug!(pruned = pruned.len(), "removed unreachable modules");
    }
    apply_watch_files(self.plugin_driver, &mut watch_graph, &module_graph, &scan_output.built);

    let diff = diff_module_graphs(&previous.module_graph, &module_graph);
    let (boundaries, reload_required) = compute_hmr_boundaries(&module_graph, &diff.changed);
    let (immutable_modules, mutable_modules) = partition_by_mutability(&module_graph, &diff);

    let result = UpdateResult {
      added: diff.added,
      changed: diff.changed,
      removed: diff.removed,
      immutable_modules,
      mutable_modules,
      boundaries,
      dynamic_resources_map: None,
      extra_watch_result: watch_graph.diff(&previous.watch_graph),
      reload_required,
      regenerated_resources: vec![],
      generation: module_graph.generation,
    };
    Ok(RebuiltGraph { module_graph, watch_graph, result })
  }

  /// Partitions and renders the rebuilt graph, reusing the rendered pots of `previous` whose
  /// content did not change.
  pub async fn generate(
    &self,
    previous: &Generation,
    rebuilt: RebuiltGraph,
  ) -> BuildResult<(Generation, UpdateResult)> {
    let RebuiltGraph { module_graph, watch_graph, mut result } = rebuilt;
    let generate_output = GenerateStage::new(
      self.options,
      self.plugin_driver,
      self.partition_policy,
      Some(&previous.render_cache),
      true,
    )
    .generate(&module_graph)
    .await?;

    let membership_changed = previous.resource_pots.len() != generate_output.resource_pots.len()
      || previous
        .resource_pots
        .iter()
        .zip(&generate_output.resource_pots)
        .any(|(prev, next)| prev.id != next.id || prev.modules != next.modules);
    if membership_changed {
      result.dynamic_resources_map = Some(generate_output.dynamic_resources_map.clone());
    }
    result.regenerated_resources = generate_output.regenerated_resources;

    let generation = Generation {
      module_graph,
      resource_pots: generate_output.resource_pots,
      resources: generate_output.resources,
      render_cache: generate_output.render_cache,
      watch_graph,
      dynamic_resources_map: generate_output.dynamic_resources_map,
    };
    Ok((generation, result))
  }
}
