use arcstr::ArcStr;
use ember_common::{ModuleGraph, ModuleId, ResolveKind};
use ember_error::{BuildResult, CompileError};
use ember_plugin::{HookResolveArgs, HookResolveOutput, SharedPluginDriver};
use futures::future::try_join_all;
use sugar_path::SugarPath;
use tokio_util::sync::CancellationToken;

use crate::{
  module_loader::{ModuleLoader, ModuleLoaderOutput},
  types::SharedOptions,
};

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage {
  options: SharedOptions,
  plugin_driver: SharedPluginDriver,
  cancel: CancellationToken,
}

impl ScanStage {
  pub fn new(
    options: SharedOptions,
    plugin_driver: SharedPluginDriver,
    cancel: CancellationToken,
  ) -> Self {
    Self { options, plugin_driver, cancel }
  }

  /// Builds a fresh graph from the configured entries.
  pub async fn scan(&self, generation: u64) -> BuildResult<ScanStageOutput> {
    let entries = self.resolve_user_defined_entries().await?;

    let mut module_graph = ModuleGraph::new();
    module_graph.generation = generation;
    let mut starts = Vec::with_capacity(entries.len());
    for (name, resolved) in entries {
      let id = resolved.module_id(&self.options.root);
      module_graph.entries.entry(id.clone()).or_insert(name);
      starts.push((id, resolved));
    }

    let module_loader = ModuleLoader::new(
      SharedOptions::clone(&self.options),
      SharedPluginDriver::clone(&self.plugin_driver),
      module_graph,
      false,
      self.cancel.clone(),
    );
    module_loader.fetch_modules(starts).await
  }

  /// Rebuilds `dirty` on top of `module_graph`, a copy of the published graph. Modules that are
  /// not dirty are reused as they are.
  pub async fn scan_incremental(
    &self,
    module_graph: ModuleGraph,
    dirty: Vec<ModuleId>,
  ) -> BuildResult<ScanStageOutput> {
    let starts = dirty
      .into_iter()
      .map(|id| {
        let side_effects = module_graph.module(&id).map(|module| module.side_effects);
        let resolved = HookResolveOutput {
          resolved_path: id.resolved_path(&self.options.root).to_slash_lossy().into_owned(),
          query: id.query_string().to_string(),
          external: false,
          side_effects,
        };
        (id, resolved)
      })
      .collect::<Vec<_>>();

    let module_loader = ModuleLoader::new(
      SharedOptions::clone(&self.options),
      SharedPluginDriver::clone(&self.plugin_driver),
      module_graph,
      true,
      self.cancel.clone(),
    );
    module_loader.fetch_modules(starts).await
  }

  async fn resolve_user_defined_entries(&self) -> BuildResult<Vec<(ArcStr, HookResolveOutput)>> {
    let resolved_entries = try_join_all(self.options.input.iter().map(|(name, specifier)| async move {
      let args = HookResolveArgs {
        source: specifier,
        importer: None,
        importer_path: None,
        kind: &ResolveKind::Entry,
        is_hmr: false,
      };
      let resolved = self.plugin_driver.resolve(&args, None).await?;
      anyhow::Ok((name, specifier, resolved))
    }))
    .await?;

    let mut ret = Vec::with_capacity(resolved_entries.len());
    let mut errors: Vec<anyhow::Error> = vec![];

    for (name, specifier, resolved) in resolved_entries {
      match resolved {
        None => errors.push(
          CompileError::UnresolvedImport { specifier: specifier.clone(), importer: None }.into(),
        ),
        Some(resolved) if resolved.external => errors.push(
          CompileError::EntryCannotBeExternal { name: name.clone(), id: resolved.resolved_path }
            .into(),
        ),
        Some(resolved) => {
          ret.push((ArcStr::from(name.as_str()), resolved));
        }
      }
    }

    if !errors.is_empty() {
      return Err(errors.into());
    }

    Ok(ret)
  }
}
