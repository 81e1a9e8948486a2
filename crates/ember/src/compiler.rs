use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use ember_common::{
  AnalyzeDepsRecord, CompilerOptions, Module, ModuleId, PathChange, ProcessRecord,
  RecordManager, ResolveRecord, ResourcePot, ResourcePotRecord, TransformRecord, UpdateResult,
  UpdateType, WatchGraph,
};
use ember_error::{BuildResult, CompileError};
use ember_fs::OsFileSystem;
use ember_plugin::{PartitionPolicy, PluginDriver, SharedPlugin, SharedPluginDriver};
use ember_utils::indexmap::FxIndexMap;
use parking_lot::{Mutex, RwLock};
use sugar_path::SugarPath;
use tokio::sync::{oneshot, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{
  plugins::{FsLoadPlugin, FsResolvePlugin},
  stages::{
    generate::{DefaultPartitionPolicy, GenerateStage},
    scan::ScanStage,
    update::{RebuiltGraph, UpdateStage},
  },
  types::{generation::Generation, SharedFileSystem, SharedOptions},
  utils::{
    normalize_options::normalize_options,
    watch_files::{apply_watch_files, normalize_watch_path},
  },
};

/// Called once the generation produced by an update is published, or the update failed.
pub type UpdateCallback = Box<dyn FnOnce(&BuildResult<UpdateResult>) + Send + 'static>;

struct UpdateWaiter {
  tx: oneshot::Sender<BuildResult<UpdateResult>>,
  callback: Option<UpdateCallback>,
}

/// Updates requested while another one is running. They are merged into a single batch.
#[derive(Default)]
struct PendingUpdates {
  changes: Vec<PathChange>,
  waiters: Vec<UpdateWaiter>,
  synchronous: bool,
}

struct CompilerInner {
  options: SharedOptions,
  plugin_driver: SharedPluginDriver,
  record_manager: Arc<RecordManager>,
  partition_policy: Arc<dyn PartitionPolicy>,
  /// The published generation. Replaced as a whole, never mutated.
  current: RwLock<Option<Arc<Generation>>>,
  /// Files registered through [`Compiler::add_watch_files`].
  user_watch_graph: RwLock<WatchGraph>,
  /// Held by whichever build is producing the next generation.
  build_lock: Arc<tokio::sync::Mutex<()>>,
  pending_updates: Mutex<PendingUpdates>,
  cancel: Mutex<CancellationToken>,
}

/// Entry point of the engine. Cloning gives another handle to the same compiler.
#[derive(Clone)]
pub struct Compiler {
  inner: Arc<CompilerInner>,
}

pub struct CompilerBuilder {
  options: CompilerOptions,
  plugins: Vec<SharedPlugin>,
  fs: Option<SharedFileSystem>,
  partition_policy: Option<Arc<dyn PartitionPolicy>>,
}

impl CompilerBuilder {
  #[must_use]
  pub fn plugin(mut self, plugin: SharedPlugin) -> Self {
    self.plugins.push(plugin);
    self
  }

  #[must_use]
  pub fn plugins(mut self, plugins: impl IntoIterator<Item = SharedPlugin>) -> Self {
    self.plugins.extend(plugins);
    self
  }

  /// The file system used by the built-in plugins. Defaults to [`OsFileSystem`].
  #[must_use]
  pub fn file_system(mut self, fs: SharedFileSystem) -> Self {
    self.fs = Some(fs);
    self
  }

  #[must_use]
  pub fn partition_policy(mut self, partition_policy: Arc<dyn PartitionPolicy>) -> Self {
    self.partition_policy = Some(partition_policy);
    self
  }

  pub fn build(self) -> Result<Compiler, CompileError> {
    let options = Arc::new(normalize_options(self.options)?);

    let mut plugins = self.plugins;
    if options.builtin_plugins {
      let fs = self.fs.unwrap_or_else(|| Arc::new(OsFileSystem));
      plugins.push(Arc::new(FsResolvePlugin::new(Arc::clone(&fs), &options)));
      plugins.push(Arc::new(FsLoadPlugin::new(fs)));
    }

    let record_manager = Arc::new(RecordManager::new());
    let plugin_driver =
      PluginDriver::new_shared(plugins, Arc::clone(&options), Arc::clone(&record_manager));
    tracing::debug!(plugins = ?plugin_driver.plugin_names(), "created compiler");

    Ok(Compiler {
      inner: Arc::new(CompilerInner {
        options,
        plugin_driver,
        record_manager,
        partition_policy: self.partition_policy.unwrap_or_else(|| Arc::new(DefaultPartitionPolicy)),
        current: RwLock::new(None),
        user_watch_graph: RwLock::default(),
        build_lock: Arc::default(),
        pending_updates: Mutex::default(),
        cancel: Mutex::default(),
      }),
    })
  }
}

impl Compiler {
  pub fn builder(options: CompilerOptions) -> CompilerBuilder {
    CompilerBuilder { options, plugins: vec![], fs: None, partition_policy: None }
  }

  pub fn new(options: CompilerOptions, plugins: Vec<SharedPlugin>) -> Result<Self, CompileError> {
    Self::builder(options).plugins(plugins).build()
  }

  /// Builds a compiler from an untyped configuration object.
  pub fn from_json(
    config: serde_json::Value,
    plugins: Vec<SharedPlugin>,
  ) -> Result<Self, CompileError> {
    let options = serde_json::from_value::<CompilerOptions>(config)
      .map_err(|err| CompileError::config(err.to_string()))?;
    Self::new(options, plugins)
  }

  pub fn options(&self) -> &SharedOptions {
    &self.inner.options
  }

  /// Runs a full build and publishes its generation.
  pub async fn compile(&self) -> BuildResult<()> {
    let cancel = self.cancel_token();
    let _guard = self.inner.build_lock.lock().await;
    let span = tracing::info_span!("compile");

    let outcome = self.build_full(cancel).instrument(span).await;
    match outcome {
      Ok(generation) => {
        let removed = self.current().map_or_else(Vec::new, |previous| {
          let module_graph = &previous.module_graph;
          module_graph
            .module_ids()
            .filter(|id| !generation.module_graph.has_module(id))
            .cloned()
            .collect()
        });
        self.publish(generation, &removed);
        Ok(())
      }
      Err(err) => {
        self.discard();
        Err(err)
      }
    }
  }

  /// Blocks the calling thread until [`Compiler::compile`] finishes on a runtime of its own.
  /// Must not be called from inside an async context.
  pub fn compile_sync(&self) -> BuildResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
      .enable_all()
      .build()
      .map_err(anyhow::Error::from)?;
    runtime.block_on(self.compile())
  }

  async fn build_full(&self, cancel: CancellationToken) -> BuildResult<Generation> {
    let inner = &self.inner;
    let number = self.current().map_or(1, |previous| previous.number() + 1);
    inner.plugin_driver.build_start().await?;

    let scan_output = ScanStage::new(
      SharedOptions::clone(&inner.options),
      SharedPluginDriver::clone(&inner.plugin_driver),
      cancel,
    )
    .scan(number)
    .await?;
    for warning in &scan_output.warnings {
      tracing::warn!("{warning:#}");
    }
    let module_graph = scan_output.module_graph;

    let mut watch_graph = WatchGraph::new();
    apply_watch_files(&inner.plugin_driver, &mut watch_graph, &module_graph, &[]);

    let generate_output = GenerateStage::new(
      &inner.options,
      &inner.plugin_driver,
      inner.partition_policy.as_ref(),
      None,
      false,
    )
    .generate(&module_graph)
    .await?;

    Ok(Generation {
      module_graph,
      resource_pots: generate_output.resource_pots,
      resources: generate_output.resources,
      render_cache: generate_output.render_cache,
      watch_graph,
      dynamic_resources_map: generate_output.dynamic_resources_map,
    })
  }

  /// Applies `paths` to the published generation. Updates requested while another one runs
  /// are merged into the next batch, and every caller of that batch gets the same result.
  ///
  /// With `synchronous` the returned result is complete and the new generation is published
  /// before this returns. Otherwise the result is returned as soon as the module graph is
  /// rebuilt, without `regenerated_resources` and `dynamic_resources_map`, and resources are
  /// rendered in the background. Either way `callback` runs once the generation is published.
  pub async fn update(
    &self,
    paths: Vec<PathChange>,
    callback: Option<UpdateCallback>,
    synchronous: bool,
  ) -> BuildResult<UpdateResult> {
    let (tx, rx) = oneshot::channel();
    {
      let mut pending = self.inner.pending_updates.lock();
      pending.changes.extend(paths);
      pending.waiters.push(UpdateWaiter { tx, callback });
      pending.synchronous |= synchronous;
    }

    let guard = Arc::clone(&self.inner.build_lock).lock_owned().await;
    let batch = std::mem::take(&mut *self.inner.pending_updates.lock());
    if batch.waiters.is_empty() {
      // An earlier caller picked up these paths.
      drop(guard);
    } else {
      self.run_update_batch(batch, guard).await;
    }

    rx.await.unwrap_or_else(|_| Err(CompileError::Cancelled.into()))
  }

  /// Synchronous update where every path counts as modified.
  pub async fn update_paths(
    &self,
    paths: impl IntoIterator<Item = impl Into<PathBuf>>,
  ) -> BuildResult<UpdateResult> {
    let changes = paths.into_iter().map(|path| (path.into(), UpdateType::Updated)).collect();
    self.update(changes, None, true).await
  }

  async fn run_update_batch(&self, batch: PendingUpdates, guard: OwnedMutexGuard<()>) {
    let PendingUpdates { changes, waiters, synchronous } = batch;
    if waiters.len() > 1 {
      tracing::debug!(callers = waiters.len(), "coalesced updates");
    }

    let Some(previous) = self.current() else {
      let err = CompileError::config("update requires a successful compile first").into();
      notify(waiters, Err(err));
      return;
    };

    // The last change reported for a path wins.
    let changes = changes.into_iter().collect::<FxIndexMap<_, _>>().into_iter().collect::<Vec<_>>();
    let user_watch_graph = self.inner.user_watch_graph.read().clone();
    let cancel = self.cancel_token();
    let span = tracing::info_span!("update", generation = previous.number() + 1);

    let stage = self.update_stage(cancel.clone());
    let rebuilt = async {
      self.inner.plugin_driver.build_start().await?;
      stage.rebuild(&previous, &changes, &user_watch_graph).await
    }
    .instrument(span.clone())
    .await;
    let rebuilt = match rebuilt {
      Ok(rebuilt) => rebuilt,
      Err(err) => {
        self.discard();
        notify(waiters, Err(err));
        return;
      }
    };

    if synchronous {
      let outcome = self.finish_update(&stage, &previous, rebuilt).instrument(span).await;
      notify(waiters, outcome);
      return;
    }

    let result = rebuilt.result.clone();
    let mut callbacks = Vec::with_capacity(waiters.len());
    for UpdateWaiter { tx, callback } in waiters {
      let _ = tx.send(Ok(result.clone()));
      callbacks.extend(callback);
    }

    let compiler = self.clone();
    tokio::spawn(
      async move {
        let _guard = guard;
        let stage = compiler.update_stage(cancel);
        let outcome = compiler.finish_update(&stage, &previous, rebuilt).await;
        for callback in callbacks {
          callback(&outcome);
        }
      }
      .instrument(span),
    );
  }

  fn update_stage(&self, cancel: CancellationToken) -> UpdateStage<'_> {
    UpdateStage::new(
      &self.inner.options,
      &self.inner.plugin_driver,
      self.inner.partition_policy.as_ref(),
      cancel,
    )
  }

  async fn finish_update(
    &self,
    stage: &UpdateStage<'_>,
    previous: &Generation,
    rebuilt: RebuiltGraph,
  ) -> BuildResult<UpdateResult> {
    match stage.generate(previous, rebuilt).await {
      Ok((generation, result)) => {
        self.publish(generation, &result.removed);
        Ok(result)
      }
      Err(err) => {
        self.discard();
        Err(err)
      }
    }
  }

  fn publish(&self, generation: Generation, removed: &[ModuleId]) {
    let inner = &self.inner;
    inner.record_manager.commit(removed);
    inner.user_watch_graph.write().retain_roots(|id| generation.module_graph.has_module(id));
    tracing::debug!(
      generation = generation.number(),
      modules = generation.module_graph.len(),
      resources = generation.resources.len(),
      "published generation"
    );
    *inner.current.write() = Some(Arc::new(generation));
  }

  /// Drops everything a failed build left behind.
  fn discard(&self) {
    self.inner.record_manager.discard();
    self.inner.plugin_driver.context().take_watch_files();
  }

  fn cancel_token(&self) -> CancellationToken {
    self.inner.cancel.lock().clone()
  }

  /// Cancels the running compile or update. The published generation stays as it is.
  pub fn cancel(&self) {
    let token = std::mem::take(&mut *self.inner.cancel.lock());
    token.cancel();
  }

  fn current(&self) -> Option<Arc<Generation>> {
    self.inner.current.read().clone()
  }

  /// Number of the published generation, 0 before the first successful compile.
  pub fn generation(&self) -> u64 {
    self.current().map_or(0, |generation| generation.number())
  }

  /// Declares that module `root` depends on `paths`. `root` is a module id or the module's
  /// resolved path.
  pub fn add_watch_files(
    &self,
    root: &str,
    paths: impl IntoIterator<Item = impl AsRef<Path>>,
  ) -> Result<(), CompileError> {
    let base = &self.inner.options.root;
    let id = self
      .current()
      .and_then(|generation| {
        let module_graph = &generation.module_graph;
        let id = ModuleId::from(root);
        if module_graph.has_module(&id) {
          return Some(id);
        }
        let resolved = Path::new(root).absolutize_with(base);
        module_graph.module_ids_by_resolved_path(&resolved, base).into_iter().next()
      })
      .ok_or_else(|| CompileError::ModuleNotFound { id: root.to_string() })?;

    let files = paths.into_iter().map(|path| normalize_watch_path(path.as_ref(), base));
    self.inner.user_watch_graph.write().add_watch_files(id, files);
    Ok(())
  }

  /// Whether a module loaded from `resolved_path` is part of the published generation.
  pub fn has_module(&self, resolved_path: impl AsRef<Path>) -> bool {
    let root = &self.inner.options.root;
    let resolved = resolved_path.as_ref().absolutize_with(root);
    self.current().is_some_and(|generation| {
      !generation.module_graph.module_ids_by_resolved_path(&resolved, root).is_empty()
    })
  }

  /// Emitted resources of the published generation, sorted by name. [`Compiler::resource`] also
  /// finds the ones a plugin kept back.
  pub fn resources(&self) -> FxIndexMap<String, Arc<[u8]>> {
    self.current().map_or_else(FxIndexMap::default, |generation| {
      generation
        .resources
        .iter()
        .filter(|(_, resource)| resource.emitted)
        .map(|(name, resource)| (name.clone(), Arc::clone(&resource.bytes)))
        .collect()
    })
  }

  pub fn resource(&self, name: &str) -> Option<Arc<[u8]>> {
    self.current()?.resources.get(name).map(|resource| Arc::clone(&resource.bytes))
  }

  /// Resource pots of the published generation, sorted by id.
  pub fn resource_pots(&self) -> Vec<ResourcePot> {
    self.current().map(|generation| generation.resource_pots.clone()).unwrap_or_default()
  }

  /// Modules of the published generation, sorted by id.
  pub fn modules(&self) -> Vec<Module> {
    let Some(generation) = self.current() else { return vec![] };
    let mut modules = generation.module_graph.modules().cloned().collect::<Vec<_>>();
    modules.sort_by(|a, b| a.id.cmp(&b.id));
    modules
  }

  /// Absolute paths a file watcher has to observe: every loaded module plus the extra files
  /// registered by plugins and [`Compiler::add_watch_files`].
  pub fn watch_modules(&self) -> Vec<String> {
    let Some(generation) = self.current() else { return vec![] };
    let root = &self.inner.options.root;
    let mut paths = generation
      .module_graph
      .modules()
      .filter(|module| !module.external)
      .map(|module| normalize_watch_path(&module.id.resolved_path(root), root))
      .chain(generation.watch_graph.files())
      .chain(self.inner.user_watch_graph.read().files())
      .collect::<Vec<_>>();
    paths.sort();
    paths.dedup();
    paths
  }

  /// Root-relative paths of the loaded modules, without queries.
  pub fn relative_module_paths(&self) -> Vec<String> {
    let Some(generation) = self.current() else { return vec![] };
    let mut paths = generation
      .module_graph
      .modules()
      .filter(|module| !module.external)
      .map(|module| module.id.relative_path().to_string())
      .collect::<Vec<_>>();
    paths.sort();
    paths.dedup();
    paths
  }

  pub fn get_resolve_records_by_id(&self, id: &str) -> Vec<ResolveRecord> {
    self.inner.record_manager.get_resolve_records_by_id(id)
  }

  pub fn get_transform_records_by_id(&self, id: &str) -> Vec<TransformRecord> {
    self.inner.record_manager.get_transform_records_by_id(id)
  }

  pub fn get_process_records_by_id(&self, id: &str) -> Vec<ProcessRecord> {
    self.inner.record_manager.get_process_records_by_id(id)
  }

  pub fn get_analyze_deps_records_by_id(&self, id: &str) -> Vec<AnalyzeDepsRecord> {
    self.inner.record_manager.get_analyze_deps_records_by_id(id)
  }

  pub fn get_resource_pot_records_by_id(&self, id: &str) -> Vec<ResourcePotRecord> {
    self.inner.record_manager.get_resource_pot_records_by_id(id)
  }
}

/// Hands the outcome of a batch to everyone who queued paths into it. The last caller gets the
/// original error, the others a detached copy.
fn notify(waiters: Vec<UpdateWaiter>, outcome: BuildResult<UpdateResult>) {
  let mut senders = Vec::with_capacity(waiters.len());
  for UpdateWaiter { tx, callback } in waiters {
    if let Some(callback) = callback {
      callback(&outcome);
    }
    senders.push(tx);
  }
  let Some(last) = senders.pop() else { return };
  for tx in senders {
    let detached = match &outcome {
      Ok(result) => Ok(result.clone()),
      Err(err) => Err(err.to_detached()),
    };
    let _ = tx.send(detached);
  }
  let _ = last.send(outcome);
}
