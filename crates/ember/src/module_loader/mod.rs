pub mod task_context;

mod module_task;

use std::sync::Arc;

use ember_common::{
  Module, ModuleErrorPolicy, ModuleGraph, ModuleGraphEdgeDataItem, ModuleId,
};
use ember_error::{BuildResult, CompileError};
use ember_plugin::{HookResolveOutput, SharedPluginDriver};
use itertools::Itertools;
use module_task::ModuleTask;
use rustc_hash::FxHashSet;
use task_context::TaskContext;
use tokio::{
  sync::{mpsc::Receiver, Semaphore},
  task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::types::{
  module_loader_msg::{ModuleLoaderMsg, ModuleTaskResult, ResolvedDependency},
  SharedOptions,
};

/// Walks the module graph from a set of starting points, running one [`ModuleTask`] per module
/// that is not visited yet. Tasks run concurrently. Their results are applied to the graph one
/// at a time by [`ModuleLoader::fetch_modules`].
pub struct ModuleLoader {
  rx: Receiver<ModuleLoaderMsg>,
  remaining: u32,
  options: SharedOptions,
  shared_context: Arc<TaskContext>,
  module_graph: ModuleGraph,
  visited: FxHashSet<ModuleId>,
  /// Edges are attached once every module they point to is in the graph.
  edges: Vec<(ModuleId, ModuleId, ModuleGraphEdgeDataItem)>,
  built: Vec<ModuleId>,
  /// Dropping the set aborts whatever is still running.
  tasks: JoinSet<()>,
  cancel: CancellationToken,
}

#[derive(Debug)]
pub struct ModuleLoaderOutput {
  pub module_graph: ModuleGraph,
  /// Modules that went through the hook pipeline in this run, in completion order.
  pub built: Vec<ModuleId>,
  pub warnings: Vec<anyhow::Error>,
}

impl ModuleLoader {
  /// `module_graph` is the graph to extend. Every module already in it counts as visited unless
  /// it is passed as a starting point to [`ModuleLoader::fetch_modules`].
  pub fn new(
    options: SharedOptions,
    plugin_driver: SharedPluginDriver,
    module_graph: ModuleGraph,
    is_hmr: bool,
    cancel: CancellationToken,
  ) -> Self {
    // 1024 should be enough for most cases
    // over 1024 pending tasks are insane
    let (tx, rx) = tokio::sync::mpsc::channel(1024);

    let shared_context = Arc::new(TaskContext {
      permits: Arc::new(Semaphore::new(options.concurrency)),
      options: Arc::clone(&options),
      plugin_driver,
      tx,
      is_hmr,
      generation: module_graph.generation,
    });

    let visited = module_graph.module_ids().cloned().collect();

    Self {
      rx,
      remaining: 0,
      options,
      shared_context,
      module_graph,
      visited,
      edges: vec![],
      built: vec![],
      tasks: JoinSet::new(),
      cancel,
    }
  }

  /// Builds every module in `starts` and everything newly reachable from them.
  pub async fn fetch_modules(
    mut self,
    starts: Vec<(ModuleId, HookResolveOutput)>,
  ) -> BuildResult<ModuleLoaderOutput> {
    for (id, _) in &starts {
      self.visited.remove(id);
    }
    for (_, resolved) in starts {
      self.try_spawn_new_task(resolved);
    }

    let mut errors: Vec<anyhow::Error> = vec![];
    let mut warnings: Vec<anyhow::Error> = vec![];

    while self.remaining > 0 {
      let msg = tokio::select! {
        () = self.cancel.cancelled() => {
          self.abort_tasks().await;
          return Err(CompileError::Cancelled.into());
        }
        msg = self.rx.recv() => msg,
      };
      let Some(msg) = msg else {
        break;
      };

      match msg {
        ModuleLoaderMsg::ModuleDone(task_result) => {
          let ModuleTaskResult { module, deps, warnings: task_warnings } = *task_result;
          warnings.extend(task_warnings);

          let importer = module.id.clone();
          self.module_graph.remove_dependencies(&importer);
          self.module_graph.add_module(module);

          for ResolvedDependency { dep, order, resolved } in deps {
            let dep_id = self.try_spawn_new_task(resolved);
            self.edges.push((
              importer.clone(),
              dep_id,
              ModuleGraphEdgeDataItem {
                source: dep.source,
                kind: dep.kind,
                order,
                hmr_accepted: dep.hmr_accepted,
              },
            ));
          }
          self.built.push(importer);
        }
        ModuleLoaderMsg::BuildErrors { id, errors: task_errors } => {
          if self.module_graph.is_entry(&id)
            || self.options.module_error_policy == ModuleErrorPolicy::Abort
          {
            errors.extend(task_errors);
          } else {
            let message = task_errors.iter().map(|err| format!("{err:#}")).join("\n");
            tracing::warn!(module = %id, "replacing failed module with a placeholder: {message}");
            self.module_graph.remove_dependencies(&id);
            self.module_graph.add_module(Module::placeholder(id.clone(), message));
            warnings.extend(task_errors);
            self.built.push(id);
          }
        }
      }
      self.remaining -= 1;
    }

    if !errors.is_empty() {
      return Err(errors.into());
    }

    for (from, to, item) in self.edges {
      self.module_graph.add_edge(&from, &to, item)?;
    }

    Ok(ModuleLoaderOutput { module_graph: self.module_graph, built: self.built, warnings })
  }

  fn try_spawn_new_task(&mut self, resolved: HookResolveOutput) -> ModuleId {
    let id = resolved.module_id(&self.options.root);
    if !self.visited.insert(id.clone()) {
      return id;
    }

    if resolved.external {
      let mut module = Module::external(id.clone());
      module.side_effects = resolved.side_effects.unwrap_or(true);
      module.last_update_generation = self.module_graph.generation;
      self.module_graph.add_module(module);
    } else {
      self.remaining += 1;
      let task = ModuleTask::new(Arc::clone(&self.shared_context), id.clone(), resolved);
      self.tasks.spawn(task.run());
    }

    id
  }

  /// Stops every task still in flight and waits until none of them can touch the records or the
  /// watch files again.
  async fn abort_tasks(&mut self) {
    self.tasks.abort_all();
    while self.tasks.join_next().await.is_some() {}
    tracing::debug!(pending = self.remaining, "aborted module tasks");
  }
}
