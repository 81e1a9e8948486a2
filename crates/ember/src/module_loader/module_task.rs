use std::{path::Path, sync::Arc};

use ember_common::{Module, ModuleErrorPolicy, ModuleId, ModuleType};
use ember_error::{BuildResult, CompileError};
use ember_plugin::{
  HookAnalyzeDepsArgs, HookFinalizeModuleArgs, HookLoadArgs, HookResolveArgs,
  HookResolveOutput, TransformedModule,
};
use ember_utils::xxhash::xxhash_base64_url;
use futures::future::try_join_all;
use itertools::Itertools;

use super::task_context::TaskContext;
use crate::types::module_loader_msg::{ModuleLoaderMsg, ModuleTaskResult, ResolvedDependency};

/// Runs the whole hook pipeline for one module: load, transform, analyze, finalize, and resolve
/// the module's dependencies.
pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  id: ModuleId,
  resolved: HookResolveOutput,
}

impl ModuleTask {
  pub fn new(ctx: Arc<TaskContext>, id: ModuleId, resolved: HookResolveOutput) -> Self {
    Self { ctx, id, resolved }
  }

  pub async fn run(self) {
    let Ok(_permit) = Arc::clone(&self.ctx.permits).acquire_owned().await else {
      return;
    };
    tracing::debug!(module = %self.id, "building module");

    let msg = match self.run_inner().await {
      Ok(result) => ModuleLoaderMsg::ModuleDone(Box::new(result)),
      Err(errs) => ModuleLoaderMsg::BuildErrors { id: self.id.clone(), errors: errs.0 },
    };
    // The receiver is gone when the build was cancelled or already failed.
    let _ = self.ctx.tx.send(msg).await;
  }

  async fn run_inner(&self) -> BuildResult<ModuleTaskResult> {
    let driver = &self.ctx.plugin_driver;
    let is_hmr = self.ctx.is_hmr;
    let resolved_path = self.resolved.resolved_path.as_str();

    let loaded = driver
      .load(&HookLoadArgs { id: &self.id, resolved_path, query: &self.resolved.query, is_hmr })
      .await?
      .ok_or_else(|| CompileError::NoLoader { id: self.id.to_string() })?;

    let transformed = driver
      .transform(
        &self.id,
        resolved_path,
        is_hmr,
        TransformedModule {
          module_type: loaded.module_type.unwrap_or_else(|| ModuleType::from_path(resolved_path)),
          content: loaded.content,
          source_map_chain: loaded.source_map.into_iter().collect(),
        },
      )
      .await?;

    let mut analyze_args = HookAnalyzeDepsArgs {
      id: &self.id,
      content: &transformed.content,
      module_type: &transformed.module_type,
      is_hmr,
      deps: vec![],
      hmr_self_accepted: false,
    };
    driver.analyze_deps(&mut analyze_args).await?;
    let HookAnalyzeDepsArgs { deps, hmr_self_accepted, .. } = analyze_args;

    let mut module = Module::new(self.id.clone(), transformed.module_type.clone());
    module.content_hash =
      xxhash_base64_url(format!("{}\0{}", transformed.module_type, transformed.content).as_bytes());
    module.content = transformed.content;
    module.source_map_chain = transformed.source_map_chain;
    module.side_effects = self.resolved.side_effects.unwrap_or(true);
    module.immutable = self.ctx.options.is_immutable(&self.id);
    module.hmr_accepted = hmr_self_accepted;
    module.last_update_generation = self.ctx.generation;

    driver.finalize_module(&mut HookFinalizeModuleArgs { module: &mut module, deps: &deps, is_hmr }).await?;

    let importer_path = Path::new(resolved_path);
    let resolved = try_join_all(deps.iter().map(|dep| async move {
      if self.ctx.options.is_external(&dep.source) {
        return anyhow::Ok(Some(HookResolveOutput::external(dep.source.as_str())));
      }
      let args = HookResolveArgs {
        source: &dep.source,
        importer: Some(&self.id),
        importer_path: Some(importer_path),
        kind: &dep.kind,
        is_hmr,
      };
      driver.resolve(&args, None).await
    }))
    .await?;

    let mut warnings = vec![];
    let mut unresolved = vec![];
    let mut resolved_deps = Vec::with_capacity(deps.len());
    for (order, (dep, resolved)) in deps.into_iter().zip(resolved).enumerate() {
      match resolved {
        Some(resolved) => resolved_deps.push(ResolvedDependency { dep, order, resolved }),
        None => unresolved.push(CompileError::UnresolvedImport {
          specifier: dep.source.to_string(),
          importer: Some(self.id.to_string()),
        }),
      }
    }

    if !unresolved.is_empty() {
      if self.ctx.options.module_error_policy == ModuleErrorPolicy::Abort {
        return Err(unresolved.into_iter().map(anyhow::Error::from).collect_vec().into());
      }
      module.error = Some(unresolved.iter().map(ToString::to_string).join("\n").into());
      warnings.extend(unresolved.into_iter().map(anyhow::Error::from));
    }

    Ok(ModuleTaskResult { module, deps: resolved_deps, warnings })
  }
}
