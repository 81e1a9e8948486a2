use arcstr::ArcStr;
use ember_common::{
  AnalyzeDepsRecord, ModuleId, ModuleType, ProcessRecord, ResolveRecord, TransformRecord,
};
use ember_error::CompileError;

use super::PluginDriver;
use crate::{
  HookAnalyzeDepsArgs, HookFinalizeModuleArgs, HookLoadArgs, HookLoadReturn, HookNoopReturn,
  HookResolveArgs, HookResolveReturn, HookTransformArgs,
};

/// A module as it moves through the transform hooks.
#[derive(Debug, Clone)]
pub struct TransformedModule {
  pub content: ArcStr,
  pub module_type: ModuleType,
  pub source_map_chain: Vec<ArcStr>,
}

impl PluginDriver {
  pub async fn build_start(&self) -> HookNoopReturn {
    for (plugin, _) in &self.plugins {
      let plugin_name = plugin.name();
      plugin.build_start(&self.context).await.map_err(|cause| CompileError::PluginHook {
        id: self.options().root.display().to_string(),
        plugin: plugin_name.to_string(),
        hook: "build_start".to_string(),
        cause,
      })?;
    }
    Ok(())
  }

  /// Asks plugins in order until one resolves `args.source`. A plugin named `caller` is skipped.
  /// `Ok(None)` means that no plugin could resolve it.
  pub async fn resolve(&self, args: &HookResolveArgs<'_>, caller: Option<&str>) -> HookResolveReturn {
    let importer_path = args.importer_path.map(|path| path.to_string_lossy());
    for (plugin, filters) in &self.plugins {
      let plugin_name = plugin.name();
      if caller.is_some_and(|caller| caller == plugin_name) {
        continue;
      }
      if filters.resolve.as_ref().is_some_and(|filter| !filter.matches(importer_path.as_deref(), args.source)) {
        continue;
      }
      let output = plugin.resolve(&self.context, args).await.map_err(|cause| CompileError::PluginHook {
        id: args.importer.map_or_else(|| args.source.to_string(), ToString::to_string),
        plugin: plugin_name.to_string(),
        hook: "resolve".to_string(),
        cause,
      })?;
      if let Some(output) = output {
        let id = output.module_id(&self.options().root);
        tracing::trace!(plugin = %plugin_name, source = args.source, %id, "resolved");
        self.record_manager().add_resolve_record(
          &id,
          ResolveRecord {
            plugin: plugin_name.to_string(),
            hook: "resolve".to_string(),
            source: args.source.to_string(),
            importer: args.importer.cloned(),
            kind: args.kind.clone(),
            is_hmr: args.is_hmr,
          },
        );
        return Ok(Some(output));
      }
    }
    Ok(None)
  }

  pub async fn load(&self, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    for (plugin, filters) in &self.plugins {
      if filters.load.as_ref().is_some_and(|filter| !filter.matches(args.resolved_path)) {
        continue;
      }
      let plugin_name = plugin.name();
      let output = plugin.load(&self.context, args).await.map_err(|cause| CompileError::Load {
        id: args.id.to_string(),
        plugin: plugin_name.to_string(),
        hook: "load".to_string(),
        cause,
      })?;
      if let Some(output) = output {
        let module_type =
          output.module_type.clone().unwrap_or_else(|| ModuleType::from_path(args.resolved_path));
        tracing::trace!(plugin = %plugin_name, id = %args.id, "loaded");
        self.record_manager().add_process_record(
          args.id,
          ProcessRecord {
            plugin: plugin_name.to_string(),
            hook: "load".to_string(),
            module_type,
            is_hmr: args.is_hmr,
          },
        );
        return Ok(Some(output));
      }
    }
    Ok(None)
  }

  /// Runs every matching transform in order. Each step sees the output of the previous one, and
  /// each source map it returns is appended to the chain.
  pub async fn transform(
    &self,
    id: &ModuleId,
    resolved_path: &str,
    is_hmr: bool,
    mut module: TransformedModule,
  ) -> anyhow::Result<TransformedModule> {
    for (plugin, filters) in &self.plugins {
      if filters
        .transform
        .as_ref()
        .is_some_and(|filter| !filter.matches(resolved_path, &module.module_type))
      {
        continue;
      }
      let plugin_name = plugin.name();
      let args = HookTransformArgs {
        id,
        resolved_path,
        content: &module.content,
        module_type: &module.module_type,
        source_map_chain: &module.source_map_chain,
        is_hmr,
      };
      let output = plugin.transform(&self.context, &args).await.map_err(|cause| {
        CompileError::Transform {
          id: id.to_string(),
          plugin: plugin_name.to_string(),
          hook: "transform".to_string(),
          cause,
        }
      })?;
      let Some(output) = output else { continue };

      module.content = output.content;
      if let Some(module_type) = output.module_type {
        module.module_type = module_type;
      }
      if let Some(source_map) = &output.source_map {
        module.source_map_chain.push(source_map.clone());
      }
      self.record_manager().add_transform_record(
        id,
        TransformRecord {
          plugin: plugin_name.to_string(),
          hook: "transform".to_string(),
          content: module.content.clone(),
          source_map: output.source_map,
          module_type: module.module_type.clone(),
          is_hmr,
        },
      );
    }
    Ok(module)
  }

  /// Every plugin adds to `args.deps`. A plugin that reports nothing leaves no record.
  pub async fn analyze_deps(&self, args: &mut HookAnalyzeDepsArgs<'_>) -> HookNoopReturn {
    for (plugin, _) in &self.plugins {
      let plugin_name = plugin.name();
      let before = (args.deps.clone(), args.hmr_self_accepted);
      plugin.analyze_deps(&self.context, args).await.map_err(|cause| CompileError::AnalyzeDeps {
        id: args.id.to_string(),
        plugin: plugin_name.to_string(),
        hook: "analyze_deps".to_string(),
        cause,
      })?;
      if before != (args.deps.clone(), args.hmr_self_accepted) {
        self.record_manager().add_analyze_deps_record(
          args.id,
          AnalyzeDepsRecord {
            plugin: plugin_name.to_string(),
            hook: "analyze_deps".to_string(),
            module_type: args.module_type.clone(),
            deps: args.deps.clone(),
            is_hmr: args.is_hmr,
          },
        );
      }
    }
    Ok(())
  }

  pub async fn finalize_module(&self, args: &mut HookFinalizeModuleArgs<'_>) -> HookNoopReturn {
    for (plugin, _) in &self.plugins {
      let plugin_name = plugin.name();
      let before = (args.module.module_type.clone(), args.module.side_effects);
      plugin.finalize_module(&self.context, args).await.map_err(|cause| {
        CompileError::PluginHook {
          id: args.module.id.to_string(),
          plugin: plugin_name.to_string(),
          hook: "finalize_module".to_string(),
          cause,
        }
      })?;
      if before != (args.module.module_type.clone(), args.module.side_effects) {
        self.record_manager().add_process_record(
          &args.module.id,
          ProcessRecord {
            plugin: plugin_name.to_string(),
            hook: "finalize_module".to_string(),
            module_type: args.module.module_type.clone(),
            is_hmr: args.is_hmr,
          },
        );
      }
    }
    Ok(())
  }
}
