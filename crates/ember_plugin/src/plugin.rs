use std::{borrow::Cow, sync::Arc};

use crate::{
  HookAnalyzeDepsArgs, HookFinalizeModuleArgs, HookGenerateResourcesArgs, HookLoadArgs,
  HookLoadOutput, HookProcessResourcePotsArgs, HookRenderResourcePotArgs, HookResolveArgs,
  HookResolveOutput, HookTransformArgs, HookTransformOutput, LoadHookFilter, PluginContext,
  RenderedResourcePot, ResolveHookFilter, TransformHookFilter,
};

pub type HookResolveReturn = anyhow::Result<Option<HookResolveOutput>>;
pub type HookLoadReturn = anyhow::Result<Option<HookLoadOutput>>;
pub type HookTransformReturn = anyhow::Result<Option<HookTransformOutput>>;
pub type HookRenderResourcePotReturn = anyhow::Result<Option<RenderedResourcePot>>;
pub type HookNoopReturn = anyhow::Result<()>;

/// A set of optional hooks. Every hook has a no-op default, so a plugin only implements the
/// stages it takes part in.
///
/// Plugins run in registration order. `resolve`, `load` and `render_resource_pot` stop at the
/// first plugin that returns `Some`. The other hooks run for every plugin.
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> Cow<'static, str>;

  fn resolve_filter(&self) -> Option<ResolveHookFilter> {
    None
  }

  fn load_filter(&self) -> Option<LoadHookFilter> {
    None
  }

  fn transform_filter(&self) -> Option<TransformHookFilter> {
    None
  }

  /// Runs before every compile and update, ahead of the first `resolve`.
  async fn build_start(&self, _ctx: &PluginContext) -> HookNoopReturn {
    Ok(())
  }

  async fn resolve(&self, _ctx: &PluginContext, _args: &HookResolveArgs<'_>) -> HookResolveReturn {
    Ok(None)
  }

  async fn load(&self, _ctx: &PluginContext, _args: &HookLoadArgs<'_>) -> HookLoadReturn {
    Ok(None)
  }

  async fn transform(
    &self,
    _ctx: &PluginContext,
    _args: &HookTransformArgs<'_>,
  ) -> HookTransformReturn {
    Ok(None)
  }

  async fn analyze_deps(
    &self,
    _ctx: &PluginContext,
    _args: &mut HookAnalyzeDepsArgs<'_>,
  ) -> HookNoopReturn {
    Ok(())
  }

  async fn finalize_module(
    &self,
    _ctx: &PluginContext,
    _args: &mut HookFinalizeModuleArgs<'_>,
  ) -> HookNoopReturn {
    Ok(())
  }

  async fn process_resource_pots(
    &self,
    _ctx: &PluginContext,
    _args: &mut HookProcessResourcePotsArgs<'_>,
  ) -> HookNoopReturn {
    Ok(())
  }

  async fn render_resource_pot(
    &self,
    _ctx: &PluginContext,
    _args: &HookRenderResourcePotArgs<'_>,
  ) -> HookRenderResourcePotReturn {
    Ok(None)
  }

  async fn generate_resources(
    &self,
    _ctx: &PluginContext,
    _args: &mut HookGenerateResourcesArgs<'_>,
  ) -> HookNoopReturn {
    Ok(())
  }
}

pub type SharedPlugin = Arc<dyn Plugin>;
