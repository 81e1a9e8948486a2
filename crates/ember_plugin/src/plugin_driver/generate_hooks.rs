use ember_error::CompileError;

use super::PluginDriver;
use crate::{
  HookGenerateResourcesArgs, HookNoopReturn, HookProcessResourcePotsArgs,
  HookRenderResourcePotArgs, HookRenderResourcePotReturn,
};

impl PluginDriver {
  pub async fn process_resource_pots(
    &self,
    args: &mut HookProcessResourcePotsArgs<'_>,
    is_hmr: bool,
  ) -> HookNoopReturn {
    for (plugin, _) in &self.plugins {
      let plugin_name = plugin.name();
      let before = args.resource_pots.clone();
      plugin.process_resource_pots(&self.context, args).await.map_err(|cause| {
        CompileError::PluginHook {
          id: "resource_pots".to_string(),
          plugin: plugin_name.to_string(),
          hook: "process_resource_pots".to_string(),
          cause,
        }
      })?;
      if before != *args.resource_pots {
        for resource_pot in args.resource_pots.iter() {
          self.add_resource_pot_record(resource_pot, &plugin_name, "process_resource_pots", is_hmr);
        }
      }
    }
    Ok(())
  }

  /// The first plugin that renders the pot wins. `Ok(None)` leaves rendering to the caller.
  pub async fn render_resource_pot(
    &self,
    args: &HookRenderResourcePotArgs<'_>,
    is_hmr: bool,
  ) -> HookRenderResourcePotReturn {
    for (plugin, _) in &self.plugins {
      let plugin_name = plugin.name();
      let rendered = plugin.render_resource_pot(&self.context, args).await.map_err(|cause| {
        CompileError::RenderResourcePot {
          id: args.resource_pot.id.to_string(),
          plugin: plugin_name.to_string(),
          hook: "render_resource_pot".to_string(),
          cause,
        }
      })?;
      if rendered.is_some() {
        self.add_resource_pot_record(args.resource_pot, &plugin_name, "render_resource_pot", is_hmr);
        return Ok(rendered);
      }
    }
    Ok(None)
  }

  pub async fn generate_resources(
    &self,
    args: &mut HookGenerateResourcesArgs<'_>,
  ) -> HookNoopReturn {
    for (plugin, _) in &self.plugins {
      plugin.generate_resources(&self.context, args).await.map_err(|cause| {
        CompileError::GenerateResources {
          id: args.resource_pot.id.to_string(),
          plugin: plugin.name().to_string(),
          hook: "generate_resources".to_string(),
          cause,
        }
      })?;
    }
    Ok(())
  }
}
