mod partition_policy;
mod plugin;
mod plugin_context;
mod plugin_driver;
mod types;

pub use crate::{
  partition_policy::PartitionPolicy,
  plugin::{
    HookLoadReturn, HookNoopReturn, HookRenderResourcePotReturn, HookResolveReturn,
    HookTransformReturn, Plugin, SharedPlugin,
  },
  plugin_context::PluginContext,
  plugin_driver::{PluginDriver, SharedPluginDriver, TransformedModule},
  types::{
    hook_analyze_deps::HookAnalyzeDepsArgs,
    hook_filter::{LoadHookFilter, ResolveHookFilter, TransformHookFilter},
    hook_finalize_module::HookFinalizeModuleArgs,
    hook_load::{HookLoadArgs, HookLoadOutput},
    hook_resolve::{HookResolveArgs, HookResolveOutput},
    hook_resource_pot::{
      HookGenerateResourcesArgs, HookProcessResourcePotsArgs, HookRenderResourcePotArgs,
      RenderedResourcePot,
    },
    hook_transform::{HookTransformArgs, HookTransformOutput},
  },
};
