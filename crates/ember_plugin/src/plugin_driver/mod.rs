mod build_hooks;
mod generate_hooks;

use std::{
  borrow::Cow,
  sync::{Arc, Weak},
};

use ember_common::{
  ModuleId, NormalizedCompilerOptions, RecordManager, ResourcePot, ResourcePotRecord,
  SharedNormalizedCompilerOptions,
};

use crate::{
  LoadHookFilter, PluginContext, ResolveHookFilter, SharedPlugin, TransformHookFilter,
};

pub use self::build_hooks::TransformedModule;

/// Filters are read once when the driver is created.
struct PluginFilters {
  resolve: Option<ResolveHookFilter>,
  load: Option<LoadHookFilter>,
  transform: Option<TransformHookFilter>,
}

pub struct PluginDriver {
  plugins: Vec<(SharedPlugin, PluginFilters)>,
  context: PluginContext,
}

pub type SharedPluginDriver = Arc<PluginDriver>;

impl PluginDriver {
  pub fn new_shared(
    plugins: Vec<SharedPlugin>,
    options: SharedNormalizedCompilerOptions,
    record_manager: Arc<RecordManager>,
  ) -> SharedPluginDriver {
    Arc::new_cyclic(|driver| Self {
      plugins: plugins
        .into_iter()
        .map(|plugin| {
          let filters = PluginFilters {
            resolve: plugin.resolve_filter(),
            load: plugin.load_filter(),
            transform: plugin.transform_filter(),
          };
          (plugin, filters)
        })
        .collect(),
      context: PluginContext::new(Weak::clone(driver), options, record_manager),
    })
  }

  pub fn context(&self) -> &PluginContext {
    &self.context
  }

  pub fn options(&self) -> &NormalizedCompilerOptions {
    self.context.options()
  }

  pub fn record_manager(&self) -> &RecordManager {
    self.context.record_manager()
  }

  pub fn plugin_names(&self) -> Vec<Cow<'static, str>> {
    self.plugins.iter().map(|(plugin, _)| plugin.name()).collect()
  }

  /// Records a resource pot step under the pot id and under every member module.
  pub fn add_resource_pot_record(
    &self,
    resource_pot: &ResourcePot,
    name: &str,
    hook: &str,
    is_hmr: bool,
  ) {
    let record = ResourcePotRecord {
      name: name.to_string(),
      hook: hook.to_string(),
      resource_pot: resource_pot.id.clone(),
      modules: resource_pot.modules.clone(),
      resources: resource_pot.resources.clone(),
      is_hmr,
    };
    let record_manager = self.record_manager();
    let ids = std::iter::once(resource_pot.id.as_str())
      .chain(resource_pot.modules.iter().map(ModuleId::as_str));
    for id in ids {
      record_manager.add_resource_pot_record(id, record.clone());
    }
  }
}

impl std::fmt::Debug for PluginDriver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PluginDriver").field("plugins", &self.plugin_names()).finish()
  }
}
