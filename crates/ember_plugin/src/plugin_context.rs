use std::sync::{Arc, Weak};

use ember_common::{
  ModuleId, NormalizedCompilerOptions, RecordManager, SharedNormalizedCompilerOptions,
};
use parking_lot::Mutex;

use crate::{HookResolveArgs, HookResolveReturn, PluginDriver};

/// Handed to every hook. Gives plugins access to the options and lets them call back into the
/// driver.
pub struct PluginContext {
  options: SharedNormalizedCompilerOptions,
  driver: Weak<PluginDriver>,
  record_manager: Arc<RecordManager>,
  watch_files: Mutex<Vec<(ModuleId, String)>>,
}

impl PluginContext {
  pub(crate) fn new(
    driver: Weak<PluginDriver>,
    options: SharedNormalizedCompilerOptions,
    record_manager: Arc<RecordManager>,
  ) -> Self {
    Self { options, driver, record_manager, watch_files: Mutex::default() }
  }

  pub fn options(&self) -> &NormalizedCompilerOptions {
    &self.options
  }

  pub fn record_manager(&self) -> &RecordManager {
    &self.record_manager
  }

  /// Resolves `args` with every plugin except `caller`, so a plugin can delegate to the others
  /// from inside its own resolve hook without recursing into itself.
  pub async fn resolve(&self, args: &HookResolveArgs<'_>, caller: &str) -> HookResolveReturn {
    let Some(driver) = self.driver.upgrade() else {
      anyhow::bail!("Plugin driver is no longer alive");
    };
    driver.resolve(args, Some(caller)).await
  }

  /// Declares that module `from` depends on the file `to` without importing it. A change to `to`
  /// rebuilds `from`.
  pub fn add_watch_file(&self, from: &ModuleId, to: impl Into<String>) {
    self.watch_files.lock().push((from.clone(), to.into()));
  }

  /// Drains the watch files registered since the last call.
  pub fn take_watch_files(&self) -> Vec<(ModuleId, String)> {
    std::mem::take(&mut *self.watch_files.lock())
  }
}

impl std::fmt::Debug for PluginContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PluginContext").field("root", &self.options.root).finish_non_exhaustive()
  }
}
