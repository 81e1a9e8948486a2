use std::sync::Arc;

use ember_plugin::SharedPluginDriver;
use tokio::sync::{mpsc::Sender, Semaphore};

use crate::types::{module_loader_msg::ModuleLoaderMsg, SharedOptions};

/// Used to store common data shared between all tasks.
pub struct TaskContext {
  pub options: SharedOptions,
  pub plugin_driver: SharedPluginDriver,
  pub tx: Sender<ModuleLoaderMsg>,
  /// Bounds how many module tasks run their hooks at the same time.
  pub permits: Arc<Semaphore>,
  pub is_hmr: bool,
  pub generation: u64,
}
