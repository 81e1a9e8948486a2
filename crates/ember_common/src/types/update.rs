use std::path::PathBuf;

use ember_utils::indexmap::FxIndexMap;

use crate::ModuleId;

/// What happened to a path reported by the file watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateType {
  Added,
  Updated,
  Removed,
}

/// Files the watcher should start or stop watching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchDiff {
  pub add: Vec<String>,
  pub remove: Vec<String>,
}

impl WatchDiff {
  pub fn is_empty(&self) -> bool {
    self.add.is_empty() && self.remove.is_empty()
  }
}

/// Changed module -> chains of module ids, each starting at the changed module and ending at the
/// module that accepts the update, or at an entry.
pub type HmrBoundaries = FxIndexMap<ModuleId, Vec<Vec<ModuleId>>>;

/// Resource pot id -> ids of the pots only reachable from it over dynamic imports.
pub type DynamicResourcesMap = FxIndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Default)]
pub struct UpdateResult {
  pub added: Vec<ModuleId>,
  pub changed: Vec<ModuleId>,
  pub removed: Vec<ModuleId>,
  pub immutable_modules: Vec<ModuleId>,
  pub mutable_modules: Vec<ModuleId>,
  pub boundaries: HmrBoundaries,
  /// Only present when pot membership changed.
  pub dynamic_resources_map: Option<DynamicResourcesMap>,
  pub extra_watch_result: WatchDiff,
  /// Some boundary chain reached an entry without an accepting module.
  pub reload_required: bool,
  /// Names of the resources whose bytes were rendered again.
  pub regenerated_resources: Vec<String>,
  /// The generation published by this update.
  pub generation: u64,
}

impl UpdateResult {
  pub fn is_empty(&self) -> bool {
    self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
  }
}

/// A changed path as handed to `update`.
pub type PathChange = (PathBuf, UpdateType);
