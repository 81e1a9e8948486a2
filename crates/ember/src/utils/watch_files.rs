use std::path::Path;

use ember_common::{ModuleGraph, ModuleId, WatchGraph};
use ember_plugin::PluginDriver;
use sugar_path::SugarPath;

/// Absolute, slash separated form used for watched files and changed paths.
pub fn normalize_watch_path(path: &Path, root: &Path) -> String {
  path.absolutize_with(root).to_slash_lossy().into_owned()
}

/// Moves the watch files registered by plugins during a build into `watch_graph`. Modules in
/// `rebuilt` lose the files they registered in earlier builds, and roots that left the graph are
/// dropped.
pub fn apply_watch_files(
  plugin_driver: &PluginDriver,
  watch_graph: &mut WatchGraph,
  module_graph: &ModuleGraph,
  rebuilt: &[ModuleId],
) {
  let root = &plugin_driver.options().root;
  for id in rebuilt {
    watch_graph.remove_root(id);
  }
  for (from, to) in plugin_driver.context().take_watch_files() {
    watch_graph.add_watch_files(from, [normalize_watch_path(Path::new(&to), root)]);
  }
  watch_graph.retain_roots(|id| module_graph.has_module(id));
}

#[test]
fn test_normalize_watch_path() {
  let root = Path::new("/project");
  assert_eq!(normalize_watch_path(Path::new("config/../a.json"), root), "/project/a.json");
  assert_eq!(normalize_watch_path(Path::new("/etc/./hosts"), root), "/etc/hosts");
}
