use ember_utils::indexmap::{FxIndexMap, FxIndexSet};

use crate::{ModuleId, WatchDiff};

/// Extra files a module depends on without importing them, such as a config file read by a
/// transform. A change to one of the files dirties every module that registered it.
#[derive(Debug, Clone, Default)]
pub struct WatchGraph {
  deps: FxIndexMap<ModuleId, FxIndexSet<String>>,
}

impl WatchGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_watch_files(&mut self, root: ModuleId, files: impl IntoIterator<Item = String>) {
    self.deps.entry(root).or_default().extend(files);
  }

  pub fn remove_root(&mut self, root: &ModuleId) {
    self.deps.shift_remove(root);
  }

  pub fn retain_roots(&mut self, mut f: impl FnMut(&ModuleId) -> bool) {
    self.deps.retain(|root, _| f(root));
  }

  /// Modules that registered `file`, sorted by id.
  pub fn roots_of(&self, file: &str) -> Vec<ModuleId> {
    let mut roots = self
      .deps
      .iter()
      .filter(|(_, files)| files.contains(file))
      .map(|(root, _)| root.clone())
      .collect::<Vec<_>>();
    roots.sort();
    roots
  }

  pub fn watched_files(&self, root: &ModuleId) -> Vec<String> {
    self.deps.get(root).map(|files| files.iter().cloned().collect()).unwrap_or_default()
  }

  /// Every watched file, sorted and deduplicated.
  pub fn files(&self) -> Vec<String> {
    let mut files = self.deps.values().flatten().cloned().collect::<Vec<_>>();
    files.sort();
    files.dedup();
    files
  }

  /// Files to start and stop watching when moving from `prev` to `self`.
  pub fn diff(&self, prev: &Self) -> WatchDiff {
    let current = self.files();
    let previous = prev.files();
    WatchDiff {
      add: current.iter().filter(|file| previous.binary_search(file).is_err()).cloned().collect(),
      remove: previous.iter().filter(|file| current.binary_search(file).is_err()).cloned().collect(),
    }
  }
}

#[test]
fn test_watch_graph_diff() {
  let mut prev = WatchGraph::new();
  prev.add_watch_files("a.js".into(), ["/p/a.config".to_string(), "/p/shared.json".to_string()]);

  let mut next = prev.clone();
  next.remove_root(&"a.js".into());
  next.add_watch_files("b.js".into(), ["/p/shared.json".to_string(), "/p/b.config".to_string()]);

  let diff = next.diff(&prev);
  assert_eq!(diff.add, ["/p/b.config"]);
  assert_eq!(diff.remove, ["/p/a.config"]);
  assert_eq!(next.roots_of("/p/shared.json"), [ModuleId::from("b.js")]);
}
