use std::path::PathBuf;

use ember_common::{PathChange, UpdateResult, UpdateType};
use ember_error::BuildResult;
use parking_lot::Mutex;

use crate::Compiler;

/// The file watcher the compiler is driven by. The compiler never polls the file system, it only
/// tells the watcher which paths to observe.
pub trait FileWatcher: Send + Sync {
  fn watch(&self, paths: &[String]) -> anyhow::Result<()>;

  fn unwatch(&self, paths: &[String]) -> anyhow::Result<()>;
}

/// Paths reported by the watcher in one batch. `add` holds created or modified files, `remove`
/// deleted ones.
#[derive(Debug, Clone, Default)]
pub struct WatchEvent {
  pub add: Vec<PathBuf>,
  pub remove: Vec<PathBuf>,
}

/// Connects a [`FileWatcher`] to a [`Compiler`]: turns watcher batches into updates and keeps the
/// watched set in line with the published generation.
pub struct WatchBridge<W> {
  compiler: Compiler,
  watcher: W,
  /// Sorted paths currently handed to the watcher.
  watched: Mutex<Vec<String>>,
}

impl<W: FileWatcher> WatchBridge<W> {
  pub fn new(compiler: Compiler, watcher: W) -> Self {
    Self { compiler, watcher, watched: Mutex::default() }
  }

  pub fn compiler(&self) -> &Compiler {
    &self.compiler
  }

  pub fn watcher(&self) -> &W {
    &self.watcher
  }

  /// Brings the watcher in line with [`Compiler::watch_modules`]: new paths are watched and
  /// paths the published generation no longer depends on are unwatched. Call it again after
  /// [`Compiler::add_watch_files`].
  pub fn watch_all(&self) -> anyhow::Result<()> {
    let next = self.compiler.watch_modules();
    let mut watched = self.watched.lock();

    let added =
      next.iter().filter(|path| watched.binary_search(*path).is_err()).cloned().collect::<Vec<_>>();
    let removed =
      watched.iter().filter(|path| next.binary_search(*path).is_err()).cloned().collect::<Vec<_>>();
    if !added.is_empty() {
      self.watcher.watch(&added)?;
    }
    if !removed.is_empty() {
      self.watcher.unwatch(&removed)?;
    }
    tracing::trace!(added = added.len(), removed = removed.len(), "synced watched paths");

    *watched = next;
    Ok(())
  }

  /// Runs a synchronous update for `event` and applies the resulting watch changes.
  pub async fn on_event(&self, event: WatchEvent) -> BuildResult<UpdateResult> {
    let changes = event
      .add
      .into_iter()
      .map(|path| {
        let update_type =
          if self.compiler.has_module(&path) { UpdateType::Updated } else { UpdateType::Added };
        (path, update_type)
      })
      .chain(event.remove.into_iter().map(|path| (path, UpdateType::Removed)))
      .collect::<Vec<PathChange>>();

    let result = self.compiler.update(changes, None, true).await?;
    self.watch_all()?;
    Ok(result)
  }
}
