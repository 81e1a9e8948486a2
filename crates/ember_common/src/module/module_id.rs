use std::{
  fmt::Display,
  path::{Path, PathBuf},
};

use arcstr::ArcStr;
use sugar_path::SugarPath;

/// `ModuleId` is the unique string identifier for each module.
/// - It is the root-relative, slash-separated resolved path plus an optional `?query` variant.
/// - It stays stable across incremental rebuilds as long as resolution doesn't change, so it is
///   safe to hold on to a `ModuleId` between generations.
/// - External modules use the import specifier verbatim.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(resolved_path: &str, query: &str, root: &Path) -> Self {
    let relative = stabilize_path(resolved_path, root);
    let query = query.trim_start_matches('?');
    if query.is_empty() {
      Self(relative.into())
    } else {
      Self(format!("{relative}?{query}").into())
    }
  }

  pub fn external(specifier: &str) -> Self {
    Self(specifier.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn relative_path(&self) -> &str {
    self.0.split_once('?').map_or(&self.0, |(path, _)| path)
  }

  pub fn query_string(&self) -> &str {
    self.0.split_once('?').map_or("", |(_, query)| query)
  }

  pub fn resolved_path(&self, root: &Path) -> PathBuf {
    Path::new(self.relative_path()).absolutize_with(root)
  }
}

/// Root-relative, slash separated form of `path`. Paths that are not absolute are left alone.
pub fn stabilize_path(path: &str, root: &Path) -> String {
  let path = Path::new(path);
  if path.is_absolute() {
    path.relative(root).to_slash_lossy().into_owned()
  } else {
    path.to_slash_lossy().into_owned()
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self(value.into())
  }
}
