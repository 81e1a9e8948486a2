use std::{io, path::Path};

use oxc_resolver::FileSystem as OxcResolverFileSystem;

/// Everything the built-in plugins need from a file system. The compiler core never touches the
/// file system directly. Resolution goes through the [`OxcResolverFileSystem`] half.
pub trait FileSystem: Send + Sync + OxcResolverFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  fn is_file(&self, path: &Path) -> bool;
}
