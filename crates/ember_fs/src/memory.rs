use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
};

use dashmap::DashMap;
use oxc_resolver::{FileMetadata, FileSystem as OxcResolverFileSystem};
use sugar_path::SugarPath;

use crate::FileSystem;

/// A file system kept entirely in memory. Paths are normalized on the way in and out, so
/// `/src/./a.js` and `/src/a.js` name the same file.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
  files: DashMap<PathBuf, Arc<[u8]>>,
}

impl MemoryFileSystem {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
    let fs = Self::default();
    for (path, content) in files {
      fs.write(path, content);
    }
    fs
  }

  pub fn write(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
    self.files.insert(path.as_ref().normalize(), Arc::from(content.as_ref()));
  }

  pub fn remove(&self, path: impl AsRef<Path>) -> bool {
    self.files.remove(&path.as_ref().normalize()).is_some()
  }

  /// Directories exist implicitly as ancestors of the stored files.
  fn is_dir(&self, path: &Path) -> bool {
    let path = path.normalize();
    self.files.iter().any(|entry| *entry.key() != path && entry.key().starts_with(&path))
  }
}

impl FileSystem for MemoryFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    self.files.get(&path.normalize()).map(|bytes| bytes.to_vec()).ok_or_else(|| {
      io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path.display()))
    })
  }

  fn is_file(&self, path: &Path) -> bool {
    self.files.contains_key(&path.normalize())
  }
}

impl OxcResolverFileSystem for MemoryFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let bytes = self.read(path)?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
  }

  fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    if self.is_file(path) {
      Ok(FileMetadata::new(true, false, false))
    } else if self.is_dir(path) {
      Ok(FileMetadata::new(false, true, false))
    } else {
      Err(io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path.display())))
    }
  }

  fn symlink_metadata(&self, path: &Path) -> io::Result<FileMetadata> {
    self.metadata(path)
  }

  fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
    Err(io::Error::new(io::ErrorKind::InvalidInput, format!("{} is not a symlink", path.display())))
  }
}

#[test]
fn test_memory_file_system() {
  let fs = MemoryFileSystem::with_files([("/src/a.js", "export default 1")]);

  assert!(fs.is_file(Path::new("/src/./a.js")));
  assert!(fs.is_dir(Path::new("/src")));
  assert!(!fs.is_dir(Path::new("/src/a.js")));
  assert!(fs.metadata(Path::new("/lib")).is_err());
  assert_eq!(fs.read_to_string(Path::new("/src/a.js")).unwrap(), "export default 1");

  assert!(fs.remove("/src/a.js"));
  assert!(fs.read(Path::new("/src/a.js")).is_err());
}
