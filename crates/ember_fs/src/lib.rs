mod file_system;
mod memory;
mod os;

pub use crate::file_system::FileSystem;
pub use memory::MemoryFileSystem;
pub use oxc_resolver::{FileMetadata, FileSystem as OxcResolverFileSystem};
pub use os::OsFileSystem;
