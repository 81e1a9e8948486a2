pub mod generation;
pub mod module_loader_msg;

use std::sync::Arc;

use ember_common::NormalizedCompilerOptions;
use ember_fs::FileSystem;

pub type SharedOptions = Arc<NormalizedCompilerOptions>;
pub type SharedFileSystem = Arc<dyn FileSystem>;
