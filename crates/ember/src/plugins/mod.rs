mod fs_load;
mod fs_resolve;

pub use fs_load::FsLoadPlugin;
pub use fs_resolve::FsResolvePlugin;
