pub mod normalize_options;
pub mod watch_files;
