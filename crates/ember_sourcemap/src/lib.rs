mod lines_count;
mod source;
mod source_joiner;

pub use crate::lines_count::lines_count;
pub use crate::source::{Source, SourceMapSource};
pub use crate::source_joiner::{JoinedSource, SourceJoiner};
pub use oxc_sourcemap::{SourceMap, SourceMapBuilder};
