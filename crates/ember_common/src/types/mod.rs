pub mod analyzed_dependency;
pub mod resolve_kind;
pub mod update;
pub mod watch_graph;
