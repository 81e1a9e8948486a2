pub mod module_graph;
pub mod module_graph_edge;
pub mod module_id;
pub mod module_type;

use arcstr::ArcStr;

use crate::{ModuleId, ModuleType};

/// A single source unit after loading, transforming and dependency analysis.
#[derive(Debug, Clone)]
pub struct Module {
  pub id: ModuleId,
  pub module_type: ModuleType,
  /// Transformed content, the output of the last transform hook.
  pub content: ArcStr,
  /// Hash of the module type and transformed content. Drives change detection.
  pub content_hash: String,
  /// One source map per transform step that produced one, in application order.
  pub source_map_chain: Vec<ArcStr>,
  pub side_effects: bool,
  pub external: bool,
  /// Lives under an immutable location such as `node_modules`.
  pub immutable: bool,
  /// The module accepts its own hot updates.
  pub hmr_accepted: bool,
  /// Set on placeholder modules that failed to build and on modules with unresolved imports.
  pub error: Option<ArcStr>,
  /// Generation in which this module was last (re)built.
  pub last_update_generation: u64,
}

impl Module {
  pub fn new(id: ModuleId, module_type: ModuleType) -> Self {
    Self {
      id,
      module_type,
      content: ArcStr::new(),
      content_hash: String::new(),
      source_map_chain: vec![],
      side_effects: true,
      external: false,
      immutable: false,
      hmr_accepted: false,
      error: None,
      last_update_generation: 0,
    }
  }

  pub fn external(id: ModuleId) -> Self {
    let mut module = Self::new(id, ModuleType::Js);
    module.external = true;
    module
  }

  /// Stand-in for a module whose build failed, so that dependents still see it in the graph.
  pub fn placeholder(id: ModuleId, error: impl Into<ArcStr>) -> Self {
    let module_type = ModuleType::from_path(&id);
    let mut module = Self::new(id, module_type);
    module.error = Some(error.into());
    module
  }

  /// A placeholder has no content. A module with an unresolved import still has content.
  pub fn is_placeholder(&self) -> bool {
    self.error.is_some() && self.content_hash.is_empty()
  }
}
