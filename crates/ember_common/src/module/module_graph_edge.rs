use arcstr::ArcStr;

use crate::ResolveKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGraphEdgeDataItem {
  /// The specifier as written in the importer.
  pub source: ArcStr,
  pub kind: ResolveKind,
  /// Position of the dependency in the importer's analyzed dependency list.
  pub order: usize,
  pub hmr_accepted: bool,
}

/// All the ways one module depends on another. A module may import the same dependency
/// statically and dynamically, or through two different specifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleGraphEdge(Vec<ModuleGraphEdgeDataItem>);

impl ModuleGraphEdge {
  pub fn new(item: ModuleGraphEdgeDataItem) -> Self {
    Self(vec![item])
  }

  pub fn items(&self) -> &[ModuleGraphEdgeDataItem] {
    &self.0
  }

  /// Returns `false` if an item with the same `(source, kind)` already exists. Its
  /// `hmr_accepted` flag is merged in that case.
  pub fn add_item(&mut self, item: ModuleGraphEdgeDataItem) -> bool {
    if let Some(existing) =
      self.0.iter_mut().find(|existing| existing.source == item.source && existing.kind == item.kind)
    {
      existing.hmr_accepted |= item.hmr_accepted;
      existing.order = existing.order.min(item.order);
      return false;
    }
    self.0.push(item);
    self.0.sort_by_key(|item| item.order);
    true
  }

  /// At least one item is not a dynamic import.
  pub fn is_static(&self) -> bool {
    self.0.iter().any(|item| item.kind.is_static())
  }

  pub fn is_dynamic(&self) -> bool {
    self.0.iter().any(|item| item.kind.is_dynamic())
  }

  pub fn hmr_accepted(&self) -> bool {
    self.0.iter().any(|item| item.hmr_accepted)
  }

  pub fn order(&self) -> usize {
    self.0.first().map_or(usize::MAX, |item| item.order)
  }
}

#[test]
fn test_duplicate_items_collapse() {
  let item = |source: &str, kind, order| ModuleGraphEdgeDataItem {
    source: source.into(),
    kind,
    order,
    hmr_accepted: false,
  };
  let mut edge = ModuleGraphEdge::new(item("./b", ResolveKind::Import, 1));

  assert!(!edge.add_item(ModuleGraphEdgeDataItem { hmr_accepted: true, ..item("./b", ResolveKind::Import, 3) }));
  assert!(edge.add_item(item("./b", ResolveKind::DynamicImport, 0)));

  assert_eq!(edge.items().len(), 2);
  assert_eq!(edge.order(), 0);
  assert!(edge.is_static() && edge.is_dynamic() && edge.hmr_accepted());
}
