pub mod resource_pot;

use std::sync::Arc;

use arcstr::ArcStr;

use crate::ResourcePotType;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceType {
  Js,
  Css,
  Html,
  Asset(String),
  SourceMap,
  Custom(String),
}

impl From<&ResourcePotType> for ResourceType {
  fn from(value: &ResourcePotType) -> Self {
    match value {
      ResourcePotType::Js => Self::Js,
      ResourcePotType::Css => Self::Css,
      ResourcePotType::Html => Self::Html,
      ResourcePotType::Asset => Self::Asset(String::new()),
      ResourcePotType::Custom(custom) => Self::Custom(custom.clone()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceOrigin {
  ResourcePot(ArcStr),
}

/// A named output artifact. Bytes are shared, so a resource carried over from the previous
/// generation points at the same allocation.
#[derive(Debug, Clone)]
pub struct Resource {
  pub name: String,
  pub bytes: Arc<[u8]>,
  pub resource_type: ResourceType,
  pub origin: ResourceOrigin,
  /// Whether the resource is written out. Plugins may clear it for resources that are only
  /// consumed by later hooks.
  pub emitted: bool,
}

impl Resource {
  pub fn new(
    name: String,
    bytes: impl Into<Arc<[u8]>>,
    resource_type: ResourceType,
    resource_pot: &ArcStr,
  ) -> Self {
    Self {
      name,
      bytes: bytes.into(),
      resource_type,
      origin: ResourceOrigin::ResourcePot(resource_pot.clone()),
      emitted: true,
    }
  }

  pub fn resource_pot(&self) -> &ArcStr {
    match &self.origin {
      ResourceOrigin::ResourcePot(id) => id,
    }
  }
}
