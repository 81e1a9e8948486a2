use std::fmt::Display;

use arcstr::ArcStr;

use crate::{ModuleId, ModuleType};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourcePotType {
  Js,
  Css,
  Html,
  Asset,
  Custom(String),
}

impl ResourcePotType {
  pub fn ext(&self) -> &str {
    match self {
      Self::Js => "js",
      Self::Css => "css",
      Self::Html => "html",
      Self::Asset => "asset",
      Self::Custom(ext) => ext,
    }
  }
}

impl From<&ModuleType> for ResourcePotType {
  fn from(module_type: &ModuleType) -> Self {
    match module_type {
      ModuleType::Js | ModuleType::Jsx | ModuleType::Ts | ModuleType::Tsx | ModuleType::Json => {
        Self::Js
      }
      ModuleType::Css => Self::Css,
      ModuleType::Html => Self::Html,
      ModuleType::Asset => Self::Asset,
      ModuleType::Custom(custom) => Self::Custom(custom.clone()),
    }
  }
}

impl Display for ResourcePotType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.ext())
  }
}

/// A group of modules rendered together into one or more resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePot {
  /// `{name}_{ext}`, unique within a generation.
  pub id: ArcStr,
  pub name: ArcStr,
  pub resource_pot_type: ResourcePotType,
  /// Members in rendering order.
  pub modules: Vec<ModuleId>,
  /// The entry module this pot was created for, if any.
  pub entry_module: Option<ModuleId>,
  /// Every member is immutable.
  pub immutable: bool,
  /// Name of the policy or plugin hook that produced the pot.
  pub created_by: ArcStr,
  /// Names of the resources rendered from this pot.
  pub resources: Vec<String>,
}

impl ResourcePot {
  pub fn new(
    name: impl Into<ArcStr>,
    resource_pot_type: ResourcePotType,
    created_by: impl Into<ArcStr>,
  ) -> Self {
    let name = name.into();
    Self {
      id: Self::gen_id(&name, &resource_pot_type),
      name,
      resource_pot_type,
      modules: vec![],
      entry_module: None,
      immutable: false,
      created_by: created_by.into(),
      resources: vec![],
    }
  }

  pub fn gen_id(name: &str, resource_pot_type: &ResourcePotType) -> ArcStr {
    arcstr::format!("{name}_{}", resource_pot_type.ext())
  }

  pub fn add_module(&mut self, id: ModuleId) {
    self.modules.push(id);
  }

  pub fn has_module(&self, id: &ModuleId) -> bool {
    self.modules.contains(id)
  }
}
