use std::path::Path;

use arcstr::ArcStr;
use ember_common::{ModuleGraph, ModuleId, NormalizedCompilerOptions, ResourcePot, ResourcePotType};
use ember_error::CompileError;
use ember_plugin::PartitionPolicy;
use ember_utils::{indexmap::FxIndexMap, path_ext::PathExt, sanitize_file_name::sanitize_file_name};
use rustc_hash::{FxHashMap, FxHashSet};

/// Puts modules matching an `enforceResources` rule into the named pot. Every other module goes
/// into a pot shared by exactly the entries and dynamic-import targets that statically reach it,
/// split by resource pot type.
#[derive(Debug, Default)]
pub struct DefaultPartitionPolicy;

impl DefaultPartitionPolicy {
  pub const NAME: &'static str = "ember:default-partition";
}

struct Group {
  root: ModuleId,
  name: String,
}

impl PartitionPolicy for DefaultPartitionPolicy {
  fn name(&self) -> &str {
    Self::NAME
  }

  fn partition(
    &self,
    module_graph: &ModuleGraph,
    options: &NormalizedCompilerOptions,
  ) -> anyhow::Result<Vec<ResourcePot>> {
    let sorted_modules = module_graph.sorted_modules();
    let groups = collect_groups(module_graph, &sorted_modules);

    // Module -> indices of the groups that statically reach it, ascending.
    let mut reached_by: FxHashMap<&ModuleId, Vec<usize>> = FxHashMap::default();
    for (group_idx, group) in groups.iter().enumerate() {
      let mut stack = vec![&group.root];
      let mut visited = FxHashSet::default();
      while let Some(id) = stack.pop() {
        if !visited.insert(id) {
          continue;
        }
        reached_by.entry(id).or_default().push(group_idx);
        for (dep, edge) in module_graph.dependencies(id) {
          if edge.is_static() {
            stack.push(dep);
          }
        }
      }
    }

    let mut pots: FxIndexMap<ArcStr, ResourcePot> = FxIndexMap::default();
    let mut group_names: FxHashMap<Vec<usize>, String> = FxHashMap::default();

    for id in &sorted_modules {
      let Some(module) = module_graph.module(id) else { continue };
      if module.external {
        continue;
      }
      let resource_pot_type = ResourcePotType::from(&module.module_type);

      let (name, entry_module) = match options.enforced_resource(id) {
        Some(enforced) => (sanitize_file_name(&enforced.name), None),
        None => {
          let group_key = reached_by.get(id).cloned().unwrap_or_default();
          let name = group_names
            .entry(group_key.clone())
            .or_insert_with(|| group_name(&groups, &group_key))
            .clone();
          let entry_module = match group_key.as_slice() {
            [group_idx] => Some(groups[*group_idx].root.clone()),
            _ => None,
          };
          (name, entry_module)
        }
      };

      let pot_id = ResourcePot::gen_id(&name, &resource_pot_type);
      let pot = pots.entry(pot_id).or_insert_with(|| {
        let mut pot = ResourcePot::new(name.as_str(), resource_pot_type, Self::NAME);
        pot.entry_module = entry_module;
        pot.immutable = true;
        pot
      });
      pot.immutable &= module.immutable;
      pot.add_module(id.clone());
    }

    let mut pots = pots.into_values().collect::<Vec<_>>();
    pots.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(pots)
  }
}

/// Entries in configuration order, then dynamic-import targets in graph order.
fn collect_groups(module_graph: &ModuleGraph, sorted_modules: &[ModuleId]) -> Vec<Group> {
  let mut groups = module_graph
    .entries
    .iter()
    .filter(|(id, _)| module_graph.has_module(id))
    .map(|(id, name)| Group { root: id.clone(), name: sanitize_file_name(name) })
    .collect::<Vec<_>>();

  let mut dynamic_roots = FxHashSet::default();
  for id in sorted_modules {
    for (dep, edge) in module_graph.dependencies(id) {
      if edge.is_dynamic() && !module_graph.is_entry(dep) {
        dynamic_roots.insert(dep);
      }
    }
  }
  groups.extend(sorted_modules.iter().filter(|id| dynamic_roots.contains(id)).map(|id| Group {
    root: id.clone(),
    name: sanitize_file_name(&Path::new(id.relative_path()).representative_file_name()),
  }));
  groups
}

fn group_name(groups: &[Group], group_key: &[usize]) -> String {
  match group_key {
    [] => "common".to_string(),
    [group_idx] => groups[*group_idx].name.clone(),
    _ => {
      let names = group_key.iter().map(|idx| groups[*idx].name.as_str()).collect::<Vec<_>>();
      format!("shared-{}", names.join("-"))
    }
  }
}

/// Every non-external module must live in exactly one pot.
pub fn validate_resource_pots(
  module_graph: &ModuleGraph,
  resource_pots: &[ResourcePot],
) -> Result<(), CompileError> {
  let mut seen = FxHashMap::default();
  for pot in resource_pots {
    for id in &pot.modules {
      if let Some(other) = seen.insert(id, &pot.id) {
        return Err(CompileError::config(format!(
          "Module {id} was placed into both resource pot {other} and {}",
          pot.id
        )));
      }
    }
  }
  for module in module_graph.modules() {
    if !module.external && !seen.contains_key(&module.id) {
      return Err(CompileError::config(format!(
        "Module {} was not placed into any resource pot",
        module.id
      )));
    }
  }
  Ok(())
}
