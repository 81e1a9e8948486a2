use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use super::{
  AnalyzeDepsRecord, ModuleRecords, ProcessRecord, ResolveRecord, ResourcePotRecord,
  TransformRecord,
};
use crate::ModuleId;

/// Append-only store of hook invocations.
///
/// Records produced while a generation is being built are held aside and only become visible
/// when that generation is published. A failed or cancelled build discards them.
#[derive(Debug, Default)]
pub struct RecordManager {
  committed: RwLock<FxHashMap<String, ModuleRecords>>,
  pending: Mutex<FxHashMap<String, ModuleRecords>>,
}

macro_rules! record_accessors {
  ($($add:ident, $get:ident, $field:ident, $record:ty;)*) => {
    $(
      pub fn $add(&self, id: &str, record: $record) {
        self.pending.lock().entry(id.to_string()).or_default().$field.push(record);
      }

      pub fn $get(&self, id: &str) -> Vec<$record> {
        self.committed.read().get(id).map(|records| records.$field.clone()).unwrap_or_default()
      }
    )*
  };
}

impl RecordManager {
  pub fn new() -> Self {
    Self::default()
  }

  record_accessors! {
    add_resolve_record, get_resolve_records_by_id, resolve, ResolveRecord;
    add_transform_record, get_transform_records_by_id, transform, TransformRecord;
    add_process_record, get_process_records_by_id, process, ProcessRecord;
    add_analyze_deps_record, get_analyze_deps_records_by_id, analyze_deps, AnalyzeDepsRecord;
    add_resource_pot_record, get_resource_pot_records_by_id, resource_pot, ResourcePotRecord;
  }

  /// Publishes pending records and clears the records of modules removed by this generation.
  pub fn commit(&self, removed: &[ModuleId]) {
    let pending = std::mem::take(&mut *self.pending.lock());
    let mut committed = self.committed.write();
    for id in removed {
      committed.remove(id.as_str());
    }
    let mut pending = pending.into_iter().collect::<Vec<_>>();
    pending.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (id, records) in pending {
      committed.entry(id).or_default().append(records);
    }
  }

  pub fn discard(&self) {
    self.pending.lock().clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ModuleType, ResolveKind};

  fn resolve_record(plugin: &str) -> ResolveRecord {
    ResolveRecord {
      plugin: plugin.to_string(),
      hook: "resolve".to_string(),
      source: "./a".to_string(),
      importer: None,
      kind: ResolveKind::Import,
      is_hmr: false,
    }
  }

  #[test]
  fn records_become_visible_on_commit() {
    let manager = RecordManager::new();
    manager.add_resolve_record("a.js", resolve_record("first"));
    assert!(manager.get_resolve_records_by_id("a.js").is_empty());

    manager.commit(&[]);
    manager.add_resolve_record("a.js", resolve_record("second"));
    manager.commit(&[]);

    let plugins = manager
      .get_resolve_records_by_id("a.js")
      .into_iter()
      .map(|record| record.plugin)
      .collect::<Vec<_>>();
    assert_eq!(plugins, ["first", "second"]);
  }

  #[test]
  fn discard_and_removal() {
    let manager = RecordManager::new();
    manager.add_process_record(
      "a.js",
      ProcessRecord {
        plugin: "loader".to_string(),
        hook: "load".to_string(),
        module_type: ModuleType::Js,
        is_hmr: false,
      },
    );
    manager.commit(&[]);
    assert_eq!(manager.get_process_records_by_id("a.js").len(), 1);

    manager.add_resolve_record("b.js", resolve_record("dropped"));
    manager.discard();
    manager.commit(&["a.js".into()]);

    assert!(manager.get_process_records_by_id("a.js").is_empty());
    assert!(manager.get_resolve_records_by_id("b.js").is_empty());
  }
}
