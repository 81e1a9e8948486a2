mod compiler_options;
mod module;
mod record;
mod resource;
mod types;

pub use crate::{
  compiler_options::{
    filename_template::FilenameTemplate,
    module_error_policy::ModuleErrorPolicy,
    normalized_compiler_options::{
      EnforceResource, NormalizedCompilerOptions, SharedNormalizedCompilerOptions,
    },
    CompilerOptions, EnforceResourceOptions, OutputOptions, PartialBundlingOptions, ResolveOptions,
  },
  module::{
    module_graph::ModuleGraph,
    module_graph_edge::{ModuleGraphEdge, ModuleGraphEdgeDataItem},
    module_id::ModuleId,
    module_type::ModuleType,
    Module,
  },
  record::{
    record_manager::RecordManager, AnalyzeDepsRecord, ModuleRecords, ProcessRecord, ResolveRecord,
    ResourcePotRecord, TransformRecord,
  },
  resource::{
    resource_pot::{ResourcePot, ResourcePotType},
    Resource, ResourceOrigin, ResourceType,
  },
  types::{
    analyzed_dependency::AnalyzedDependency,
    resolve_kind::ResolveKind,
    update::{DynamicResourcesMap, HmrBoundaries, PathChange, UpdateResult, UpdateType, WatchDiff},
    watch_graph::WatchGraph,
  },
};
