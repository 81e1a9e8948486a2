mod compiler;
mod module_loader;
mod plugins;
mod stages;
mod types;
mod utils;
mod watcher;

pub use crate::{
  compiler::{Compiler, CompilerBuilder, UpdateCallback},
  plugins::{FsLoadPlugin, FsResolvePlugin},
  stages::{
    generate::DefaultPartitionPolicy,
    update::{compute_hmr_boundaries, diff_module_graphs, ModuleGraphDiff},
  },
  types::SharedFileSystem,
  watcher::{FileWatcher, WatchBridge, WatchEvent},
};
pub use ember_common::{
  AnalyzeDepsRecord, AnalyzedDependency, CompilerOptions, DynamicResourcesMap,
  EnforceResourceOptions, HmrBoundaries, Module, ModuleErrorPolicy, ModuleGraph, ModuleGraphEdge, ModuleId,
  ModuleType, OutputOptions, PartialBundlingOptions, PathChange, ProcessRecord, ResolveKind,
  ResolveOptions, ResolveRecord, Resource, ResourcePot, ResourcePotRecord, ResourcePotType,
  ResourceType, TransformRecord, UpdateResult, UpdateType, WatchDiff,
};
pub use ember_error::{BuildError, BuildResult, CompileError};
pub use ember_fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use ember_plugin::{
  HookAnalyzeDepsArgs, HookLoadReturn, HookNoopReturn, HookRenderResourcePotReturn,
  HookResolveReturn, HookTransformReturn, HookFinalizeModuleArgs, HookGenerateResourcesArgs, HookLoadArgs,
  HookLoadOutput, HookProcessResourcePotsArgs, HookRenderResourcePotArgs, HookResolveArgs,
  HookResolveOutput, HookTransformArgs, HookTransformOutput, LoadHookFilter, PartitionPolicy,
  Plugin, PluginContext, RenderedResourcePot, ResolveHookFilter, SharedPlugin,
  TransformHookFilter,
};
