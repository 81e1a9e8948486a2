pub mod hook_analyze_deps;
pub mod hook_filter;
pub mod hook_finalize_module;
pub mod hook_load;
pub mod hook_resolve;
pub mod hook_resource_pot;
pub mod hook_transform;
