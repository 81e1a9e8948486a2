use thiserror::Error;

/// Errors raised by the compiler itself. Plugin failures wrap the plugin's own error as `source`
/// so the chain stays inspectable.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("Invalid configuration: {message}")]
  Config { message: String },

  #[error(
    "Could not resolve \"{specifier}\"{}",
    .importer.as_ref().map(|importer| format!(" (imported by {importer})")).unwrap_or_default()
  )]
  UnresolvedImport { specifier: String, importer: Option<String> },

  #[error("Entry \"{name}\" resolved to an external module \"{id}\"")]
  EntryCannotBeExternal { name: String, id: String },

  #[error("Could not load {id} (plugin: {plugin}, hook: {hook})")]
  Load {
    id: String,
    plugin: String,
    hook: String,
    #[source]
    cause: anyhow::Error,
  },

  #[error("Could not transform {id} (plugin: {plugin}, hook: {hook})")]
  Transform {
    id: String,
    plugin: String,
    hook: String,
    #[source]
    cause: anyhow::Error,
  },

  #[error("Could not analyze dependencies of {id} (plugin: {plugin}, hook: {hook})")]
  AnalyzeDeps {
    id: String,
    plugin: String,
    hook: String,
    #[source]
    cause: anyhow::Error,
  },

  #[error("Hook {hook} of plugin {plugin} failed for {id}")]
  PluginHook {
    id: String,
    plugin: String,
    hook: String,
    #[source]
    cause: anyhow::Error,
  },

  #[error("Could not render resource pot {id} (plugin: {plugin}, hook: {hook})")]
  RenderResourcePot {
    id: String,
    plugin: String,
    hook: String,
    #[source]
    cause: anyhow::Error,
  },

  #[error("Could not generate resources for {id} (plugin: {plugin}, hook: {hook})")]
  GenerateResources {
    id: String,
    plugin: String,
    hook: String,
    #[source]
    cause: anyhow::Error,
  },

  #[error("No plugin loaded {id}")]
  NoLoader { id: String },

  #[error("Module {id} is not part of the module graph")]
  ModuleNotFound { id: String },

  #[error("The compilation was cancelled")]
  Cancelled,
}

impl CompileError {
  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }

  /// The plugin that raised this error, if any.
  pub fn plugin(&self) -> Option<&str> {
    match self {
      Self::Load { plugin, .. }
      | Self::Transform { plugin, .. }
      | Self::AnalyzeDeps { plugin, .. }
      | Self::PluginHook { plugin, .. }
      | Self::RenderResourcePot { plugin, .. }
      | Self::GenerateResources { plugin, .. } => Some(plugin),
      _ => None,
    }
  }
}

#[test]
fn test_unresolved_import_message() {
  let err = CompileError::UnresolvedImport { specifier: "./missing".into(), importer: None };
  assert_eq!(err.to_string(), "Could not resolve \"./missing\"");

  let err =
    CompileError::UnresolvedImport { specifier: "./missing".into(), importer: Some("src/a.js".into()) };
  assert_eq!(err.to_string(), "Could not resolve \"./missing\" (imported by src/a.js)");
}
