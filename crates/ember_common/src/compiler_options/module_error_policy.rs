use serde::Deserialize;

/// What to do when a module that is not an entry fails to build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleErrorPolicy {
  /// Fail the whole build.
  #[default]
  Abort,
  /// Keep building and put an error placeholder in place of the failed module.
  Placeholder,
}
