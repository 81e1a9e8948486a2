pub mod filename_template;
pub mod module_error_policy;
pub mod normalized_compiler_options;

use std::path::PathBuf;

use ember_utils::indexmap::FxIndexMap;
use serde::Deserialize;

use crate::ModuleErrorPolicy;

/// User facing options. Every field is optional and filled in by normalization.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerOptions {
  /// Entry name -> specifier.
  pub input: Option<FxIndexMap<String, String>>,
  pub root: Option<PathBuf>,
  pub concurrency: Option<usize>,
  pub module_error_policy: Option<ModuleErrorPolicy>,
  /// Specifiers matching any of these patterns are not bundled.
  pub external: Option<Vec<String>>,
  pub resolve: Option<ResolveOptions>,
  pub partial_bundling: Option<PartialBundlingOptions>,
  pub output: Option<OutputOptions>,
  pub sourcemap: Option<bool>,
  pub builtin_plugins: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolveOptions {
  pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialBundlingOptions {
  pub enforce_resources: Option<Vec<EnforceResourceOptions>>,
  pub immutable_modules: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnforceResourceOptions {
  pub name: String,
  pub test: Vec<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputOptions {
  pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserialize_camel_case() {
    let options: CompilerOptions = serde_json::from_value(serde_json::json!({
      "input": { "index": "./index.html", "admin": "./admin.html" },
      "moduleErrorPolicy": "placeholder",
      "partialBundling": { "enforceResources": [{ "name": "vendor", "test": ["node_modules/"] }] },
      "output": { "filename": "[resourceName].[contentHash].[ext]" }
    }))
    .unwrap();

    let input = options.input.unwrap();
    assert_eq!(input.keys().collect::<Vec<_>>(), ["index", "admin"]);
    assert_eq!(options.module_error_policy, Some(ModuleErrorPolicy::Placeholder));
    assert_eq!(options.partial_bundling.unwrap().enforce_resources.unwrap()[0].name, "vendor");
  }

  #[test]
  fn reject_unknown_fields() {
    let err = serde_json::from_value::<CompilerOptions>(serde_json::json!({ "entry": {} }));
    assert!(err.is_err());
  }
}
