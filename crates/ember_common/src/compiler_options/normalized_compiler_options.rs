use std::path::PathBuf;

use ember_utils::indexmap::FxIndexMap;
use regex::Regex;

use crate::{FilenameTemplate, ModuleErrorPolicy};

/// Modules whose id matches one of `test` are placed into the resource pot `name`.
#[derive(Debug, Clone)]
pub struct EnforceResource {
  pub name: String,
  pub test: Vec<Regex>,
}

impl EnforceResource {
  pub fn matches(&self, id: &str) -> bool {
    self.test.iter().any(|regex| regex.is_match(id))
  }
}

#[derive(Debug, Clone)]
pub struct NormalizedCompilerOptions {
  pub input: FxIndexMap<String, String>,
  pub root: PathBuf,
  pub concurrency: usize,
  pub module_error_policy: ModuleErrorPolicy,
  pub external: Vec<Regex>,
  pub extensions: Vec<String>,
  pub enforce_resources: Vec<EnforceResource>,
  pub immutable_modules: Vec<Regex>,
  pub filename: FilenameTemplate,
  pub sourcemap: bool,
  pub builtin_plugins: bool,
}

impl Default for NormalizedCompilerOptions {
  fn default() -> Self {
    Self {
      input: FxIndexMap::default(),
      root: PathBuf::from("/"),
      concurrency: std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get),
      module_error_policy: ModuleErrorPolicy::Abort,
      external: vec![],
      extensions: ["js", "jsx", "ts", "tsx", "mjs", "cjs", "json", "css", "html"]
        .map(String::from)
        .to_vec(),
      enforce_resources: vec![],
      immutable_modules: vec![],
      filename: FilenameTemplate::new("[resourceName].[ext]".to_string()),
      sourcemap: true,
      builtin_plugins: true,
    }
  }
}

impl NormalizedCompilerOptions {
  pub fn is_external(&self, specifier: &str) -> bool {
    self.external.iter().any(|regex| regex.is_match(specifier))
  }

  pub fn is_immutable(&self, id: &str) -> bool {
    self.immutable_modules.iter().any(|regex| regex.is_match(id))
  }

  pub fn enforced_resource(&self, id: &str) -> Option<&EnforceResource> {
    self.enforce_resources.iter().find(|resource| resource.matches(id))
  }
}

pub type SharedNormalizedCompilerOptions = std::sync::Arc<NormalizedCompilerOptions>;
