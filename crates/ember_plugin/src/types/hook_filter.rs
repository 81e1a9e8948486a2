use ember_common::ModuleType;
use regex::Regex;

fn compile(patterns: &[&str]) -> anyhow::Result<Vec<Regex>> {
  patterns.iter().map(|pattern| Ok(Regex::new(pattern)?)).collect()
}

/// A resolve hook runs when any importer pattern matches the importer path or any source pattern
/// matches the specifier. A filter with no patterns at all always runs.
#[derive(Debug, Clone, Default)]
pub struct ResolveHookFilter {
  pub importers: Vec<Regex>,
  pub sources: Vec<Regex>,
}

impl ResolveHookFilter {
  pub fn new(importers: &[&str], sources: &[&str]) -> anyhow::Result<Self> {
    Ok(Self { importers: compile(importers)?, sources: compile(sources)? })
  }

  pub fn matches(&self, importer: Option<&str>, source: &str) -> bool {
    if self.importers.is_empty() && self.sources.is_empty() {
      return true;
    }
    importer.is_some_and(|importer| self.importers.iter().any(|regex| regex.is_match(importer)))
      || self.sources.iter().any(|regex| regex.is_match(source))
  }
}

#[derive(Debug, Clone, Default)]
pub struct LoadHookFilter {
  pub resolved_paths: Vec<Regex>,
}

impl LoadHookFilter {
  pub fn new(resolved_paths: &[&str]) -> anyhow::Result<Self> {
    Ok(Self { resolved_paths: compile(resolved_paths)? })
  }

  pub fn matches(&self, resolved_path: &str) -> bool {
    self.resolved_paths.is_empty() || self.resolved_paths.iter().any(|regex| regex.is_match(resolved_path))
  }
}

/// Both lists must match when they are configured.
#[derive(Debug, Clone, Default)]
pub struct TransformHookFilter {
  pub resolved_paths: Vec<Regex>,
  pub module_types: Vec<ModuleType>,
}

impl TransformHookFilter {
  pub fn new(resolved_paths: &[&str], module_types: Vec<ModuleType>) -> anyhow::Result<Self> {
    Ok(Self { resolved_paths: compile(resolved_paths)?, module_types })
  }

  pub fn matches(&self, resolved_path: &str, module_type: &ModuleType) -> bool {
    let path_matches = self.resolved_paths.is_empty()
      || self.resolved_paths.iter().any(|regex| regex.is_match(resolved_path));
    let type_matches = self.module_types.is_empty() || self.module_types.contains(module_type);
    path_matches && type_matches
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolve_filter_is_or_across_both_lists() {
    let filter = ResolveHookFilter::new(&["^/src/"], &["\\.less$"]).unwrap();

    assert!(filter.matches(Some("/src/main.js"), "./util.js"));
    assert!(filter.matches(Some("/lib/main.js"), "./theme.less"));
    assert!(filter.matches(None, "./theme.less"));
    assert!(!filter.matches(Some("/lib/main.js"), "./util.js"));
    assert!(ResolveHookFilter::default().matches(None, "anything"));
  }

  #[test]
  fn transform_filter_is_and_between_lists() {
    let filter = TransformHookFilter::new(&["\\.less$"], vec![ModuleType::Css]).unwrap();

    assert!(filter.matches("/src/a.less", &ModuleType::Css));
    assert!(!filter.matches("/src/a.less", &ModuleType::Js));
    assert!(!filter.matches("/src/a.css", &ModuleType::Css));

    let only_types = TransformHookFilter::new(&[], vec![ModuleType::Css]).unwrap();
    assert!(only_types.matches("/src/a.css", &ModuleType::Css));
  }

  #[test]
  fn invalid_pattern_is_an_error() {
    assert!(LoadHookFilter::new(&["("]).is_err());
  }
}
