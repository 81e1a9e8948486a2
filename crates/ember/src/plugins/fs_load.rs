use std::{borrow::Cow, path::Path};

use anyhow::Context;
use ember_common::ModuleType;
use ember_plugin::{HookLoadArgs, HookLoadOutput, HookLoadReturn, Plugin, PluginContext};

use crate::types::SharedFileSystem;

/// Reads modules from the file system. The module type follows the file extension.
pub struct FsLoadPlugin {
  fs: SharedFileSystem,
}

impl FsLoadPlugin {
  pub const NAME: &'static str = "ember:fs-load";

  pub fn new(fs: SharedFileSystem) -> Self {
    Self { fs }
  }
}

#[async_trait::async_trait]
impl Plugin for FsLoadPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed(Self::NAME)
  }

  async fn load(&self, _ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    let path = Path::new(args.resolved_path);
    let bytes = self.fs.read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content = String::from_utf8(bytes)
      .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
    Ok(Some(HookLoadOutput::new(content).with_module_type(ModuleType::from_path(args.resolved_path))))
  }
}
