mod compile_error;

use std::{
  fmt::Display,
  ops::{Deref, DerefMut},
};

pub use crate::compile_error::CompileError;

/// A build can fail with several errors at once, one per failing module task.
#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  /// Returns the first error that carries a [`CompileError`].
  pub fn compile_error(&self) -> Option<&CompileError> {
    self.0.iter().find_map(|err| err.downcast_ref::<CompileError>())
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.iter().any(|err| matches!(err.downcast_ref::<CompileError>(), Some(CompileError::Cancelled)))
  }

  /// Rebuilds an equivalent error from the rendered messages. Used to hand the outcome of a
  /// coalesced update to every caller that queued paths into it.
  pub fn to_detached(&self) -> Self {
    Self(self.0.iter().map(|err| anyhow::anyhow!("{err:#}")).collect())
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (idx, err) in self.0.iter().enumerate() {
      if idx > 0 {
        writeln!(f)?;
      }
      write!(f, "{err:#}")?;
    }
    Ok(())
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<CompileError> for BuildError {
  fn from(error: CompileError) -> Self {
    Self(vec![error.into()])
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;
