use crate::lines_count::lines_count;

pub trait Source {
  fn content(&self) -> &str;

  fn lines_count(&self) -> u32 {
    lines_count(self.content())
  }

  /// The original file this source was rendered from. Sources with an origin are mapped line by
  /// line when joined; sources without one (banners, wrappers) produce no mappings.
  fn origin(&self) -> Option<&str> {
    None
  }
}

impl Source for &str {
  fn content(&self) -> &str {
    self
  }
}

impl Source for String {
  fn content(&self) -> &str {
    self
  }
}

#[derive(Debug)]
pub struct SourceMapSource {
  content: String,
  origin: String,
}

impl SourceMapSource {
  pub fn new(content: String, origin: String) -> Self {
    Self { content, origin }
  }
}

impl Source for SourceMapSource {
  fn content(&self) -> &str {
    &self.content
  }

  fn origin(&self) -> Option<&str> {
    Some(&self.origin)
  }
}
