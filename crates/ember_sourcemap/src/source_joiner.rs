use oxc_sourcemap::{SourceMap, SourceMapBuilder};

use crate::source::Source;

#[derive(Default)]
pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
}

pub struct JoinedSource {
  pub content: String,
  pub map: Option<SourceMap>,
}

impl<'source> SourceJoiner<'source> {
  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.inner.push(Box::new(source));
  }

  fn sources(&self) -> impl Iterator<Item = &(dyn Source + Send + 'source)> {
    self.inner.iter().map(AsRef::as_ref)
  }

  pub fn join(&self) -> String {
    let sources_len = self.inner.len();
    if sources_len == 0 {
      return String::new();
    }

    let size_hint_of_ret_source = self.sources().map(|source| source.content().len()).sum::<usize>()
      + /* Each source we will emit a '\n' but exclude last one */ (sources_len - 1);
    let mut ret_source = String::with_capacity(size_hint_of_ret_source);

    for (index, source) in self.sources().enumerate() {
      ret_source.push_str(source.content());
      if index < sources_len - 1 {
        ret_source.push('\n');
      }
    }

    ret_source
  }

  /// Joins the sources and, when `with_map` is set, maps every line of a source that has an
  /// origin back to the same line of that origin.
  pub fn join_with_source_map(&self, file: &str, with_map: bool) -> JoinedSource {
    let content = self.join();
    if !with_map {
      return JoinedSource { content, map: None };
    }

    let mut builder = SourceMapBuilder::default();
    builder.set_file(file);

    let mut dst_line = 0;
    for source in self.sources() {
      let lines = source.lines_count();
      if let Some(origin) = source.origin() {
        let src_id = builder.set_source_and_content(origin, source.content());
        for line in 0..=lines {
          builder.add_token(dst_line + line, 0, line, 0, Some(src_id), None);
        }
      }
      // The joiner emits one '\n' after every source but the last.
      dst_line += lines + 1;
    }

    JoinedSource { content, map: Some(builder.into_sourcemap()) }
  }
}

#[test]
fn test_join() {
  let mut joiner = SourceJoiner::default();
  joiner.append_source("/* banner */");
  joiner.append_source("a");
  joiner.append_source(String::from("b\nc"));

  assert_eq!(joiner.join(), "/* banner */\na\nb\nc");
  assert_eq!(SourceJoiner::default().join(), "");
}

#[test]
fn test_join_with_source_map() {
  use crate::SourceMapSource;

  let mut joiner = SourceJoiner::default();
  joiner.append_source("/* a.css */");
  joiner.append_source(SourceMapSource::new("a {}\nb {}".to_string(), "src/a.css".to_string()));

  let joined = joiner.join_with_source_map("index.css", true);
  assert_eq!(joined.content, "/* a.css */\na {}\nb {}");

  let map = joined.map.expect("map should be generated");
  assert_eq!(map.get_sources().count(), 1);

  let unmapped = joiner.join_with_source_map("index.css", false);
  assert!(unmapped.map.is_none());
}
