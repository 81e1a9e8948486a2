use std::{borrow::Cow, ffi::OsStr, path::Path};

pub trait PathExt {
  fn representative_file_name(&self) -> Cow<str>;
}

impl PathExt for Path {
  /// It doesn't ensure the file name is a valid identifier in any language.
  fn representative_file_name(&self) -> Cow<str> {
    let file_name =
      self.file_stem().map_or_else(|| self.to_string_lossy(), |stem| stem.to_string_lossy());

    match &*file_name {
      // "index" and "mod" say nothing about the module, the directory name does.
      "index" | "mod" => self
        .parent()
        .and_then(Self::file_stem)
        .map(OsStr::to_string_lossy)
        .map_or(file_name, |parent_dir_name| parent_dir_name),
      _ => file_name,
    }
  }
}

#[test]
fn test_representative_file_name() {
  let cwd = Path::new(".").join("project");
  let path = cwd.join("src").join("app.less");
  assert_eq!(path.representative_file_name(), "app");

  let path = cwd.join("pages").join("index.html");
  assert_eq!(path.representative_file_name(), "pages");
}
