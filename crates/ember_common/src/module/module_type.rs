use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleType {
  Js,
  Jsx,
  Ts,
  Tsx,
  Css,
  Html,
  Json,
  Asset,
  Custom(String),
}

impl ModuleType {
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "js" | "mjs" | "cjs" => Self::Js,
      "jsx" => Self::Jsx,
      "ts" | "mts" | "cts" => Self::Ts,
      "tsx" => Self::Tsx,
      "css" => Self::Css,
      "html" | "htm" => Self::Html,
      "json" => Self::Json,
      "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico" | "woff" | "woff2" | "ttf" => {
        Self::Asset
      }
      _ => Self::Custom(ext.to_string()),
    }
  }

  /// Module type guessed from the extension of a resolved path, ignoring any `?query`.
  pub fn from_path(path: &str) -> Self {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let ext = file_name.rsplit_once('.').map_or("", |(_, ext)| ext);
    Self::from_extension(ext)
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Js => "js",
      Self::Jsx => "jsx",
      Self::Ts => "ts",
      Self::Tsx => "tsx",
      Self::Css => "css",
      Self::Html => "html",
      Self::Json => "json",
      Self::Asset => "asset",
      Self::Custom(custom) => custom,
    }
  }

  pub fn is_script(&self) -> bool {
    matches!(self, Self::Js | Self::Jsx | Self::Ts | Self::Tsx | Self::Json)
  }
}

impl From<&str> for ModuleType {
  fn from(value: &str) -> Self {
    if value == "asset" {
      Self::Asset
    } else {
      Self::from_extension(value)
    }
  }
}

impl Display for ModuleType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[test]
fn test_module_type_from_path() {
  assert_eq!(ModuleType::from_path("src/index.tsx"), ModuleType::Tsx);
  assert_eq!(ModuleType::from_path("src/app.less?inline"), ModuleType::Custom("less".into()));
  assert_eq!(ModuleType::from_path("src/.hidden/LICENSE"), ModuleType::Custom(String::new()));
  assert_eq!(ModuleType::from("asset"), ModuleType::Asset);
  assert_eq!(ModuleType::Css.to_string(), "css");
}
