use std::fmt::Display;

/// How a dependency was requested. Stored on graph edges and handed to resolve hooks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResolveKind {
  Entry,
  /// `import foo from 'foo'`
  Import,
  /// `export { foo } from 'foo'`
  ExportFrom,
  /// `import('foo')`
  DynamicImport,
  /// `require('foo')`
  Require,
  /// `@import 'foo.css'`
  CssAtImport,
  /// `url('foo.png')`
  CssUrl,
  /// `<script src="...">`
  ScriptSrc,
  /// `<link href="...">`
  LinkHref,
  /// Synthetic dependency injected while applying an update.
  HmrUpdate,
  Custom(String),
}

impl ResolveKind {
  pub fn is_dynamic(&self) -> bool {
    matches!(self, Self::DynamicImport)
  }

  pub fn is_static(&self) -> bool {
    !self.is_dynamic()
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Entry => "entry",
      Self::Import => "import",
      Self::ExportFrom => "export-from",
      Self::DynamicImport => "dynamic-import",
      Self::Require => "require",
      Self::CssAtImport => "css-at-import",
      Self::CssUrl => "css-url",
      Self::ScriptSrc => "script-src",
      Self::LinkHref => "link-href",
      Self::HmrUpdate => "hmr-update",
      Self::Custom(kind) => kind,
    }
  }
}

impl From<&str> for ResolveKind {
  fn from(value: &str) -> Self {
    match value {
      "entry" => Self::Entry,
      "import" => Self::Import,
      "export-from" => Self::ExportFrom,
      "dynamic-import" => Self::DynamicImport,
      "require" => Self::Require,
      "css-at-import" => Self::CssAtImport,
      "css-url" => Self::CssUrl,
      "script-src" => Self::ScriptSrc,
      "link-href" => Self::LinkHref,
      "hmr-update" => Self::HmrUpdate,
      _ => Self::Custom(value.to_string()),
    }
  }
}

impl Display for ResolveKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
