#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
  template: String,
}

impl FilenameTemplate {
  pub fn new(template: String) -> Self {
    Self { template }
  }

  pub fn template(&self) -> &str {
    &self.template
  }

  pub fn has_hash_pattern(&self) -> bool {
    self.template.contains("[contentHash]")
  }

  pub fn render(&self, name: &str, content_hash: Option<&str>, ext: &str) -> String {
    let mut rendered = self.template.replace("[resourceName]", name).replace("[ext]", ext);
    if let Some(hash) = content_hash {
      rendered = rendered.replace("[contentHash]", hash);
    }
    rendered
  }
}

impl From<String> for FilenameTemplate {
  fn from(template: String) -> Self {
    Self { template }
  }
}

#[test]
fn test_render() {
  let template = FilenameTemplate::new("assets/[resourceName].[contentHash].[ext]".to_string());
  assert!(template.has_hash_pattern());
  assert_eq!(template.render("index", Some("abc123"), "js"), "assets/index.abc123.js");
  assert_eq!(FilenameTemplate::from("[resourceName].[ext]".to_string()).render("main", None, "css"), "main.css");
}
