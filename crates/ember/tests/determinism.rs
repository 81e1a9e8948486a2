mod common;

use common::{compiler, ids, project};
use pretty_assertions::assert_eq;
use serde_json::json;

fn files() -> Vec<(&'static str, &'static str)> {
  vec![
    ("index.html", "<script src=\"./main.js\"></script>\n<script src=\"./admin.js\"></script>"),
    ("admin.html", "<script src=\"./admin.js\"></script>"),
    ("main.js", "import \"./shared.js\"\nimport \"./a.js\"\nimport(\"./lazy.js\")"),
    ("admin.js", "import \"./shared.js\"\nimport \"./node_modules/ui/index.js\""),
    ("shared.js", "import \"./a.js\"\nexport const shared = 1"),
    ("a.js", "import \"./b.js\"\nexport const a = 1"),
    ("b.js", "import \"./a.js\"\nexport const b = 1"),
    ("lazy.js", "import \"./shared.js\"\nexport default 1"),
    ("node_modules/ui/index.js", "export const button = 1"),
  ]
}

fn config() -> serde_json::Value {
  json!({
    "input": { "index": "./index.html", "admin": "./admin.html" },
    "concurrency": 8,
    "partialBundling": { "enforceResources": [{ "name": "vendor", "test": ["node_modules/"] }] },
    "output": { "filename": "[resourceName].[contentHash].[ext]" }
  })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repeated_builds_are_byte_identical() {
  let mut builds = vec![];
  for _ in 0..3 {
    let fs = project(&files());
    let compiler = compiler(&fs, config(), vec![]);
    compiler.compile().await.unwrap();
    let pots = compiler
      .resource_pots()
      .into_iter()
      .map(|pot| (pot.id.to_string(), ids(&pot.modules)))
      .collect::<Vec<_>>();
    builds.push((compiler.resources(), pots));
  }

  assert_eq!(builds[0], builds[1]);
  assert_eq!(builds[1], builds[2]);

  let (resources, pots) = &builds[0];
  let vendor = pots.iter().find(|(id, _)| id == "vendor_js").unwrap();
  assert_eq!(vendor.1, ["node_modules/ui/index.js"]);
  let shared = pots.iter().filter(|(id, _)| id.starts_with("shared-")).count();
  assert!(shared >= 1);
  assert!(resources.keys().all(|name| name.split('.').count() >= 3));
  let mut names = resources.keys().filter(|name| !name.ends_with(".map"));
  assert!(names.all(|name| name.rsplit('.').nth(1).is_some_and(|hash| hash.len() == 8)));
}

#[tokio::test]
async fn ids_are_root_relative_and_immutable_under_node_modules() {
  let fs = project(&files());
  let compiler = compiler(&fs, config(), vec![]);
  compiler.compile().await.unwrap();

  let modules = compiler.modules();
  let vendor = modules.iter().find(|module| module.id.as_str() == "node_modules/ui/index.js").unwrap();
  assert!(vendor.immutable);
  assert!(modules.iter().filter(|module| module.id.as_str() != vendor.id.as_str()).all(|module| !module.immutable));
}
