mod common;

use common::{compiler, ids, path, project};
use ember::ModuleId;
use pretty_assertions::assert_eq;
use serde_json::json;

fn chain(ids: &[&str]) -> Vec<ModuleId> {
  ids.iter().map(|id| ModuleId::from(*id)).collect()
}

fn chain_project(b_content: &str, a_content: &str) -> std::sync::Arc<ember::MemoryFileSystem> {
  project(&[
    ("entry.js", "import \"./a.js\"\nimport \"./d.js\""),
    ("a.js", a_content),
    ("b.js", b_content),
    ("c.js", "export const c = 1"),
    ("d.js", "export const d = 1"),
  ])
}

#[tokio::test]
async fn boundary_stops_at_accepting_ancestor() {
  let fs = chain_project("import \"./c.js\"\nhot.accept()", "import \"./b.js\"");
  let compiler = compiler(&fs, json!({ "input": { "entry": "./entry.js" } }), vec![]);
  compiler.compile().await.unwrap();

  fs.write(path("c.js"), "export const c = 2");
  let result = compiler.update_paths([path("c.js")]).await.unwrap();

  assert_eq!(ids(&result.changed), ["c.js"]);
  assert_eq!(result.boundaries[&ModuleId::from("c.js")], vec![chain(&["c.js", "b.js"])]);
  assert!(!result.reload_required);
  assert_eq!(ids(&result.mutable_modules), ["a.js", "b.js", "c.js", "entry.js"]);
  assert_eq!(ids(&result.immutable_modules), ["d.js"]);
}

#[tokio::test]
async fn unaccepted_change_reaches_the_entry() {
  let fs = chain_project("import \"./c.js\"", "import \"./b.js\"");
  let compiler = compiler(&fs, json!({ "input": { "entry": "./entry.js" } }), vec![]);
  compiler.compile().await.unwrap();

  fs.write(path("c.js"), "export const c = 2");
  let result = compiler.update_paths([path("c.js")]).await.unwrap();

  assert_eq!(
    result.boundaries[&ModuleId::from("c.js")],
    vec![chain(&["c.js", "b.js", "a.js", "entry.js"])]
  );
  assert!(result.reload_required);
}

#[tokio::test]
async fn importer_accepting_the_dependency_is_the_boundary() {
  let fs = chain_project("import \"./c.js\"", "import \"./b.js\"\nhot.accept(\"./b.js\")");
  let compiler = compiler(&fs, json!({ "input": { "entry": "./entry.js" } }), vec![]);
  compiler.compile().await.unwrap();

  fs.write(path("c.js"), "export const c = 2");
  let result = compiler.update_paths([path("c.js")]).await.unwrap();

  assert_eq!(result.boundaries[&ModuleId::from("c.js")], vec![chain(&["c.js", "b.js", "a.js"])]);
  assert!(!result.reload_required);
}

#[tokio::test]
async fn editing_a_less_file_regenerates_only_its_pot() {
  let fs = project(&[
    (
      "index.html",
      r#"<script src="./main.js"></script>
<link rel="stylesheet" href="./style.less">"#,
    ),
    ("main.js", "console.log('main')"),
    ("style.less", "@import \"./vars.less\";\n/* hot.accept() */\nbody { color: red; }"),
    ("vars.less", "// colors\n:root { --brand: blue; }"),
  ]);
  let compiler = compiler(&fs, json!({ "input": { "index": "./index.html" } }), vec![]);
  compiler.compile().await.unwrap();
  let index_js = compiler.resource("index.js").unwrap();
  let index_html = compiler.resource("index.html").unwrap();

  fs.write(path("vars.less"), "// colors\n:root { --brand: green; }");
  let result = compiler.update_paths([path("vars.less")]).await.unwrap();

  assert_eq!(ids(&result.changed), ["vars.less"]);
  assert_eq!(
    result.boundaries[&ModuleId::from("vars.less")],
    vec![chain(&["vars.less", "style.less"])]
  );
  assert!(!result.reload_required);
  assert_eq!(result.regenerated_resources, ["index.css", "index.css.map"]);
  assert!(common::resource_text(&compiler, "index.css").contains("green"));
  assert_eq!(compiler.resource("index.js").unwrap(), index_js);
  assert_eq!(compiler.resource("index.html").unwrap(), index_html);
}

#[tokio::test]
async fn cycles_do_not_loop() {
  let fs = project(&[
    ("entry.js", "import \"./a.js\""),
    ("a.js", "import \"./b.js\""),
    ("b.js", "import \"./a.js\""),
  ]);
  let compiler = compiler(&fs, json!({ "input": { "entry": "./entry.js" } }), vec![]);
  compiler.compile().await.unwrap();

  fs.write(path("b.js"), "import \"./a.js\"\nexport const b = 1");
  let result = compiler.update_paths([path("b.js")]).await.unwrap();

  assert_eq!(
    result.boundaries[&ModuleId::from("b.js")],
    vec![chain(&["b.js", "a.js", "entry.js"])]
  );
  assert!(result.reload_required);
}

#[tokio::test]
async fn shared_dependency_propagates_through_every_importer() {
  let fs = project(&[
    ("entry.js", "import \"./x.js\""),
    ("x.js", "import \"./b1.js\"\nimport \"./b2.js\"\nhot.accept()"),
    ("b1.js", "import \"./c.js\""),
    ("b2.js", "import \"./c.js\""),
    ("c.js", "export const c = 1"),
  ]);
  let compiler = compiler(&fs, json!({ "input": { "entry": "./entry.js" } }), vec![]);
  compiler.compile().await.unwrap();

  fs.write(path("c.js"), "export const c = 2");
  let result = compiler.update_paths([path("c.js")]).await.unwrap();

  let mut chains = result.boundaries[&ModuleId::from("c.js")].clone();
  chains.sort();
  assert_eq!(chains, vec![chain(&["c.js", "b1.js", "x.js"]), chain(&["c.js", "b2.js", "x.js"])]);
  assert!(!result.reload_required);
}
