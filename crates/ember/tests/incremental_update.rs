mod common;

use std::{borrow::Cow, sync::Arc};

use common::{compiler, ids, path, project};
use ember::{
  BuildResult, FileSystem, HookTransformArgs, HookTransformOutput, HookTransformReturn,
  MemoryFileSystem, Plugin, PluginContext, SharedPlugin, UpdateResult, UpdateType,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn main_with_two_deps() -> Arc<MemoryFileSystem> {
  project(&[
    ("main.js", "import \"./a.js\"\nimport \"./b.js\""),
    ("a.js", "export const a = 1"),
    ("b.js", "export const b = 2"),
  ])
}

#[tokio::test]
async fn empty_update_is_idempotent() {
  let fs = main_with_two_deps();
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![]);
  compiler.compile().await.unwrap();
  let before = compiler.resources();

  let result = compiler.update(vec![], None, true).await.unwrap();

  assert!(result.added.is_empty());
  assert!(result.changed.is_empty());
  assert!(result.removed.is_empty());
  assert!(result.regenerated_resources.is_empty());
  assert!(result.dynamic_resources_map.is_none());
  assert!(result.extra_watch_result.is_empty());
  assert_eq!(result.generation, 2);
  assert_eq!(compiler.resources(), before);
}

#[tokio::test]
async fn dropping_the_only_importer_removes_the_module() {
  let fs = main_with_two_deps();
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![]);
  compiler.compile().await.unwrap();
  assert!(!compiler.get_resolve_records_by_id("b.js").is_empty());

  fs.write(path("main.js"), "import \"./a.js\"");
  let result = compiler.update_paths([path("main.js")]).await.unwrap();

  assert_eq!(ids(&result.changed), ["main.js"]);
  assert_eq!(ids(&result.removed), ["b.js"]);
  assert!(result.added.is_empty());
  assert!(!compiler.has_module(path("b.js")));
  assert!(compiler.get_resolve_records_by_id("b.js").is_empty());
  assert!(!resource_contains(&compiler, "main.js", "b.js"));
}

fn resource_contains(compiler: &ember::Compiler, name: &str, needle: &str) -> bool {
  common::resource_text(compiler, name).contains(needle)
}

#[tokio::test]
async fn removed_file_dirties_its_importers() {
  let fs = main_with_two_deps();
  let compiler = compiler(
    &fs,
    json!({ "input": { "main": "./main.js" }, "moduleErrorPolicy": "placeholder" }),
    vec![],
  );
  compiler.compile().await.unwrap();

  fs.remove(path("b.js"));
  let result = compiler.update(vec![(path("b.js").into(), UpdateType::Removed)], None, true).await.unwrap();

  assert_eq!(ids(&result.removed), ["b.js"]);
  assert_eq!(ids(&result.changed), ["main.js"]);
  let main = compiler.modules().into_iter().find(|module| module.id.as_str() == "main.js").unwrap();
  assert!(main.error.is_some());

  // The file coming back resolves the import again.
  fs.write(path("b.js"), "export const b = 3");
  let result = compiler.update(vec![(path("b.js").into(), UpdateType::Added)], None, true).await.unwrap();
  assert_eq!(ids(&result.added), ["b.js"]);
  assert_eq!(ids(&result.changed), ["main.js"]);
  assert!(compiler.modules().iter().all(|module| module.error.is_none()));
}

#[tokio::test]
async fn failed_update_keeps_the_published_generation() {
  let fs = main_with_two_deps();
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![]);
  compiler.compile().await.unwrap();
  let before = compiler.resources();

  fs.write(path("main.js"), "import \"./missing.js\"");
  assert!(compiler.update_paths([path("main.js")]).await.is_err());
  assert_eq!(compiler.generation(), 1);
  assert_eq!(compiler.resources(), before);
  assert!(compiler.has_module(path("b.js")));
  assert!(compiler.get_process_records_by_id("main.js").iter().all(|record| !record.is_hmr));

  fs.remove(path("main.js"));
  let err = compiler
    .update(vec![(path("main.js").into(), UpdateType::Removed)], None, true)
    .await
    .unwrap_err();
  assert!(!err.is_empty());
  assert_eq!(compiler.generation(), 1);

  fs.write(path("main.js"), "import \"./a.js\"");
  let result = compiler.update_paths([path("main.js")]).await.unwrap();
  assert_eq!(result.generation, 2);
  assert_eq!(ids(&result.removed), ["b.js"]);
}

#[tokio::test]
async fn unchanged_pots_reuse_rendered_bytes() {
  let fs = project(&[
    ("main.js", "import \"./shared.js\"\nimport(\"./lazy.js\")"),
    ("lazy.js", "export default 1"),
    ("shared.js", "export const shared = 1"),
  ]);
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![]);
  compiler.compile().await.unwrap();
  let lazy_before = compiler.resource("lazy.js").unwrap();

  fs.write(path("shared.js"), "export const shared = 2");
  let result = compiler.update_paths([path("shared.js")]).await.unwrap();

  assert_eq!(result.regenerated_resources, ["main.js", "main.js.map"]);
  assert!(Arc::ptr_eq(&lazy_before, &compiler.resource("lazy.js").unwrap()));
  assert!(result.dynamic_resources_map.is_none());
  assert_eq!(ids(&result.mutable_modules), ["main.js", "shared.js"]);
  assert_eq!(ids(&result.immutable_modules), ["lazy.js"]);
}

#[tokio::test]
async fn membership_change_reports_dynamic_resources() {
  let fs = project(&[("main.js", "export {}"), ("lazy.js", "export default 1")]);
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![]);
  compiler.compile().await.unwrap();

  fs.write(path("main.js"), "import(\"./lazy.js\")");
  let result = compiler.update_paths([path("main.js")]).await.unwrap();

  assert_eq!(ids(&result.added), ["lazy.js"]);
  let map = result.dynamic_resources_map.unwrap();
  assert_eq!(map.get("main_js"), Some(&vec!["lazy_js".to_string()]));
}

#[tokio::test]
async fn background_update_publishes_before_calling_back() {
  let fs = main_with_two_deps();
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![]);
  compiler.compile().await.unwrap();

  fs.write(path("a.js"), "export const a = 42");
  let (tx, rx) = tokio::sync::oneshot::channel();
  let callback_compiler = compiler.clone();
  let result = compiler
    .update(
      vec![(path("a.js").into(), UpdateType::Updated)],
      Some(Box::new(move |outcome: &BuildResult<UpdateResult>| {
        let published = callback_compiler.generation();
        let regenerated =
          outcome.as_ref().map(|result| result.regenerated_resources.clone()).unwrap_or_default();
        let _ = tx.send((published, regenerated));
      })),
      false,
    )
    .await
    .unwrap();

  assert_eq!(ids(&result.changed), ["a.js"]);
  assert!(result.regenerated_resources.is_empty());

  let (published, regenerated) = rx.await.unwrap();
  assert_eq!(published, 2);
  assert_eq!(regenerated, ["main.js", "main.js.map"]);
  assert!(common::resource_text(&compiler, "main.js").contains("42"));
}

#[tokio::test]
async fn concurrent_updates_are_coalesced() {
  let fs = main_with_two_deps();
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![]);
  compiler.compile().await.unwrap();

  fs.write(path("a.js"), "export const a = 10");
  fs.write(path("b.js"), "export const b = 20");
  let (first, second, third) = tokio::join!(
    compiler.update_paths([path("a.js")]),
    compiler.update_paths([path("b.js")]),
    compiler.update_paths([path("main.js")]),
  );

  let (first, second, third) = (first.unwrap(), second.unwrap(), third.unwrap());
  assert_eq!(first.generation, 2);
  assert_eq!(second.generation, 3);
  assert_eq!(third.generation, 3);
  assert_eq!(ids(&second.changed), ["b.js"]);
  assert_eq!(compiler.generation(), 3);
}

/// Appends the content of the file named on a `// watch: <file>` line and registers it as a
/// watch file of the module.
struct WatchConfigPlugin {
  fs: Arc<MemoryFileSystem>,
}

#[async_trait::async_trait]
impl Plugin for WatchConfigPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("test:watch-config")
  }

  async fn transform(&self, ctx: &PluginContext, args: &HookTransformArgs<'_>) -> HookTransformReturn {
    let Some(file) = args.content.lines().find_map(|line| line.strip_prefix("// watch: ")) else {
      return Ok(None);
    };
    let file = path(file.trim());
    ctx.add_watch_file(args.id, file.as_str());
    let config = self
      .fs
      .read(std::path::Path::new(&file))
      .ok()
      .and_then(|bytes| String::from_utf8(bytes).ok())
      .unwrap_or_default();
    Ok(Some(HookTransformOutput::new(format!("{}\n/* {} */", args.content, config.trim()))))
  }
}

#[tokio::test]
async fn watch_files_dirty_their_modules() {
  let fs = project(&[
    ("main.js", "// watch: config.json\nexport {}"),
    ("config.json", "{ \"mode\": 1 }"),
    ("other.json", "{ \"mode\": 2 }"),
  ]);
  let plugin: SharedPlugin = Arc::new(WatchConfigPlugin { fs: Arc::clone(&fs) });
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![plugin]);
  compiler.compile().await.unwrap();
  assert_eq!(compiler.watch_modules(), [path("config.json"), path("main.js")]);

  fs.write(path("config.json"), "{ \"mode\": 3 }");
  let result = compiler.update_paths([path("config.json")]).await.unwrap();
  assert_eq!(ids(&result.changed), ["main.js"]);
  assert!(result.extra_watch_result.is_empty());

  fs.write(path("main.js"), "// watch: other.json\nexport {}");
  let result = compiler.update_paths([path("main.js")]).await.unwrap();
  assert_eq!(result.extra_watch_result.add, [path("other.json")]);
  assert_eq!(result.extra_watch_result.remove, [path("config.json")]);
}

#[tokio::test]
async fn user_watch_files_trigger_rebuilds() {
  let fs = main_with_two_deps();
  let compiler = compiler(&fs, json!({ "input": { "main": "./main.js" } }), vec![]);
  compiler.compile().await.unwrap();

  compiler.add_watch_files("a.js", ["data.txt"]).unwrap();
  assert!(compiler.watch_modules().contains(&path("data.txt")));
  assert!(compiler.add_watch_files("nope.js", ["data.txt"]).is_err());

  let result = compiler.update_paths([path("data.txt")]).await.unwrap();
  assert!(result.changed.is_empty());
  let records = compiler.get_process_records_by_id("a.js");
  assert!(records.iter().any(|record| record.is_hmr && record.hook == "load"));
}
