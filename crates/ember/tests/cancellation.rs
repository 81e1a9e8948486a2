mod common;

use std::{
  borrow::Cow,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use common::{compiler, path, project};
use ember::{HookLoadArgs, HookLoadOutput, HookLoadReturn, Plugin, PluginContext, SharedPlugin};
use serde_json::json;
use tokio::sync::Notify;

/// Holds the load of `a.js` until released while `gated` is set. A released load registers a
/// watch file and answers itself, so anything it leaves behind is easy to spot.
#[derive(Default)]
struct GatedLoadPlugin {
  gated: AtomicBool,
  entered: Notify,
  release: Notify,
}

#[async_trait::async_trait]
impl Plugin for GatedLoadPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("test:gated-load")
  }

  async fn load(&self, ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    if !args.resolved_path.ends_with("a.js") || !self.gated.load(Ordering::SeqCst) {
      return Ok(None);
    }
    self.entered.notify_one();
    self.release.notified().await;
    ctx.add_watch_file(args.id, path("leaked.json"));
    Ok(Some(HookLoadOutput::new("export const a = 0")))
  }
}

#[tokio::test]
async fn cancelled_compile_leaves_nothing_behind() {
  let fs = project(&[("main.js", "import \"./a.js\""), ("a.js", "export const a = 1")]);
  let plugin = Arc::new(GatedLoadPlugin::default());
  plugin.gated.store(true, Ordering::SeqCst);
  let compiler = compiler(
    &fs,
    json!({ "input": { "main": "./main.js" } }),
    vec![Arc::clone(&plugin) as SharedPlugin],
  );

  let (outcome, ()) = tokio::join!(compiler.compile(), async {
    plugin.entered.notified().await;
    compiler.cancel();
  });
  let err = outcome.unwrap_err();
  assert!(err.is_cancelled());
  assert_eq!(compiler.generation(), 0);

  // A task that outlived the cancel would finish now and write into the next build.
  plugin.gated.store(false, Ordering::SeqCst);
  plugin.release.notify_one();
  for _ in 0..10 {
    tokio::task::yield_now().await;
  }

  compiler.compile().await.unwrap();
  let loads = |id: &str| {
    compiler
      .get_process_records_by_id(id)
      .into_iter()
      .filter(|record| record.hook == "load")
      .map(|record| record.plugin)
      .collect::<Vec<_>>()
  };
  assert_eq!(loads("a.js"), ["ember:fs-load"]);
  assert_eq!(loads("main.js"), ["ember:fs-load"]);
  assert!(!compiler.watch_modules().contains(&path("leaked.json")));
}
