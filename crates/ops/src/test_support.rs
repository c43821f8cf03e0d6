//! Shared helpers for operation tests

use std::path::Path;

use driftwatch_config::Config;
use driftwatch_events::EventReceiver;
use driftwatch_fetch::PackageFetcher;
use driftwatch_snapshot::{SnapshotBuilder, SnapshotStore};

use crate::{OpsCtx, OpsCtxBuilder};

/// Build a context rooted in a temp directory.
///
/// Layout: `<root>/trusted` for the baseline tree, `<root>/checked` for the
/// candidate tree, `<root>/freeze.json` for the freeze file. The fetch tool
/// is `true` so fetch operations succeed without touching a package index.
pub fn test_ctx(root: &Path, libraries: &[&str]) -> (OpsCtx, EventReceiver) {
    let (tx, rx) = driftwatch_events::channel();

    let mut config = Config::default();
    config.paths.trusted_dir = Some(root.join("trusted"));
    config.paths.check_dir = Some(root.join("checked"));
    config.paths.freeze_file = Some(root.join("freeze.json"));
    config.scan.libraries = libraries.iter().map(ToString::to_string).collect();
    config.fetch.tool = "true".to_string();

    let ctx = OpsCtxBuilder::new()
        .with_builder(SnapshotBuilder::new().with_event_sender(tx.clone()))
        .with_store(SnapshotStore::new(config.freeze_file()).with_event_sender(tx.clone()))
        .with_fetcher(PackageFetcher::new(&config.fetch.tool).with_event_sender(tx.clone()))
        .with_event_sender(tx)
        .with_config(config)
        .build()
        .unwrap();

    (ctx, rx)
}

/// Create `<dir>/<library>/<file>` entries with the given contents.
pub async fn seed_library(dir: &Path, library: &str, files: &[(&str, &str)]) {
    for (name, contents) in files {
        let path = dir.join(library).join(name);
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, contents).await.unwrap();
    }
}
