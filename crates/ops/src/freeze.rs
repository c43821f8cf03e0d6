//! Freeze operation: capture the trusted baseline

use std::time::Instant;

use driftwatch_errors::Error;
use driftwatch_events::EventEmitter;

use crate::{FreezeReport, OpsCtx};

/// Scan the trusted directory and persist the snapshot as the freeze file.
///
/// The written snapshot is marked trusted, making it a valid baseline for
/// later checks. With no configured library list, every library present in
/// the trusted directory is captured.
///
/// # Errors
///
/// Returns an error if the trusted directory does not exist, a file cannot
/// be hashed, or the freeze file cannot be written.
pub async fn freeze(ctx: &OpsCtx) -> Result<FreezeReport, Error> {
    ctx.tx.emit_operation_started("freeze");

    match run(ctx).await {
        Ok(report) => {
            ctx.tx.emit_operation_completed("freeze", true);
            Ok(report)
        }
        Err(e) => {
            ctx.tx.emit_operation_failed("freeze", e.to_string());
            Err(e)
        }
    }
}

async fn run(ctx: &OpsCtx) -> Result<FreezeReport, Error> {
    let start = Instant::now();

    let trusted_dir = ctx.config.trusted_dir();
    let libraries = ctx.requested_libraries(&trusted_dir).await?;
    let mut snapshot = ctx.builder.scan(&trusted_dir, &libraries).await?;

    // A freeze is by definition the baseline future checks compare against.
    snapshot.trusted = true;

    ctx.store.save(&snapshot).await?;

    Ok(FreezeReport {
        freeze_file: ctx.store.path().to_path_buf(),
        libraries: snapshot.library_count(),
        files: snapshot.file_count(),
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_library, test_ctx};
    use driftwatch_errors::SnapshotError;

    #[tokio::test]
    async fn test_freeze_writes_trusted_snapshot() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _rx) = test_ctx(temp.path(), &["requests"]);

        seed_library(
            &ctx.config.trusted_dir(),
            "requests",
            &[("api.py", "def get(url):\n    pass\n"), ("auth.py", "TOKEN = 1\n")],
        )
        .await;

        let report = freeze(&ctx).await.unwrap();

        assert_eq!(report.libraries, 1);
        assert_eq!(report.files, 2);
        assert_eq!(report.freeze_file, ctx.store.path());

        let stored = ctx.store.load().await.unwrap();
        assert!(stored.trusted, "freeze output must be a valid baseline");
        assert_eq!(stored.file_count(), 2);
    }

    #[tokio::test]
    async fn test_freeze_missing_trusted_dir_fails() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _rx) = test_ctx(temp.path(), &["requests"]);
        // trusted dir never created

        let err = freeze(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Snapshot(SnapshotError::NotADirectory { .. })
        ));
    }

    #[tokio::test]
    async fn test_freeze_ignores_unlisted_libraries() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _rx) = test_ctx(temp.path(), &["requests"]);

        seed_library(&ctx.config.trusted_dir(), "requests", &[("api.py", "x = 1\n")]).await;
        seed_library(&ctx.config.trusted_dir(), "urllib3", &[("pool.py", "y = 2\n")]).await;

        let report = freeze(&ctx).await.unwrap();
        assert_eq!(report.libraries, 1);
        assert_eq!(report.files, 1);
    }

    #[tokio::test]
    async fn test_freeze_without_library_list_captures_everything() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _rx) = test_ctx(temp.path(), &[]);

        seed_library(&ctx.config.trusted_dir(), "requests", &[("api.py", "x = 1\n")]).await;
        seed_library(&ctx.config.trusted_dir(), "urllib3", &[("pool.py", "y = 2\n")]).await;

        let report = freeze(&ctx).await.unwrap();
        assert_eq!(report.libraries, 2);
        assert_eq!(report.files, 2);
    }
}
