//! Check operation: compare installed libraries against the baseline

use std::time::Instant;

use driftwatch_errors::Error;
use driftwatch_events::EventEmitter;
use driftwatch_fetch::resolve_check_dir;
use driftwatch_verify::{Comparator, DiffRenderer};

use crate::{CheckReport, OpsCtx, TrustedSource};

/// Compare the installed libraries against the trusted baseline.
///
/// The baseline is the freeze file when one exists, otherwise a fresh scan
/// of the trusted directory. The candidate side is the configured check
/// directory, or the active virtual environment's `site-packages` when none
/// is configured; it is scanned for exactly the libraries the baseline
/// records. Every discrepancy is rendered into the report's `diff_output`.
///
/// # Errors
///
/// Returns an error if no check directory can be resolved, a scan fails,
/// or the baseline snapshot is not trusted.
pub async fn check(ctx: &OpsCtx) -> Result<CheckReport, Error> {
    ctx.tx.emit_operation_started("check");

    match run(ctx).await {
        Ok(report) => {
            ctx.tx.emit_operation_completed("check", true);
            Ok(report)
        }
        Err(e) => {
            ctx.tx.emit_operation_failed("check", e.to_string());
            Err(e)
        }
    }
}

async fn run(ctx: &OpsCtx) -> Result<CheckReport, Error> {
    let start = Instant::now();

    let checked_dir = resolve_check_dir(ctx.config.check_dir().as_deref()).await?;
    let trusted_dir = ctx.config.trusted_dir();

    // Prefer the freeze file; its trusted flag travels with it, so a
    // tampered or hand-written file is refused by the comparator.
    let (trusted, trusted_source) = if ctx.store.exists().await {
        (ctx.store.load().await?, TrustedSource::FreezeFile)
    } else {
        let libraries = ctx.requested_libraries(&trusted_dir).await?;
        let mut snapshot = ctx.builder.scan(&trusted_dir, &libraries).await?;
        snapshot.trusted = true;
        (snapshot, TrustedSource::TrustedDir)
    };

    // The baseline's library set defines what the candidate scan covers.
    let library_names: Vec<String> = trusted.libs.iter().map(|lib| lib.name.clone()).collect();
    let candidate = ctx.builder.scan(&checked_dir, &library_names).await?;

    let comparator = Comparator::new().with_event_sender(ctx.tx.clone());
    let drift = comparator.compare(&trusted, &candidate)?;

    let renderer = DiffRenderer::new().with_event_sender(ctx.tx.clone());
    let diff_output = renderer.render(&drift, &trusted_dir, &checked_dir).await?;

    Ok(CheckReport {
        trusted_source,
        checked_dir,
        drift,
        diff_output,
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}
