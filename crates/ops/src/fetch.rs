//! Fetch-trusted operation: populate the baseline from a package index

use std::time::Instant;

use driftwatch_errors::{Error, OpsError};
use driftwatch_events::EventEmitter;

use crate::{FetchReport, OpsCtx};

/// Install pristine copies of the tracked libraries into the trusted
/// directory.
///
/// Explicitly requested `packages` override the configured library list; an
/// explicit `index_url` overrides the configured one. The freeze file is not
/// touched; run `freeze` afterwards to capture the new baseline.
///
/// # Errors
///
/// Returns an error if no packages are requested, the install tool is
/// missing, or it exits non-zero.
pub async fn fetch_trusted(
    ctx: &OpsCtx,
    packages: &[String],
    index_url: Option<&str>,
) -> Result<FetchReport, Error> {
    ctx.tx.emit_operation_started("fetch-trusted");

    match run(ctx, packages, index_url).await {
        Ok(report) => {
            ctx.tx.emit_operation_completed("fetch-trusted", true);
            Ok(report)
        }
        Err(e) => {
            ctx.tx.emit_operation_failed("fetch-trusted", e.to_string());
            Err(e)
        }
    }
}

async fn run(
    ctx: &OpsCtx,
    packages: &[String],
    index_url: Option<&str>,
) -> Result<FetchReport, Error> {
    let start = Instant::now();

    let packages = if packages.is_empty() {
        ctx.config.scan.libraries.clone()
    } else {
        packages.to_vec()
    };

    if packages.is_empty() {
        return Err(OpsError::OperationFailed {
            message: "no libraries requested; pass package names or set scan.libraries"
                .to_string(),
        }
        .into());
    }

    let fetcher = match index_url {
        Some(url) => ctx.fetcher.clone().with_index_url(Some(url.to_string())),
        None => ctx.fetcher.clone(),
    };

    let dest = ctx.config.trusted_dir();
    fetcher.fetch(&dest, &packages).await?;

    Ok(FetchReport {
        tool: fetcher.tool().to_string(),
        packages,
        dest,
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}
