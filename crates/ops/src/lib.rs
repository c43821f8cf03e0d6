#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for driftwatch
//!
//! This crate serves as the orchestration layer between the CLI and the
//! specialized crates: snapshot building and persistence, comparison, diff
//! rendering, and trusted-copy fetching. Each operation takes an [`OpsCtx`]
//! and returns a serializable report.

mod check;
mod context;
mod fetch;
mod freeze;
#[cfg(test)]
mod test_support;
mod types;

pub use check::check;
pub use context::{OpsCtx, OpsCtxBuilder};
pub use fetch::fetch_trusted;
pub use freeze::freeze;
pub use types::{CheckReport, FetchReport, FreezeReport, TrustedSource};

use driftwatch_errors::Error;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OperationResult {
    /// Freeze report
    Freeze(FreezeReport),
    /// Check report
    Check(CheckReport),
    /// Fetch report
    Fetch(FetchReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns `OpsError::SerializationError` if the report cannot be
    /// serialized.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            driftwatch_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Whether the result describes a drift-free outcome.
    ///
    /// Freeze and fetch results are always clean. A check result is clean
    /// when no discrepancies were found. Drift does not affect the process
    /// exit code; this only drives display emphasis.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        match self {
            OperationResult::Freeze(_) | OperationResult::Fetch(_) => true,
            OperationResult::Check(report) => report.drift.is_clean,
        }
    }
}
