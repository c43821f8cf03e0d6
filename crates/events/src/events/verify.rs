use serde::{Deserialize, Serialize};

/// Structured description of a single piece of drift surfaced to consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftNotice {
    /// Discrepancy kind, `modified` or `removed`.
    pub kind: String,
    pub library: String,
    pub file: String,
    pub message: String,
}

/// Verification events for drift detection and diff rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerifyEvent {
    /// Comparison of a candidate snapshot against the trusted one started.
    Started {
        operation_id: String,
        libraries: usize,
        files: usize,
    },

    /// Comparison finished.
    Completed {
        operation_id: String,
        discrepancies: usize,
        files_checked: usize,
        duration_ms: u64,
    },

    /// Comparison aborted before completion.
    Failed {
        operation_id: String,
        failure: super::FailureContext,
    },

    /// A discrepancy was discovered during comparison.
    DriftDetected {
        operation_id: String,
        notice: DriftNotice,
    },

    /// A file's diff could not be rendered and was skipped.
    RenderSkipped { path: String, reason: String },
}
