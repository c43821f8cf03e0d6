//! Snapshot build and persistence error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("freeze file not found: {path}")]
    NotFound { path: String },

    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    #[error("malformed snapshot: {message}")]
    Malformed { message: String },

    #[error("invalid checksum: {message}")]
    InvalidChecksum { message: String },
}

impl UserFacingError for SnapshotError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => {
                Some("Run `driftwatch freeze` first to record a trusted snapshot.")
            }
            Self::NotADirectory { .. } => {
                Some("Check the directory path passed via flags or configuration.")
            }
            Self::Malformed { .. } | Self::InvalidChecksum { .. } => {
                Some("The freeze file is damaged; re-run `driftwatch freeze` to rewrite it.")
            }
        }
    }
}
