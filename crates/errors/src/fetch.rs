//! Package fetch error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("install tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("{tool} exited with status {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("no installed-packages directory to check")]
    NoCheckDir,
}

impl UserFacingError for FetchError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolNotFound { .. } => {
                Some("Install pip or point fetch.tool at an installer available on PATH.")
            }
            Self::ToolFailed { .. } => {
                Some("Inspect the tool output above; the requested packages may not exist.")
            }
            Self::NoCheckDir => {
                Some("Activate a virtual environment or pass --check with the directory to verify.")
            }
        }
    }
}
