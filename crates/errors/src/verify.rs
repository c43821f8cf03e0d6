//! Verification error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum VerifyError {
    /// Comparison was asked to treat an unverified snapshot as the baseline.
    #[error("reference snapshot is not marked trusted")]
    UntrustedSource,
}

impl UserFacingError for VerifyError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UntrustedSource => {
                Some("Only snapshots produced by `freeze` or `fetch-trusted` can serve as the baseline.")
            }
        }
    }
}
