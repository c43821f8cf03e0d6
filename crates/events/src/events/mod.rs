use serde::{Deserialize, Serialize};

use driftwatch_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(message: impl Into<String>, hint: Option<impl Into<String>>) -> Self {
        Self {
            message: message.into(),
            hint: hint.map(Into::into),
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(error.user_message().into_owned(), error.user_hint())
    }
}

// Declare all domain modules
pub mod fetch;
pub mod general;
pub mod snapshot;
pub mod verify;

// Re-export all domain events
pub use fetch::*;
pub use general::*;
pub use snapshot::*;
pub use verify::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Snapshot events (directory scans, freeze file persistence)
    Snapshot(SnapshotEvent),

    /// Verification events (drift detection, diff rendering)
    Verify(VerifyEvent),

    /// Package fetch events (trusted copy installation)
    Fetch(FetchEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            // Error-level events
            Self::General(
                GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. },
            )
            | Self::Verify(VerifyEvent::Failed { .. })
            | Self::Fetch(FetchEvent::Failed { .. }) => Level::ERROR,

            // Warning-level events
            Self::General(GeneralEvent::Warning { .. })
            | Self::Verify(
                VerifyEvent::DriftDetected { .. } | VerifyEvent::RenderSkipped { .. },
            ) => Level::WARN,

            // Debug-level events (per-item scan chatter)
            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Snapshot(SnapshotEvent::LibraryScanned { .. }) => Level::DEBUG,

            // Default to INFO for most events
            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "driftwatch::events::general",
            Self::Snapshot(_) => "driftwatch::events::snapshot",
            Self::Verify(_) => "driftwatch::events::verify",
            Self::Fetch(_) => "driftwatch::events::fetch",
        }
    }

    /// Get structured fields for logging (simplified for now)
    #[must_use]
    pub fn log_fields(&self) -> String {
        format!("{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_event_wire_shape() {
        let event = AppEvent::Snapshot(SnapshotEvent::Saved {
            path: "/tmp/freeze.json".to_string(),
            libraries: 2,
        });

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["domain"], "snapshot");
        assert_eq!(value["event"]["type"], "saved");
        assert_eq!(value["event"]["libraries"], 2);
    }

    #[test]
    fn test_failure_context_omits_missing_hint() {
        let failure = FailureContext::new("pip exited with status 1", None::<String>);
        let value = serde_json::to_value(&failure).unwrap();
        assert!(value.get("hint").is_none());
    }
}
