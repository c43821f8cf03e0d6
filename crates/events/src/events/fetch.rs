use serde::{Deserialize, Serialize};

/// Package fetch events covering trusted copy installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchEvent {
    /// The install tool was invoked.
    Started {
        tool: String,
        packages: Vec<String>,
        dest: String,
    },

    /// The install tool exited successfully.
    Completed {
        tool: String,
        packages: Vec<String>,
        duration_ms: u64,
    },

    /// The install tool failed or could not be spawned.
    Failed {
        tool: String,
        failure: super::FailureContext,
    },
}
