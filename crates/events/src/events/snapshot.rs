use serde::{Deserialize, Serialize};

/// Snapshot events for directory scans and freeze file persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotEvent {
    /// A directory scan started.
    ScanStarted {
        root: String,
        libraries: Vec<String>,
    },

    /// One library's tree was walked and checksummed.
    LibraryScanned { library: String, files: usize },

    /// The scan completed and a snapshot was assembled.
    ScanCompleted {
        libraries: usize,
        files: usize,
        duration_ms: u64,
    },

    /// A snapshot was written to a freeze file.
    Saved { path: String, libraries: usize },

    /// A snapshot was read back from a freeze file.
    Loaded {
        path: String,
        libraries: usize,
        trusted: bool,
    },
}
