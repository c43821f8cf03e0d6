//! Snapshot data model

use driftwatch_hash::Checksum;
use serde::Serialize;

/// Checksum record for a single file
///
/// `relative_name` is relative to the snapshot root, so it carries the
/// library directory as its first `/`-separated component. It is the
/// identity used to match files across snapshots; the checksum is the
/// compared payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub relative_name: String,
    pub checksum: Checksum,
}

impl FileRecord {
    /// Create a new file record
    #[must_use]
    pub fn new(relative_name: impl Into<String>, checksum: Checksum) -> Self {
        Self {
            relative_name: relative_name.into(),
            checksum,
        }
    }
}

/// All recorded files of one library directory
///
/// File order is builder traversal order (lexicographic); matching is by
/// `relative_name`, never by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRecord {
    pub name: String,
    pub files: Vec<FileRecord>,
}

impl LibraryRecord {
    /// Create a new empty library record
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }

    /// Look up a file by its root-relative name
    #[must_use]
    pub fn file(&self, relative_name: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.relative_name == relative_name)
    }

    /// Number of recorded files
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// A full checksum snapshot of one scan root
///
/// Library names are unique within a snapshot. `trusted` defaults to false;
/// it is set explicitly by callers that vouch for the source directory, or
/// restored from a persisted freeze file.
///
/// The builder produces `libs` in name order and the freeze file stores them
/// keyed by name, so persistence normalizes any other ordering; library
/// order is not part of a snapshot's identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub libs: Vec<LibraryRecord>,
    pub trusted: bool,
}

impl Snapshot {
    /// Create a new empty untrusted snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a library by name
    #[must_use]
    pub fn library(&self, name: &str) -> Option<&LibraryRecord> {
        self.libs.iter().find(|l| l.name == name)
    }

    /// Number of tracked libraries
    #[must_use]
    pub fn library_count(&self) -> usize {
        self.libs.len()
    }

    /// Total number of recorded files across all libraries
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.libs.iter().map(LibraryRecord::file_count).sum()
    }

    /// True when no library holds any file
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }
}
