//! Directory scanning and snapshot assembly

use std::path::Path;
use std::time::Instant;

use tokio::fs;
use walkdir::WalkDir;

use driftwatch_errors::{Error, SnapshotError};
use driftwatch_events::{AppEvent, EventEmitter, EventSender, SnapshotEvent};
use driftwatch_hash::Checksum;

use crate::model::{FileRecord, LibraryRecord, Snapshot};

/// Scans library directories under a root and assembles untrusted snapshots
///
/// Only immediate children of the root that appear in the requested library
/// list are scanned; requested names with no matching directory are silently
/// skipped. Traversal is sorted by file name so snapshots are reproducible
/// across runs and filesystems.
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    extensions: Vec<String>,
    event_sender: Option<EventSender>,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter for SnapshotBuilder {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl SnapshotBuilder {
    /// Create a builder with the default extension filter (`py`)
    #[must_use]
    pub fn new() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            event_sender: None,
        }
    }

    /// Replace the extension filter
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Attach an event sender for scan progress
    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Scan `root` and record checksums for the named libraries
    ///
    /// The returned snapshot is untrusted; callers that vouch for the root
    /// mark it trusted themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not an existing directory or a file
    /// cannot be read while hashing.
    pub async fn scan(&self, root: &Path, library_names: &[String]) -> Result<Snapshot, Error> {
        let started = Instant::now();

        if !fs::metadata(root).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(SnapshotError::NotADirectory {
                path: root.display().to_string(),
            }
            .into());
        }

        self.emit(AppEvent::Snapshot(SnapshotEvent::ScanStarted {
            root: root.display().to_string(),
            libraries: library_names.to_vec(),
        }));

        let mut snapshot = Snapshot::new();

        let mut selected = discover_libraries(root).await?;
        selected.retain(|name| library_names.contains(name));

        for name in selected {
            let lib = self.scan_library(root, &name).await?;
            self.emit(AppEvent::Snapshot(SnapshotEvent::LibraryScanned {
                library: lib.name.clone(),
                files: lib.file_count(),
            }));
            snapshot.libs.push(lib);
        }

        self.emit(AppEvent::Snapshot(SnapshotEvent::ScanCompleted {
            libraries: snapshot.library_count(),
            files: snapshot.file_count(),
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }));

        Ok(snapshot)
    }

    /// Walk one library directory and checksum every matching file
    async fn scan_library(&self, root: &Path, name: &str) -> Result<LibraryRecord, Error> {
        let mut lib = LibraryRecord::new(name);
        let lib_dir = root.join(name);

        let mut paths = Vec::new();
        for entry in WalkDir::new(&lib_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::internal(format!("walk failed under {}: {e}", lib_dir.display()))
            })?;
            if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        for path in paths {
            let checksum = Checksum::hash_file(&path).await?;
            lib.files
                .push(FileRecord::new(relative_name(root, &path), checksum));
        }

        Ok(lib)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// List every library present under a root, in name order
///
/// A library is any immediate child directory; entries with non-UTF-8 names
/// are skipped. Callers with no configured library list use this to track
/// everything installed under the trusted directory.
///
/// # Errors
///
/// Returns an error if `root` is not an existing directory or cannot be
/// read.
pub async fn discover_libraries(root: &Path) -> Result<Vec<String>, Error> {
    if !fs::metadata(root).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Err(SnapshotError::NotADirectory {
            path: root.display().to_string(),
        }
        .into());
    }

    let mut found = Vec::new();
    let mut entries = fs::read_dir(root)
        .await
        .map_err(|e| Error::io_with_path(&e, root))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::io_with_path(&e, root))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::io_with_path(&e, entry.path()))?;
        if !file_type.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        found.push(name);
    }

    found.sort();
    Ok(found)
}

/// Root-relative `/`-separated name for a scanned file
fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    parts.join("/")
}
