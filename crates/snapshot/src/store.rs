//! Freeze file persistence

use std::path::{Path, PathBuf};

use tokio::fs;

use driftwatch_errors::{Error, SnapshotError};
use driftwatch_events::{AppEvent, EventEmitter, EventSender, SnapshotEvent};

use crate::model::Snapshot;
use crate::wire;

/// Reads and writes freeze files at a fixed path
///
/// The store never inspects the filesystem the snapshot describes; the
/// freeze file is historical data and stays valid after the scanned tree
/// changes or disappears.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    event_sender: Option<EventSender>,
}

impl EventEmitter for SnapshotStore {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl SnapshotStore {
    /// Create a store for the given freeze file path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            event_sender: None,
        }
    }

    /// Attach an event sender for persistence notifications
    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// The freeze file path this store operates on
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a snapshot to the freeze file
    ///
    /// The document is written to a temporary file and atomically renamed
    /// into place, so a crash never leaves a half-written freeze file.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::io_with_path(&e, parent))?;
            }
        }

        let json = wire::to_json(snapshot)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json)
            .await
            .map_err(|e| Error::io_with_path(&e, &temp_path))?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::io_with_path(&e, &self.path))?;

        self.emit(AppEvent::Snapshot(SnapshotEvent::Saved {
            path: self.path.display().to_string(),
            libraries: snapshot.library_count(),
        }));

        Ok(())
    }

    /// Read a snapshot back from the freeze file
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or does not parse as a
    /// valid freeze document.
    pub async fn load(&self) -> Result<Snapshot, Error> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(SnapshotError::NotFound {
                    path: self.path.display().to_string(),
                })
            } else {
                Error::io_with_path(&e, &self.path)
            }
        })?;

        let snapshot = wire::from_json(&content)?;

        self.emit(AppEvent::Snapshot(SnapshotEvent::Loaded {
            path: self.path.display().to_string(),
            libraries: snapshot.library_count(),
            trusted: snapshot.trusted,
        }));

        Ok(snapshot)
    }

    /// Check whether the freeze file exists
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileRecord, LibraryRecord};
    use driftwatch_hash::Checksum;
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        let mut lib = LibraryRecord::new("requests");
        lib.files.push(FileRecord::new(
            "requests/api.py",
            Checksum::from_data(b"api"),
        ));
        Snapshot {
            libs: vec![lib],
            trusted: true,
        }
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let temp = tempdir().unwrap();
        let store = SnapshotStore::new(temp.path().join("freeze.json"));

        assert!(!store.exists().await);
        assert!(store.load().await.is_err());

        let snapshot = sample_snapshot();
        store.save(&snapshot).await.unwrap();
        assert!(store.exists().await);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, snapshot);
        assert!(loaded.trusted);
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("a").join("b").join("freeze.json");
        let store = SnapshotStore::new(&nested);

        store.save(&sample_snapshot()).await.unwrap();
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let temp = tempdir().unwrap();
        let store = SnapshotStore::new(temp.path().join("absent.json"));
        let err = store.load().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Snapshot(SnapshotError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_unreadable_path_is_not_reported_missing() {
        // A freeze path that exists but cannot be read as a file must not
        // masquerade as an absent freeze file.
        let temp = tempdir().unwrap();
        let path = temp.path().join("freeze.json");
        std::fs::create_dir(&path).unwrap();

        let err = SnapshotStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn test_load_garbage_is_malformed() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("freeze.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SnapshotStore::new(&path).load().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Snapshot(SnapshotError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_never_touches_scanned_tree() {
        // Freeze file describing paths that do not exist loads fine
        let temp = tempdir().unwrap();
        let store = SnapshotStore::new(temp.path().join("freeze.json"));
        store.save(&sample_snapshot()).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.library_count(), 1);
    }
}
