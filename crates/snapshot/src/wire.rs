//! On-disk freeze file schema
//!
//! The persisted document is deliberately decoupled from the in-memory model
//! so the schema can evolve without touching comparison code. Version 1 is a
//! single UTF-8 JSON object:
//!
//! ```json
//! {
//!   "libs": {
//!     "<lib>": {
//!       "name": "<lib>",
//!       "files": [ { "relative_name": "...", "checksum": "..." }, ... ]
//!     }
//!   },
//!   "trusted": true
//! }
//! ```
//!
//! Library order is normalized to name order by the map; file order within a
//! library is preserved as written.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use driftwatch_errors::{Error, SnapshotError};
use driftwatch_hash::Checksum;

use crate::model::{FileRecord, LibraryRecord, Snapshot};

/// Wire form of a single file record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFile {
    pub relative_name: String,
    pub checksum: Checksum,
}

/// Wire form of a library record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireLibrary {
    pub name: String,
    pub files: Vec<WireFile>,
}

/// Wire form of a whole snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSnapshot {
    pub libs: BTreeMap<String, WireLibrary>,
    pub trusted: bool,
}

impl WireSnapshot {
    /// Build the wire form from an in-memory snapshot
    #[must_use]
    pub fn from_model(snapshot: &Snapshot) -> Self {
        let libs = snapshot
            .libs
            .iter()
            .map(|lib| {
                let files = lib
                    .files
                    .iter()
                    .map(|f| WireFile {
                        relative_name: f.relative_name.clone(),
                        checksum: f.checksum.clone(),
                    })
                    .collect();
                (
                    lib.name.clone(),
                    WireLibrary {
                        name: lib.name.clone(),
                        files,
                    },
                )
            })
            .collect();

        Self {
            libs,
            trusted: snapshot.trusted,
        }
    }

    /// Convert the wire form back into the in-memory model
    ///
    /// # Errors
    ///
    /// Returns an error if a map key disagrees with the embedded library
    /// name, or a library name is empty.
    pub fn into_model(self) -> Result<Snapshot, Error> {
        let mut libs = Vec::with_capacity(self.libs.len());

        for (key, lib) in self.libs {
            if lib.name.is_empty() {
                return Err(SnapshotError::Malformed {
                    message: "empty library name".to_string(),
                }
                .into());
            }
            if key != lib.name {
                return Err(SnapshotError::Malformed {
                    message: format!("library key {key:?} disagrees with name {:?}", lib.name),
                }
                .into());
            }

            let files = lib
                .files
                .into_iter()
                .map(|f| FileRecord::new(f.relative_name, f.checksum))
                .collect();
            libs.push(LibraryRecord {
                name: lib.name,
                files,
            });
        }

        Ok(Snapshot {
            libs,
            trusted: self.trusted,
        })
    }
}

/// Serialize a snapshot to freeze file JSON
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(snapshot: &Snapshot) -> Result<String, Error> {
    serde_json::to_string_pretty(&WireSnapshot::from_model(snapshot)).map_err(|e| {
        SnapshotError::Malformed {
            message: format!("failed to serialize snapshot: {e}"),
        }
        .into()
    })
}

/// Parse a snapshot from freeze file JSON
///
/// # Errors
///
/// Returns an error if the JSON is invalid, required fields are missing, a
/// checksum is not valid hex, or a map key disagrees with its library name.
pub fn from_json(json: &str) -> Result<Snapshot, Error> {
    let wire: WireSnapshot = serde_json::from_str(json).map_err(|e| SnapshotError::Malformed {
        message: format!("invalid freeze file JSON: {e}"),
    })?;
    wire.into_model()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot(trusted: bool) -> Snapshot {
        let mut alpha = LibraryRecord::new("alpha");
        alpha
            .files
            .push(FileRecord::new("alpha/a.py", Checksum::from_data(b"a")));
        alpha
            .files
            .push(FileRecord::new("alpha/sub/b.py", Checksum::from_data(b"b")));

        let mut beta = LibraryRecord::new("beta");
        beta.files
            .push(FileRecord::new("beta/c.py", Checksum::from_data(b"c")));

        Snapshot {
            libs: vec![alpha, beta],
            trusted,
        }
    }

    #[test]
    fn test_round_trip() {
        for trusted in [false, true] {
            let snapshot = sample_snapshot(trusted);
            let json = to_json(&snapshot).unwrap();
            let loaded = from_json(&json).unwrap();
            assert_eq!(loaded, snapshot);
        }
    }

    #[test]
    fn test_round_trip_normalizes_library_order() {
        // Libraries are stored keyed by name, so an out-of-order snapshot
        // comes back name-sorted with every record intact.
        let mut snapshot = sample_snapshot(true);
        snapshot.libs.reverse();

        let loaded = from_json(&to_json(&snapshot).unwrap()).unwrap();
        let names: Vec<&str> = loaded.libs.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(loaded.file_count(), snapshot.file_count());
        assert_eq!(loaded.library("alpha"), snapshot.library("alpha"));
    }

    #[test]
    fn test_schema_field_names() {
        let json = to_json(&sample_snapshot(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["trusted"], serde_json::Value::Bool(true));
        let alpha = &value["libs"]["alpha"];
        assert_eq!(alpha["name"], "alpha");
        let first = &alpha["files"][0];
        assert_eq!(first["relative_name"], "alpha/a.py");
        assert_eq!(
            first["checksum"].as_str().unwrap(),
            Checksum::from_data(b"a").to_hex()
        );
    }

    #[test]
    fn test_key_name_mismatch_rejected() {
        let json = r#"{
            "libs": { "alpha": { "name": "beta", "files": [] } },
            "trusted": true
        }"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(
            err,
            Error::Snapshot(SnapshotError::Malformed { .. })
        ));
    }

    #[test]
    fn test_missing_fields_rejected() {
        for json in [
            "{}",
            r#"{ "libs": {} }"#,
            r#"{ "trusted": false }"#,
            r#"{ "libs": { "a": { "files": [] } }, "trusted": false }"#,
        ] {
            assert!(from_json(json).is_err(), "accepted: {json}");
        }
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let json = r#"{
            "libs": { "a": { "name": "a", "files": [
                { "relative_name": "a/x.py", "checksum": "zz" }
            ] } },
            "trusted": false
        }"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(
            err,
            Error::Snapshot(SnapshotError::Malformed { .. })
        ));
    }

    #[test]
    fn test_not_json_rejected() {
        assert!(from_json("definitely not json").is_err());
    }
}
