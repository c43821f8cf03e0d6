//! Snapshot comparison

use std::time::Instant;

use uuid::Uuid;

use driftwatch_errors::{Error, VerifyError};
use driftwatch_events::{
    AppEvent, DriftNotice, EventEmitter, EventSender, FailureContext, VerifyEvent,
};
use driftwatch_snapshot::{FileRecord, Snapshot};

/// Drift discovered for a single trusted file.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    /// The file exists on the candidate side with different contents.
    Modified {
        library: String,
        checked: FileRecord,
        trusted: FileRecord,
    },
    /// The file has no counterpart on the candidate side.
    Removed { library: String, trusted: FileRecord },
}

impl Discrepancy {
    /// The trusted-side relative name this discrepancy is about
    #[must_use]
    pub fn relative_name(&self) -> &str {
        match self {
            Discrepancy::Modified { trusted, .. } | Discrepancy::Removed { trusted, .. } => {
                &trusted.relative_name
            }
        }
    }

    /// The library the file belongs to
    #[must_use]
    pub fn library(&self) -> &str {
        match self {
            Discrepancy::Modified { library, .. } | Discrepancy::Removed { library, .. } => library,
        }
    }

    fn to_notice(&self) -> DriftNotice {
        match self {
            Discrepancy::Modified {
                library, trusted, ..
            } => DriftNotice {
                kind: "modified".to_string(),
                library: library.clone(),
                file: trusted.relative_name.clone(),
                message: format!("{} differs from the trusted copy", trusted.relative_name),
            },
            Discrepancy::Removed { library, trusted } => DriftNotice {
                kind: "removed".to_string(),
                library: library.clone(),
                file: trusted.relative_name.clone(),
                message: format!("{} was removed", trusted.relative_name),
            },
        }
    }
}

/// Result of comparing a candidate snapshot against the trusted one.
///
/// Discrepancy order follows the trusted snapshot (libraries in snapshot
/// order, files in record order) and is stable across runs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DriftReport {
    pub discrepancies: Vec<Discrepancy>,
    pub is_clean: bool,
    pub libraries_checked: usize,
    pub files_checked: usize,
    pub duration_ms: u64,
}

impl DriftReport {
    #[must_use]
    pub fn new(
        discrepancies: Vec<Discrepancy>,
        libraries_checked: usize,
        files_checked: usize,
        duration_ms: u64,
    ) -> Self {
        let is_clean = discrepancies.is_empty();
        Self {
            discrepancies,
            is_clean,
            libraries_checked,
            files_checked,
            duration_ms,
        }
    }
}

/// Compares snapshots and reports drift.
///
/// Only a trusted snapshot may serve as the baseline. The walk visits every
/// trusted file exactly once; candidate-only files and libraries stay
/// invisible by design.
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    event_sender: Option<EventSender>,
}

impl EventEmitter for Comparator {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl Comparator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an event sender for verification progress
    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Compare `candidate` against the `trusted` baseline
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::UntrustedSource` when the baseline snapshot is
    /// not marked trusted, regardless of content.
    pub fn compare(&self, trusted: &Snapshot, candidate: &Snapshot) -> Result<DriftReport, Error> {
        let started = Instant::now();
        let operation_id = Uuid::new_v4().to_string();

        if !trusted.trusted {
            let err = VerifyError::UntrustedSource;
            self.emit(AppEvent::Verify(VerifyEvent::Failed {
                operation_id,
                failure: FailureContext::from_error(&err),
            }));
            return Err(err.into());
        }

        self.emit(AppEvent::Verify(VerifyEvent::Started {
            operation_id: operation_id.clone(),
            libraries: trusted.library_count(),
            files: trusted.file_count(),
        }));

        let mut discrepancies = Vec::new();
        let mut files_checked = 0usize;

        for lib in &trusted.libs {
            let candidate_lib = candidate.library(&lib.name);

            for file in &lib.files {
                files_checked += 1;

                match candidate_lib.and_then(|c| c.file(&file.relative_name)) {
                    None => {
                        let discrepancy = Discrepancy::Removed {
                            library: lib.name.clone(),
                            trusted: file.clone(),
                        };
                        self.emit_drift(&operation_id, &discrepancy);
                        discrepancies.push(discrepancy);
                    }
                    Some(checked) if checked.checksum != file.checksum => {
                        let discrepancy = Discrepancy::Modified {
                            library: lib.name.clone(),
                            checked: checked.clone(),
                            trusted: file.clone(),
                        };
                        self.emit_drift(&operation_id, &discrepancy);
                        discrepancies.push(discrepancy);
                    }
                    Some(_) => {}
                }
            }
        }

        let duration_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.emit(AppEvent::Verify(VerifyEvent::Completed {
            operation_id,
            discrepancies: discrepancies.len(),
            files_checked,
            duration_ms,
        }));

        Ok(DriftReport::new(
            discrepancies,
            trusted.library_count(),
            files_checked,
            duration_ms,
        ))
    }

    fn emit_drift(&self, operation_id: &str, discrepancy: &Discrepancy) {
        self.emit(AppEvent::Verify(VerifyEvent::DriftDetected {
            operation_id: operation_id.to_string(),
            notice: discrepancy.to_notice(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_hash::Checksum;
    use driftwatch_snapshot::LibraryRecord;

    fn record(name: &str, data: &[u8]) -> FileRecord {
        FileRecord::new(name, Checksum::from_data(data))
    }

    fn snapshot(trusted: bool, libs: Vec<LibraryRecord>) -> Snapshot {
        Snapshot { libs, trusted }
    }

    fn lib(name: &str, files: Vec<FileRecord>) -> LibraryRecord {
        LibraryRecord {
            name: name.to_string(),
            files,
        }
    }

    #[test]
    fn test_untrusted_baseline_refused() {
        let side = snapshot(false, vec![lib("a", vec![record("a/x.py", b"x")])]);
        // Even a self-comparison is refused when the baseline is untrusted
        let err = Comparator::new().compare(&side, &side).unwrap_err();
        assert!(matches!(
            err,
            Error::Verify(VerifyError::UntrustedSource)
        ));
    }

    #[test]
    fn test_identical_snapshots_are_clean() {
        let trusted = snapshot(true, vec![lib("a", vec![record("a/x.py", b"x")])]);
        let candidate = snapshot(false, vec![lib("a", vec![record("a/x.py", b"x")])]);

        let report = Comparator::new().compare(&trusted, &candidate).unwrap();
        assert!(report.is_clean);
        assert!(report.discrepancies.is_empty());
        assert_eq!(report.libraries_checked, 1);
        assert_eq!(report.files_checked, 1);
    }

    #[test]
    fn test_modified_file_detected() {
        let trusted = snapshot(true, vec![lib("a", vec![record("a/x.py", b"old")])]);
        let candidate = snapshot(false, vec![lib("a", vec![record("a/x.py", b"new")])]);

        let report = Comparator::new().compare(&trusted, &candidate).unwrap();
        assert_eq!(report.discrepancies.len(), 1);
        assert!(!report.is_clean);
        match &report.discrepancies[0] {
            Discrepancy::Modified {
                library,
                checked,
                trusted,
            } => {
                assert_eq!(library, "a");
                assert_eq!(trusted.relative_name, "a/x.py");
                assert_ne!(checked.checksum, trusted.checksum);
            }
            other => panic!("expected Modified, got {other:?}"),
        }
    }

    #[test]
    fn test_removed_file_detected() {
        let trusted = snapshot(
            true,
            vec![lib("a", vec![record("a/x.py", b"x"), record("a/y.py", b"y")])],
        );
        let candidate = snapshot(false, vec![lib("a", vec![record("a/x.py", b"x")])]);

        let report = Comparator::new().compare(&trusted, &candidate).unwrap();
        assert_eq!(report.discrepancies.len(), 1);
        match &report.discrepancies[0] {
            Discrepancy::Removed { trusted, .. } => {
                assert_eq!(trusted.relative_name, "a/y.py");
            }
            other => panic!("expected Removed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_library_yields_per_file_removals() {
        let trusted = snapshot(
            true,
            vec![lib("gone", vec![record("gone/a.py", b"a"), record("gone/b.py", b"b")])],
        );
        let candidate = snapshot(false, vec![]);

        let report = Comparator::new().compare(&trusted, &candidate).unwrap();
        assert_eq!(report.discrepancies.len(), 2);
        assert!(report
            .discrepancies
            .iter()
            .all(|d| matches!(d, Discrepancy::Removed { .. })));
    }

    #[test]
    fn test_candidate_only_content_is_invisible() {
        let trusted = snapshot(true, vec![lib("a", vec![record("a/x.py", b"x")])]);
        let candidate = snapshot(
            false,
            vec![
                lib(
                    "a",
                    vec![record("a/x.py", b"x"), record("a/planted.py", b"evil")],
                ),
                lib("extra", vec![record("extra/mod.py", b"m")]),
            ],
        );

        let report = Comparator::new().compare(&trusted, &candidate).unwrap();
        assert!(report.is_clean);
    }

    #[test]
    fn test_discrepancy_order_follows_trusted_snapshot() {
        let trusted = snapshot(
            true,
            vec![
                lib("first", vec![record("first/a.py", b"1"), record("first/b.py", b"2")]),
                lib("second", vec![record("second/c.py", b"3")]),
            ],
        );
        let candidate = snapshot(false, vec![]);

        let report = Comparator::new().compare(&trusted, &candidate).unwrap();
        let names: Vec<&str> = report
            .discrepancies
            .iter()
            .map(Discrepancy::relative_name)
            .collect();
        assert_eq!(names, vec!["first/a.py", "first/b.py", "second/c.py"]);
    }

    #[test]
    fn test_empty_trusted_snapshot_is_clean() {
        let trusted = snapshot(true, vec![]);
        let candidate = snapshot(false, vec![lib("a", vec![record("a/x.py", b"x")])]);

        let report = Comparator::new().compare(&trusted, &candidate).unwrap();
        assert!(report.is_clean);
        assert_eq!(report.files_checked, 0);
    }
}
