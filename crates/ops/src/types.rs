//! Report types for operations

use std::path::PathBuf;

use driftwatch_verify::DriftReport;
use serde::Serialize;

/// Report of a freeze operation
#[derive(Clone, Debug, Serialize)]
pub struct FreezeReport {
    /// Where the freeze file was written
    pub freeze_file: PathBuf,
    /// Number of libraries captured
    pub libraries: usize,
    /// Number of files captured
    pub files: usize,
    /// Execution time in milliseconds
    pub duration_ms: u64,
}

/// Which baseline a check ran against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustedSource {
    /// Loaded from a previously written freeze file
    FreezeFile,
    /// Scanned from the trusted directory on the fly
    TrustedDir,
}

/// Report of a check operation
#[derive(Clone, Debug, Serialize)]
pub struct CheckReport {
    /// Baseline the candidate was compared against
    pub trusted_source: TrustedSource,
    /// Directory whose installed libraries were checked
    pub checked_dir: PathBuf,
    /// Comparison outcome
    pub drift: DriftReport,
    /// Rendered unified diffs and removal notices, empty when clean
    pub diff_output: String,
    /// Execution time in milliseconds, including scans and rendering
    pub duration_ms: u64,
}

/// Report of a fetch-trusted operation
#[derive(Clone, Debug, Serialize)]
pub struct FetchReport {
    /// Install tool that was invoked
    pub tool: String,
    /// Packages that were requested
    pub packages: Vec<String>,
    /// Directory the packages were installed into
    pub dest: PathBuf,
    /// Execution time in milliseconds
    pub duration_ms: u64,
}
