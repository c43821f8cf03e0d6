#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Drift detection for driftwatch
//!
//! Compares a candidate snapshot against a trusted one, reports modified and
//! removed files, and renders human-readable diffs for everything that
//! changed. The comparison is one-directional: files and libraries that only
//! exist on the candidate side are never visited.

pub mod compare;
pub mod diff;
pub mod render;

pub use compare::{Comparator, Discrepancy, DriftReport};
pub use diff::{DiffHunk, DiffLine, TextDiff};
pub use render::DiffRenderer;
