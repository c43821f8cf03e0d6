#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Snapshot building and persistence for driftwatch
//!
//! A snapshot records the per-file checksums of a set of library directories
//! under one root. Snapshots built from disk start out untrusted; callers that
//! vouch for the source directory mark them trusted, and only trusted
//! snapshots may serve as the baseline of a comparison.

pub mod build;
pub mod model;
pub mod store;
pub mod wire;

pub use build::{discover_libraries, SnapshotBuilder};
pub use model::{FileRecord, LibraryRecord, Snapshot};
pub use store::SnapshotStore;
