#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Trusted package acquisition for driftwatch
//!
//! Populates the trusted library directory by driving an external package
//! installer (`pip` by default) as a subprocess, and resolves which installed
//! tree a check run should inspect when none is configured explicitly.

mod env;
mod fetcher;

pub use env::{resolve_check_dir, site_packages_under};
pub use fetcher::PackageFetcher;
