//! Resolution of the installed-packages directory to verify

use std::path::{Path, PathBuf};

use driftwatch_errors::{Error, FetchError};

/// Resolve the directory whose installed packages should be checked.
///
/// An explicitly configured directory always wins. Otherwise the active
/// virtual environment (`$VIRTUAL_ENV`) is probed for its `site-packages`
/// directory.
///
/// # Errors
///
/// Returns `FetchError::NoCheckDir` when nothing is configured and no
/// virtual environment is active.
pub async fn resolve_check_dir(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Some(venv) = std::env::var_os("VIRTUAL_ENV") {
        if let Some(site_packages) = site_packages_under(Path::new(&venv)).await {
            return Ok(site_packages);
        }
    }

    Err(FetchError::NoCheckDir.into())
}

/// Locate `<root>/lib/python*/site-packages` below a virtual environment root.
///
/// When several `python*` directories exist (stale interpreters after an
/// upgrade), the lexicographically first one with a `site-packages` child
/// wins, keeping resolution deterministic.
pub async fn site_packages_under(root: &Path) -> Option<PathBuf> {
    let lib_dir = root.join("lib");
    let mut entries = tokio::fs::read_dir(&lib_dir).await.ok()?;

    let mut candidates = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with("python") {
            continue;
        }

        let site_packages = entry.path().join("site-packages");
        if tokio::fs::metadata(&site_packages)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            candidates.push(site_packages);
        }
    }

    candidates.sort();
    candidates.into_iter().next()
}
