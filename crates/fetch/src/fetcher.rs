//! Subprocess driver for the package install tool

use std::path::Path;
use std::time::Instant;

use driftwatch_errors::{Error, FetchError};
use driftwatch_events::{AppEvent, EventEmitter, EventSender, FailureContext, FetchEvent};
use tokio::process::Command;

/// Installs packages into a destination directory via an external tool.
///
/// The tool is expected to speak the pip command line: it is invoked as
/// `<tool> install --target <dest> [--index-url <url>] <packages...>`.
/// Any installer with a compatible interface (`uv pip` wrappers, corporate
/// pip forks) can be substituted through configuration.
#[derive(Clone, Debug)]
pub struct PackageFetcher {
    tool: String,
    index_url: Option<String>,
    event_sender: Option<EventSender>,
}

impl Default for PackageFetcher {
    fn default() -> Self {
        Self::new("pip")
    }
}

impl EventEmitter for PackageFetcher {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl PackageFetcher {
    /// Create a fetcher that drives the given install tool.
    #[must_use]
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            index_url: None,
            event_sender: None,
        }
    }

    /// Route installs through an alternative package index.
    #[must_use]
    pub fn with_index_url(mut self, index_url: Option<String>) -> Self {
        self.index_url = index_url;
        self
    }

    /// Attach an event sender for progress reporting.
    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Name of the configured install tool.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Install `packages` into `dest`, creating the directory if needed.
    ///
    /// The tool's exit status decides success; stdout and stderr are
    /// captured rather than inherited so the caller controls all output.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::ToolNotFound` if the tool binary cannot be
    /// spawned, `FetchError::ToolFailed` if it exits non-zero, or an I/O
    /// error if the destination directory cannot be created.
    pub async fn fetch(&self, dest: &Path, packages: &[String]) -> Result<(), Error> {
        let started = Instant::now();

        tokio::fs::create_dir_all(dest)
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;

        self.emit(AppEvent::Fetch(FetchEvent::Started {
            tool: self.tool.clone(),
            packages: packages.to_vec(),
            dest: dest.display().to_string(),
        }));

        let mut command = Command::new(&self.tool);
        command.arg("install").arg("--target").arg(dest);
        if let Some(index_url) = &self.index_url {
            command.arg("--index-url").arg(index_url);
        }
        command.args(packages);

        let output = match command.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(self.fail(FetchError::ToolNotFound {
                    tool: self.tool.clone(),
                }));
            }
            Err(e) => return Err(self.fail_io(&e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(self.fail(FetchError::ToolFailed {
                tool: self.tool.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr,
            }));
        }

        self.emit(AppEvent::Fetch(FetchEvent::Completed {
            tool: self.tool.clone(),
            packages: packages.to_vec(),
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }));

        Ok(())
    }

    fn fail(&self, error: FetchError) -> Error {
        self.emit(AppEvent::Fetch(FetchEvent::Failed {
            tool: self.tool.clone(),
            failure: FailureContext::from_error(&error),
        }));
        error.into()
    }

    fn fail_io(&self, error: &std::io::Error) -> Error {
        self.emit(AppEvent::Fetch(FetchEvent::Failed {
            tool: self.tool.clone(),
            failure: FailureContext::new(error.to_string(), None::<String>),
        }));
        Error::io_with_path(error, Path::new(&self.tool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_errors::Error;
    use tempfile::tempdir;

    fn packages(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_successful_tool_run() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("trusted");

        // `true` ignores its arguments and exits zero.
        let fetcher = PackageFetcher::new("true");
        fetcher.fetch(&dest, &packages(&["requests"])).await.unwrap();

        assert!(dest.is_dir(), "destination directory should be created");
    }

    #[tokio::test]
    async fn test_failing_tool_reports_status() {
        let dir = tempdir().unwrap();

        let fetcher = PackageFetcher::new("false");
        let err = fetcher
            .fetch(dir.path(), &packages(&["requests"]))
            .await
            .unwrap_err();

        match err {
            Error::Fetch(FetchError::ToolFailed { tool, status, .. }) => {
                assert_eq!(tool, "false");
                assert_eq!(status, 1);
            }
            other => panic!("expected ToolFailed, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_tool_reports_not_found() {
        let dir = tempdir().unwrap();

        let fetcher = PackageFetcher::new("driftwatch-no-such-installer");
        let err = fetcher
            .fetch(dir.path(), &packages(&["requests"]))
            .await
            .unwrap_err();

        match err {
            Error::Fetch(FetchError::ToolNotFound { tool }) => {
                assert_eq!(tool, "driftwatch-no-such-installer");
            }
            other => panic!("expected ToolNotFound, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_emits_event() {
        let dir = tempdir().unwrap();
        let (tx, mut rx) = driftwatch_events::channel();

        let fetcher = PackageFetcher::new("false").with_event_sender(tx);
        let _ = fetcher.fetch(dir.path(), &packages(&["requests"])).await;

        let mut saw_failed = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, AppEvent::Fetch(FetchEvent::Failed { .. })) {
                saw_failed = true;
            }
        }
        assert!(saw_failed, "expected a Failed fetch event");
    }
}
