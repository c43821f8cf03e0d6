//! Event handling and progress display

use console::style;
use driftwatch_events::{AppEvent, FetchEvent, GeneralEvent, SnapshotEvent, VerifyEvent};

use crate::logging::log_event_with_tracing;

/// Event handler for progress display and user feedback
///
/// Status lines go to stderr so stdout stays clean for the final result,
/// which matters in `--json` mode and when piping diffs.
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
    /// Suppress console chatter entirely (JSON mode)
    quiet: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        log_event_with_tracing(&event);

        if self.quiet {
            return;
        }

        match event {
            AppEvent::Snapshot(snapshot_event) => self.handle_snapshot_event(snapshot_event),
            AppEvent::Verify(verify_event) => self.handle_verify_event(verify_event),
            AppEvent::Fetch(fetch_event) => self.handle_fetch_event(fetch_event),
            AppEvent::General(general_event) => self.handle_general_event(general_event),
        }
    }

    fn handle_snapshot_event(&self, event: SnapshotEvent) {
        match event {
            SnapshotEvent::ScanStarted { root, libraries } => {
                if libraries.is_empty() {
                    self.show_status(&format!("Scanning {root}"));
                } else {
                    self.show_status(&format!(
                        "Scanning {root} ({} tracked libraries)",
                        libraries.len()
                    ));
                }
            }
            SnapshotEvent::LibraryScanned { library, files } => {
                if self.debug_enabled {
                    self.show_status(&format!("  {library}: {files} files"));
                }
            }
            SnapshotEvent::ScanCompleted {
                libraries,
                files,
                duration_ms,
            } => {
                self.show_status(&format!(
                    "Scanned {libraries} libraries, {files} files ({duration_ms}ms)"
                ));
            }
            SnapshotEvent::Saved { path, libraries } => {
                self.show_status(&format!("Froze {libraries} libraries into {path}"));
            }
            SnapshotEvent::Loaded {
                path,
                libraries,
                trusted,
            } => {
                let marker = if trusted { "trusted" } else { "untrusted" };
                self.show_status(&format!(
                    "Loaded {marker} snapshot of {libraries} libraries from {path}"
                ));
            }
        }
    }

    fn handle_verify_event(&self, event: VerifyEvent) {
        match event {
            VerifyEvent::Started { files, .. } => {
                self.show_status(&format!("Verifying {files} files against the baseline"));
            }
            VerifyEvent::Completed {
                discrepancies,
                files_checked,
                duration_ms,
                ..
            } => {
                if discrepancies == 0 {
                    self.show_status(&format!(
                        "Verified {files_checked} files, no drift ({duration_ms}ms)"
                    ));
                } else {
                    self.show_warning(&format!(
                        "Verified {files_checked} files, {discrepancies} discrepancies ({duration_ms}ms)"
                    ));
                }
            }
            VerifyEvent::Failed { failure, .. } => {
                self.show_error(&format!("Verification failed: {}", failure.message));
            }
            VerifyEvent::DriftDetected { notice, .. } => {
                self.show_warning(&format!("[{}] {}", notice.library, notice.message));
            }
            VerifyEvent::RenderSkipped { path, reason } => {
                self.show_warning(&format!("Skipping diff for {path}: {reason}"));
            }
        }
    }

    fn handle_fetch_event(&self, event: FetchEvent) {
        match event {
            FetchEvent::Started {
                tool,
                packages,
                dest,
            } => {
                self.show_status(&format!(
                    "Installing {} packages into {dest} via {tool}",
                    packages.len()
                ));
            }
            FetchEvent::Completed {
                packages,
                duration_ms,
                ..
            } => {
                self.show_status(&format!(
                    "Installed {} packages ({duration_ms}ms)",
                    packages.len()
                ));
            }
            FetchEvent::Failed { tool, failure } => {
                self.show_error(&format!("{tool} failed: {}", failure.message));
            }
        }
    }

    fn handle_general_event(&self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => {
                if let Some(context) = context {
                    self.show_warning(&format!("{message} ({context})"));
                } else {
                    self.show_warning(&message);
                }
            }
            GeneralEvent::Error { message, details } => {
                if let Some(details) = details {
                    self.show_error(&format!("{message}: {details}"));
                } else {
                    self.show_error(&message);
                }
            }
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug_enabled {
                    self.show_status(&message);
                }
            }
            GeneralEvent::OperationStarted { operation } => {
                self.show_status(&format!("Starting {operation}"));
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if success {
                    self.show_status(&format!("Completed {operation}"));
                }
            }
            GeneralEvent::OperationFailed { operation, error } => {
                self.show_error(&format!("{operation} failed: {error}"));
            }
        }
    }

    /// Show status message
    fn show_status(&self, message: &str) {
        eprintln!("{message}");
    }

    /// Show warning message
    fn show_warning(&self, message: &str) {
        if self.colors_enabled {
            eprintln!("{}", style(message).yellow());
        } else {
            eprintln!("{message}");
        }
    }

    /// Show error message
    fn show_error(&self, message: &str) {
        if self.colors_enabled {
            eprintln!("{}", style(message).red().bold());
        } else {
            eprintln!("{message}");
        }
    }
}
