//! Human-readable drift rendering

use std::io::Write;
use std::path::Path;

use tokio::fs;

use driftwatch_errors::Error;
use driftwatch_events::{AppEvent, EventEmitter, EventSender, VerifyEvent};

use crate::compare::{Discrepancy, DriftReport};
use crate::diff::TextDiff;

/// Renders a drift report as notices and unified diffs
///
/// Rendering is best-effort per file: a discrepancy whose contents cannot be
/// read as UTF-8 text produces a notice and the run continues with the next
/// one. Only sink write failures abort.
#[derive(Clone, Debug, Default)]
pub struct DiffRenderer {
    event_sender: Option<EventSender>,
}

impl EventEmitter for DiffRenderer {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl DiffRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an event sender for render notices
    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Render every discrepancy of `report` into `out`
    ///
    /// Modified files are re-read from `trusted_root` and `checked_root` to
    /// produce their diffs; removed files are reported without touching the
    /// filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error only when writing to the sink fails; unreadable
    /// files are reported inline and skipped.
    pub async fn render_to<W: Write>(
        &self,
        report: &DriftReport,
        trusted_root: &Path,
        checked_root: &Path,
        out: &mut W,
    ) -> Result<(), Error> {
        for discrepancy in &report.discrepancies {
            match discrepancy {
                Discrepancy::Removed { trusted, .. } => {
                    writeln!(out, "{} was removed", trusted.relative_name)?;
                }
                Discrepancy::Modified {
                    checked, trusted, ..
                } => {
                    self.render_modified(trusted_root, checked_root, trusted, checked, out)
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Render into a fresh string
    ///
    /// # Errors
    ///
    /// Returns an error when formatting fails; see [`DiffRenderer::render_to`].
    pub async fn render(
        &self,
        report: &DriftReport,
        trusted_root: &Path,
        checked_root: &Path,
    ) -> Result<String, Error> {
        let mut buf = Vec::new();
        self.render_to(report, trusted_root, checked_root, &mut buf)
            .await?;
        String::from_utf8(buf)
            .map_err(|e| Error::internal(format!("rendered diff is not UTF-8: {e}")))
    }

    async fn render_modified<W: Write>(
        &self,
        trusted_root: &Path,
        checked_root: &Path,
        trusted: &driftwatch_snapshot::FileRecord,
        checked: &driftwatch_snapshot::FileRecord,
        out: &mut W,
    ) -> Result<(), Error> {
        let trusted_path = trusted_root.join(&trusted.relative_name);
        let checked_path = checked_root.join(&checked.relative_name);

        let trusted_text = match self.read_text(&trusted_path).await {
            Some(text) => text,
            None => {
                writeln!(out, "{} cannot be read", checked.relative_name)?;
                return Ok(());
            }
        };
        let checked_text = match self.read_text(&checked_path).await {
            Some(text) => text,
            None => {
                writeln!(out, "{} cannot be read", checked.relative_name)?;
                return Ok(());
            }
        };

        // Old side is the trusted content, new side is what is on disk now
        let diff = TextDiff::compute(&trusted_text, &checked_text);
        writeln!(out, "--- {}", trusted_path.display())?;
        writeln!(out, "+++ {}", checked_path.display())?;
        write!(out, "{}", diff.format_unified())?;

        Ok(())
    }

    /// Read a file as UTF-8 text, converting any failure into a skip event
    async fn read_text(&self, path: &Path) -> Option<String> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.emit_skip(path, &e.to_string());
                return None;
            }
        };
        match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(_) => {
                self.emit_skip(path, "not valid UTF-8");
                None
            }
        }
    }

    fn emit_skip(&self, path: &Path, reason: &str) {
        self.emit(AppEvent::Verify(VerifyEvent::RenderSkipped {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }));
    }
}
