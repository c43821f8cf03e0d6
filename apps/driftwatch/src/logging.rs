//! Structured logging integration for events
//!
//! Bridges domain events into the tracing ecosystem so that `--debug` runs
//! and `RUST_LOG` filters see the same stream the console handler does.

use driftwatch_events::AppEvent;
use tracing::Level;

/// Log an event at the level the event itself declares.
pub fn log_event_with_tracing(event: &AppEvent) {
    let domain = event.log_target();
    let fields = event.log_fields();

    match event.log_level() {
        Level::ERROR => tracing::error!(domain, "{fields}"),
        Level::WARN => tracing::warn!(domain, "{fields}"),
        Level::INFO => tracing::info!(domain, "{fields}"),
        Level::DEBUG => tracing::debug!(domain, "{fields}"),
        Level::TRACE => tracing::trace!(domain, "{fields}"),
    }
}
