//! Operations context for dependency injection

use std::path::Path;

use driftwatch_config::Config;
use driftwatch_errors::Error;
use driftwatch_events::EventSender;
use driftwatch_fetch::PackageFetcher;
use driftwatch_snapshot::{discover_libraries, SnapshotBuilder, SnapshotStore};

/// Operations context providing access to all system components
#[derive(Debug)]
pub struct OpsCtx {
    /// Snapshot builder for directory scans
    pub builder: SnapshotBuilder,
    /// Freeze file store
    pub store: SnapshotStore,
    /// Trusted copy fetcher
    pub fetcher: PackageFetcher,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

// No public constructor - use OpsCtxBuilder instead

impl OpsCtx {
    /// Libraries a trusted-side scan should cover: the configured list, or
    /// every library present under the trusted directory when none is
    /// configured.
    pub(crate) async fn requested_libraries(
        &self,
        trusted_dir: &Path,
    ) -> Result<Vec<String>, Error> {
        if self.config.scan.libraries.is_empty() {
            discover_libraries(trusted_dir).await
        } else {
            Ok(self.config.scan.libraries.clone())
        }
    }
}

/// Builder for operations context
#[derive(Default)]
pub struct OpsCtxBuilder {
    builder: Option<SnapshotBuilder>,
    store: Option<SnapshotStore>,
    fetcher: Option<PackageFetcher>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsCtxBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set snapshot builder
    #[must_use]
    pub fn with_builder(mut self, builder: SnapshotBuilder) -> Self {
        self.builder = Some(builder);
        self
    }

    /// Set freeze file store
    #[must_use]
    pub fn with_store(mut self, store: SnapshotStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Set trusted copy fetcher
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: PackageFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let builder = self
            .builder
            .ok_or_else(|| driftwatch_errors::OpsError::MissingComponent {
                component: "builder".to_string(),
            })?;

        let store = self
            .store
            .ok_or_else(|| driftwatch_errors::OpsError::MissingComponent {
                component: "store".to_string(),
            })?;

        let fetcher = self
            .fetcher
            .ok_or_else(|| driftwatch_errors::OpsError::MissingComponent {
                component: "fetcher".to_string(),
            })?;

        let tx = self
            .tx
            .ok_or_else(|| driftwatch_errors::OpsError::MissingComponent {
                component: "event_sender".to_string(),
            })?;

        let config = self
            .config
            .ok_or_else(|| driftwatch_errors::OpsError::MissingComponent {
                component: "config".to_string(),
            })?;

        Ok(OpsCtx {
            builder,
            store,
            fetcher,
            tx,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_errors::OpsError;

    #[test]
    fn test_missing_component_is_reported_by_name() {
        let (tx, _rx) = driftwatch_events::channel();

        let err = OpsCtxBuilder::new()
            .with_builder(SnapshotBuilder::new())
            .with_store(SnapshotStore::new("freeze.json"))
            .with_fetcher(PackageFetcher::new("pip"))
            .with_event_sender(tx)
            // config deliberately absent
            .build()
            .unwrap_err();

        match err {
            Error::Ops(OpsError::MissingComponent { component }) => {
                assert_eq!(component, "config");
            }
            other => panic!("expected MissingComponent, got: {other:?}"),
        }
    }

    #[test]
    fn test_full_builder_succeeds() {
        let (tx, _rx) = driftwatch_events::channel();

        let ctx = OpsCtxBuilder::new()
            .with_builder(SnapshotBuilder::new())
            .with_store(SnapshotStore::new("freeze.json"))
            .with_fetcher(PackageFetcher::new("pip"))
            .with_event_sender(tx)
            .with_config(Config::default())
            .build()
            .unwrap();

        assert_eq!(ctx.fetcher.tool(), "pip");
    }
}
