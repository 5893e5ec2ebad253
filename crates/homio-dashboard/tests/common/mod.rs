//! Test harness for integration setup
//!
//! Provides an isolated runtime over a scratch configuration directory,
//! wired the same way the server wires the real integration.

use homio_dashboard::{BundledAssets, HomioDashboard, SetupError, DOMAIN};
use homio_runtime::{ConfigEntry, Homio};
use std::path::Path;
use tempfile::TempDir;

/// An isolated runtime plus a config entry for the integration
pub struct TestHomio {
    /// Runtime handle shared with the integration
    pub homio: Homio,
    /// The integration's config entry
    pub entry: ConfigEntry,
    /// The integration instance under test
    pub integration: HomioDashboard,
    config_dir: TempDir,
}

impl TestHomio {
    /// Runtime over the crate's bundled assets
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("create config dir");
        let homio = Homio::new(config_dir.path());
        Self {
            homio,
            entry: ConfigEntry::new(DOMAIN, "Homio Dashboard"),
            integration: HomioDashboard::new(),
            config_dir,
        }
    }

    /// Runtime over an alternate asset tree
    #[allow(dead_code)]
    pub fn with_assets(assets: BundledAssets) -> Self {
        let mut harness = Self::new();
        harness.integration = HomioDashboard::with_assets(assets);
        harness
    }

    /// Run integration setup against this runtime
    pub async fn setup(&mut self) -> Result<(), SetupError> {
        self.integration.setup(&self.homio, &mut self.entry).await
    }

    /// Unload the integration from this runtime
    #[allow(dead_code)]
    pub async fn unload(&mut self) -> Result<(), SetupError> {
        self.integration.unload(&self.homio, &mut self.entry).await
    }

    /// The scratch configuration directory
    pub fn config_dir(&self) -> &Path {
        self.config_dir.path()
    }

    /// Assert an entity is in the given state
    #[allow(dead_code)]
    pub fn assert_state(&self, entity_id: &str, expected: &str) {
        let state = self.homio.states.get_state(entity_id);
        assert_eq!(
            state.as_deref(),
            Some(expected),
            "expected {} to be '{}', was {:?}",
            entity_id,
            expected,
            state
        );
    }
}
