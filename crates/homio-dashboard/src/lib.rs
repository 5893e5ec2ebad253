//! The Homio Dashboard integration
//!
//! Installs a prebuilt dashboard into a running host: copies the Homio
//! theme and YAML packages into the configuration directory, creates the
//! helper entities the dashboard binds to, registers the bundled card
//! scripts as static assets and frontend resources, and registers a
//! sidebar panel backed by a YAML dashboard.
//!
//! Setup is tolerant of partial failure. File copies, entity creation,
//! and resource registration log their errors and keep going; only a
//! dashboard that fails to load aborts setup, since the sidebar panel
//! would otherwise point at nothing.

mod assets;
mod entities;
mod install;
mod panel;
mod resources;

pub use assets::BundledAssets;
pub use entities::{refresh_clock, DATE_SENSOR, TIME_SENSOR};
pub use panel::{PANEL_ICON, PANEL_TITLE};

use chrono::Local;
use homio_frontend::{DashboardError, PanelError};
use homio_runtime::{
    track_time_interval, ConfigEntry, EntryState, Homio, IntervalHandle, InvalidTransition,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Integration domain
pub const DOMAIN: &str = "homio_dashboard";

/// Integration version, used to cache-bust card script URLs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How often the clock sensors are refreshed
const CLOCK_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Errors that abort setup
#[derive(Debug, Error)]
pub enum SetupError {
    /// The bundled dashboard failed to load
    #[error("failed to load the Homio dashboard: {0}")]
    Dashboard(#[from] DashboardError),

    /// The sidebar panel could not be registered
    #[error("failed to register the Homio panel: {0}")]
    Panel(#[from] PanelError),

    /// The config entry rejected a state transition
    #[error(transparent)]
    EntryState(#[from] InvalidTransition),
}

/// The Homio Dashboard integration instance
///
/// Owns the clock refresher while loaded. Everything else lives in the
/// runtime's registries under [`DOMAIN`].
pub struct HomioDashboard {
    assets: BundledAssets,
    refresher: Option<IntervalHandle>,
}

impl HomioDashboard {
    /// Create an instance over the bundled assets
    pub fn new() -> Self {
        Self::with_assets(BundledAssets::bundled())
    }

    /// Create an instance over an alternate asset tree
    pub fn with_assets(assets: BundledAssets) -> Self {
        Self {
            assets,
            refresher: None,
        }
    }

    /// Set up the integration
    ///
    /// Drives the entry through `SetupInProgress` to `Loaded`, or to
    /// `SetupError` when the dashboard cannot be loaded. Install and
    /// entity failures are logged and do not abort setup.
    pub async fn setup(
        &mut self,
        homio: &Homio,
        entry: &mut ConfigEntry,
    ) -> Result<(), SetupError> {
        entry.try_set_state(EntryState::SetupInProgress, None)?;
        info!(domain = DOMAIN, version = VERSION, "Setting up Homio Dashboard");

        install::install_theme(&self.assets, &homio.paths).await;
        install::install_packages(&self.assets, &homio.paths).await;
        entities::create_entities(&homio.states);
        resources::register(homio, &self.assets);

        if let Err(e) = panel::register(homio, &self.assets) {
            error!(error = %e, "Homio Dashboard setup failed");
            entry.try_set_state(EntryState::SetupError, Some(e.to_string()))?;
            return Err(e);
        }

        let states = homio.states.clone();
        self.refresher = Some(track_time_interval(CLOCK_REFRESH_INTERVAL, move || {
            let states = states.clone();
            async move {
                entities::refresh_clock(&states, Local::now());
            }
        }));

        entry.try_set_state(EntryState::Loaded, None)?;
        info!(domain = DOMAIN, "Homio Dashboard setup complete");
        Ok(())
    }

    /// Unload the integration
    ///
    /// Removes the panel and dashboard registrations and stops the clock
    /// refresher. Installed files and entities stay behind; the next
    /// setup overwrites them.
    pub async fn unload(
        &mut self,
        homio: &Homio,
        entry: &mut ConfigEntry,
    ) -> Result<(), SetupError> {
        entry.try_set_state(EntryState::UnloadInProgress, None)?;
        info!(domain = DOMAIN, "Unloading Homio Dashboard");

        panel::remove(homio);
        self.refresher = None;

        entry.try_set_state(EntryState::NotLoaded, None)?;
        Ok(())
    }

    /// Whether the clock refresher task is running
    pub fn clock_refresher_active(&self) -> bool {
        self.refresher
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Default for HomioDashboard {
    fn default() -> Self {
        Self::new()
    }
}
