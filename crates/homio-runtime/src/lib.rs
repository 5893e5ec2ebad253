//! Host runtime handle for Homio
//!
//! This crate assembles the host surfaces an integration touches into one
//! `Homio` handle: the event bus, the entity state store, the config
//! directory layout, and the frontend registries. It also provides the
//! config entry lifecycle and the periodic scheduler.

mod entry;
mod scheduler;

pub use entry::{ConfigEntry, EntryState, InvalidTransition};
pub use scheduler::{track_time_interval, IntervalHandle};

use axum::Router;
use homio_config::ConfigPaths;
use homio_event_bus::EventBus;
use homio_frontend::{DashboardStore, FrontendResources, PanelRegistry, StaticPathRegistry};
use homio_state_store::StateStore;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The aggregate runtime handle integrations receive
///
/// All parts are `Arc`-shared, so the handle clones cheaply into tasks.
#[derive(Clone)]
pub struct Homio {
    /// Event bus for pub/sub communication
    pub bus: Arc<EventBus>,
    /// Entity state store
    pub states: Arc<StateStore>,
    /// Config directory layout
    pub paths: ConfigPaths,
    /// Static asset registrations
    pub statics: Arc<StaticPathRegistry>,
    /// Extra frontend JS resources
    pub resources: Arc<FrontendResources>,
    /// Sidebar panels
    pub panels: Arc<PanelRegistry>,
    /// YAML dashboards
    pub dashboards: Arc<DashboardStore>,
}

impl Homio {
    /// Create a runtime handle rooted at the given config directory
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        let config_dir = config_dir.as_ref();
        info!(config_dir = %config_dir.display(), "Initializing runtime");

        let bus = Arc::new(EventBus::new());
        let states = Arc::new(StateStore::new(bus.clone()));
        let panels = Arc::new(PanelRegistry::new(bus.clone()));

        Self {
            bus,
            states,
            paths: ConfigPaths::new(config_dir),
            statics: Arc::new(StaticPathRegistry::new()),
            resources: Arc::new(FrontendResources::new()),
            panels,
            dashboards: Arc::new(DashboardStore::new()),
        }
    }

    /// Build the HTTP router over all registered static paths
    pub fn router(&self) -> Router {
        self.statics.router().layer(TraceLayer::new_for_http())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homio_core::Context;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_parts_share_one_bus() {
        let dir = TempDir::new().unwrap();
        let homio = Homio::new(dir.path());

        let mut rx = homio.bus.subscribe("state_changed");
        homio.states.set(
            "sensor.homio_time".parse().unwrap(),
            "08:15",
            HashMap::new(),
            Context::new(),
        );

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event_type.as_str(), "state_changed");
    }

    #[test]
    fn test_paths_rooted_at_config_dir() {
        let dir = TempDir::new().unwrap();
        let homio = Homio::new(dir.path());
        assert_eq!(homio.paths.themes_dir(), dir.path().join("themes"));
    }

    #[test]
    fn test_handle_clones_share_state() {
        let dir = TempDir::new().unwrap();
        let homio = Homio::new(dir.path());
        let clone = homio.clone();

        homio.resources.add_extra_js_url("/a.js?v=1", false);
        assert_eq!(clone.resources.len(), 1);
    }
}
