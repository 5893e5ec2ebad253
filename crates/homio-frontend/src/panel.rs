//! Sidebar panel registry
//!
//! Panels are sidebar entries rendered by a frontend component. The registry
//! fires PANELS_UPDATED on the event bus whenever the set changes so the
//! frontend can refresh its sidebar.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use homio_core::events::PanelsUpdatedData;
use homio_core::Context;
use homio_event_bus::EventBus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from panel registration
#[derive(Debug, Error)]
pub enum PanelError {
    /// A panel is already registered under the url path
    #[error("panel already registered for url path '{url_path}'")]
    Duplicate { url_path: String },
}

/// A sidebar panel entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    /// Frontend component that renders the panel, e.g. "lovelace"
    pub component_name: String,

    /// Sidebar url path, unique per panel
    pub url_path: String,

    /// Sidebar title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sidebar icon (mdi name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Whether the panel appears in the sidebar
    pub show_in_sidebar: bool,

    /// Whether only admins may open the panel
    pub require_admin: bool,

    /// Component-specific configuration handed to the frontend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// Registry of sidebar panels keyed by url path
pub struct PanelRegistry {
    panels: DashMap<String, Panel>,
    event_bus: Arc<EventBus>,
}

impl PanelRegistry {
    /// Create an empty registry
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            panels: DashMap::new(),
            event_bus,
        }
    }

    /// Register a panel
    ///
    /// A second registration on the same url path is an error; unload the
    /// existing panel first. Fires PANELS_UPDATED on success.
    pub fn register(&self, panel: Panel, context: Context) -> Result<(), PanelError> {
        match self.panels.entry(panel.url_path.clone()) {
            Entry::Occupied(_) => Err(PanelError::Duplicate {
                url_path: panel.url_path,
            }),
            Entry::Vacant(entry) => {
                let url_path = panel.url_path.clone();
                info!(url_path = %url_path, component = %panel.component_name, "Registered panel");
                entry.insert(panel);

                self.event_bus.fire_typed(
                    PanelsUpdatedData {
                        url_path,
                        removed: false,
                    },
                    context,
                );
                Ok(())
            }
        }
    }

    /// Remove a panel
    ///
    /// Removing an unknown url path is a no-op. Fires PANELS_UPDATED when a
    /// panel was actually removed.
    pub fn remove(&self, url_path: &str, context: Context) -> Option<Panel> {
        if let Some((_, panel)) = self.panels.remove(url_path) {
            info!(url_path, "Removed panel");
            self.event_bus.fire_typed(
                PanelsUpdatedData {
                    url_path: url_path.to_string(),
                    removed: true,
                },
                context,
            );
            Some(panel)
        } else {
            debug!(url_path, "Attempted to remove unknown panel");
            None
        }
    }

    /// Get a panel by url path
    pub fn get(&self, url_path: &str) -> Option<Panel> {
        self.panels.get(url_path).map(|r| r.value().clone())
    }

    /// All registered panels
    pub fn all(&self) -> Vec<Panel> {
        self.panels.iter().map(|r| r.value().clone()).collect()
    }

    /// Number of registered panels
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether no panels are registered
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
