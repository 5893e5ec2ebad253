//! Dashboard and sidebar panel registration
//!
//! The panel is the one piece of setup that must not fail silently: a
//! dashboard that does not parse would register a sidebar entry pointing
//! at nothing, so load errors propagate to the caller.

use crate::{BundledAssets, SetupError, DOMAIN};
use homio_core::Context;
use homio_frontend::{DashboardMeta, Panel, YamlDashboard};
use homio_runtime::Homio;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Sidebar title
pub const PANEL_TITLE: &str = "Homio";
/// Sidebar icon
pub const PANEL_ICON: &str = "mdi:star-plus-outline";

/// Load the bundled dashboard and register its sidebar panel
///
/// The dashboard is parsed before anything is registered, so a broken
/// YAML file leaves both registries untouched.
pub fn register(homio: &Homio, assets: &BundledAssets) -> Result<(), SetupError> {
    let dashboard = Arc::new(YamlDashboard::new(
        DOMAIN,
        assets.dashboard_file(),
        DashboardMeta {
            title: PANEL_TITLE.to_string(),
            icon: Some(PANEL_ICON.to_string()),
            show_in_sidebar: true,
            require_admin: false,
        },
    ));

    let config = dashboard.load(false)?;
    info!(
        views = config.views.len(),
        file = %dashboard.file().display(),
        "Loaded Homio dashboard"
    );

    homio.dashboards.insert(dashboard);
    homio.panels.register(
        Panel {
            component_name: "lovelace".to_string(),
            url_path: DOMAIN.to_string(),
            title: Some(PANEL_TITLE.to_string()),
            icon: Some(PANEL_ICON.to_string()),
            show_in_sidebar: true,
            require_admin: false,
            config: Some(json!({ "mode": "yaml" })),
        },
        Context::new(),
    )?;

    Ok(())
}

/// Remove the panel and the dashboard registration
///
/// Both removals are no-ops when nothing is registered, so unload after a
/// failed setup is safe.
pub fn remove(homio: &Homio) {
    homio.panels.remove(DOMAIN, Context::new());
    if homio.dashboards.remove(DOMAIN).is_some() {
        info!("Removed Homio dashboard");
    }
}
