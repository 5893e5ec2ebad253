//! Frontend extension points for Homio
//!
//! This crate holds the surfaces an integration touches to show up in the
//! frontend: static asset paths, extra JS resources, sidebar panels, and
//! YAML-mode dashboards.

mod dashboard;
mod panel;
mod resources;
mod statics;

pub use dashboard::{
    DashboardConfig, DashboardError, DashboardMeta, DashboardResult, DashboardStore, ViewConfig,
    YamlDashboard,
};
pub use panel::{Panel, PanelError, PanelRegistry};
pub use resources::{ExtraJsUrl, FrontendResources};
pub use statics::{StaticPathConfig, StaticPathRegistry};
