//! Integration setup and unload behavior
//!
//! Exercises the full setup path over a scratch configuration directory:
//! installed files, created entities, registered frontend surfaces, and
//! the entry lifecycle around dashboard failures.

mod common;

use chrono::{NaiveDate, NaiveTime};
use common::TestHomio;
use homio_core::STATE_OFF;
use homio_dashboard::{
    BundledAssets, SetupError, DATE_SENSOR, DOMAIN, PANEL_ICON, PANEL_TITLE, TIME_SENSOR, VERSION,
};
use homio_runtime::EntryState;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Collect every file under `root` as relative path -> contents
fn tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).expect("read dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).expect("relative path").to_path_buf();
                out.insert(rel, fs::read(&path).expect("read file"));
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[tokio::test]
async fn test_setup_loads_entry() {
    let mut harness = TestHomio::new();

    harness.setup().await.unwrap();

    assert!(harness.entry.is_loaded());
    assert!(harness.integration.clock_refresher_active());
}

#[tokio::test]
async fn test_theme_install_mirrors_bundled_assets() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    let bundled = BundledAssets::bundled();
    let installed = harness.config_dir().join("themes").join("homio");

    assert_eq!(tree(&bundled.theme_dir()), tree(&installed));
}

#[tokio::test]
async fn test_packages_installed_under_homio_subdir() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    let dest = harness.config_dir().join("packages").join("homio");
    assert!(dest.join("homio_helpers.yaml").is_file());
    assert!(dest.join("homio_sensors.yaml").is_file());
}

#[tokio::test]
async fn test_helper_entities_have_dashboard_defaults() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    for entity_id in [
        "input_boolean.homio_edit_mode",
        "input_boolean.homio_dark_mode",
        "input_boolean.homio_notifications",
    ] {
        let state = harness.homio.states.get(entity_id).unwrap();
        assert_eq!(state.state, STATE_OFF, "{} should default off", entity_id);
        assert_eq!(state.attribute::<bool>("editable"), Some(false));
    }

    let target = harness
        .homio
        .states
        .get("input_number.homio_target_temperature")
        .unwrap();
    assert_eq!(target.state, "20");
    assert_eq!(target.attribute::<f64>("min"), Some(7.0));
    assert_eq!(target.attribute::<f64>("max"), Some(24.0));
    assert_eq!(target.attribute::<f64>("step"), Some(0.5));
    assert_eq!(
        target.attribute::<String>("unit_of_measurement"),
        Some("°C".to_string())
    );
}

#[tokio::test]
async fn test_clock_sensors_hold_valid_values() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    let date = harness.homio.states.get_state(DATE_SENSOR).unwrap();
    let time = harness.homio.states.get_state(TIME_SENSOR).unwrap();

    NaiveDate::parse_from_str(&date, "%Y-%m-%d").expect("date sensor format");
    NaiveTime::parse_from_str(&time, "%H:%M").expect("time sensor format");
}

#[tokio::test]
async fn test_repeated_setup_restores_pristine_state() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    // Tamper with everything a user could touch between setups
    let theme_dir = harness.config_dir().join("themes").join("homio");
    fs::write(theme_dir.join("stale.yaml"), "left behind\n").unwrap();
    fs::write(theme_dir.join("homio.yaml"), "Homio: {}\n").unwrap();
    harness.homio.states.set(
        "input_boolean.homio_edit_mode".parse().unwrap(),
        "on",
        std::collections::HashMap::new(),
        homio_core::Context::new(),
    );

    harness.unload().await.unwrap();
    harness.setup().await.unwrap();

    let bundled = BundledAssets::bundled();
    assert_eq!(tree(&bundled.theme_dir()), tree(&theme_dir));
    harness.assert_state("input_boolean.homio_edit_mode", STATE_OFF);
}

#[tokio::test]
async fn test_registers_static_path_and_card_resources() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    let statics = harness.homio.statics.get("/homio_dashboard").unwrap();
    assert!(!statics.cache_headers);

    let urls = harness.homio.resources.urls();
    assert_eq!(urls.len(), 3);
    for resource in &urls {
        assert!(resource.url.starts_with("/homio_dashboard/"));
        assert!(resource.url.ends_with(&format!("?v={}", VERSION)));
        assert!(!resource.es5);
    }
}

#[tokio::test]
async fn test_serves_card_scripts_over_http() {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    let response = harness
        .homio
        .router()
        .oneshot(
            Request::builder()
                .uri("/homio_dashboard/button-card/button-card.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache"
    );
}

#[tokio::test]
async fn test_panel_registered_with_yaml_config() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    let panel = harness.homio.panels.get(DOMAIN).unwrap();
    assert_eq!(panel.component_name, "lovelace");
    assert_eq!(panel.title.as_deref(), Some(PANEL_TITLE));
    assert_eq!(panel.icon.as_deref(), Some(PANEL_ICON));
    assert!(panel.show_in_sidebar);
    assert_eq!(panel.config, Some(json!({ "mode": "yaml" })));

    let dashboard = harness.homio.dashboards.get(DOMAIN).unwrap();
    let config = dashboard.load(false).unwrap();
    assert_eq!(config.title.as_deref(), Some("Homio"));
    assert_eq!(config.views.len(), 3);
}

#[tokio::test]
async fn test_broken_dashboard_aborts_setup() {
    let scratch = tempfile::TempDir::new().unwrap();
    let assets = BundledAssets::at(scratch.path());
    let file = assets.dashboard_file();
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, "title: Homio\nviews: not-a-list\n").unwrap();

    let mut harness = TestHomio::with_assets(assets);
    let result = harness.setup().await;

    assert!(matches!(result, Err(SetupError::Dashboard(_))));
    assert_eq!(harness.entry.state, EntryState::SetupError);
    assert!(harness.entry.reason.is_some());
    assert!(harness.homio.panels.is_empty());
    assert!(harness.homio.dashboards.is_empty());
    assert!(!harness.integration.clock_refresher_active());
}

#[tokio::test]
async fn test_failed_setup_can_retry_after_unload() {
    let scratch = tempfile::TempDir::new().unwrap();
    let assets = BundledAssets::at(scratch.path());
    let file = assets.dashboard_file();
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, "title: Homio\n").unwrap();

    let mut harness = TestHomio::with_assets(assets);
    assert!(harness.setup().await.is_err());

    fs::write(&file, "title: Homio\nviews:\n  - title: Home\n    cards: []\n").unwrap();
    harness.unload().await.unwrap();
    harness.setup().await.unwrap();

    assert!(harness.entry.is_loaded());
    assert!(harness.homio.panels.get(DOMAIN).is_some());
}

#[tokio::test]
async fn test_unload_removes_panel_and_stops_refresher() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();

    harness.unload().await.unwrap();

    assert_eq!(harness.entry.state, EntryState::NotLoaded);
    assert!(harness.homio.panels.is_empty());
    assert!(harness.homio.dashboards.is_empty());
    assert!(!harness.integration.clock_refresher_active());

    // Installed files survive unload
    assert!(harness
        .config_dir()
        .join("themes")
        .join("homio")
        .join("homio.yaml")
        .is_file());
}

#[tokio::test]
async fn test_unload_then_setup_re_registers() {
    let mut harness = TestHomio::new();
    harness.setup().await.unwrap();
    harness.unload().await.unwrap();

    harness.setup().await.unwrap();

    assert!(harness.entry.is_loaded());
    assert_eq!(harness.homio.panels.len(), 1);
    assert!(harness.integration.clock_refresher_active());
}
