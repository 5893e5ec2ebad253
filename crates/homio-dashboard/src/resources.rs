//! Static asset and card script registration
//!
//! The bundled `www` directory is served under `/homio_dashboard` without
//! cache headers, and each card script is announced to the frontend with
//! the crate version as a cache-busting query parameter.

use crate::{BundledAssets, DOMAIN, VERSION};
use homio_frontend::StaticPathConfig;
use homio_runtime::Homio;
use tracing::{info, warn};

/// The card scripts the dashboard views load
const JS_FILES: [&str; 3] = [
    "button-card/button-card.js",
    "community/layout-card-modified/layout-card-modified.js",
    "community/light-slider/my-slider-v2.js",
];

/// Register the static prefix and the card scripts
///
/// A script missing from the bundled tree is skipped with a warning so the
/// remaining cards still load.
pub fn register(homio: &Homio, assets: &BundledAssets) {
    let www_dir = assets.www_dir();

    homio.statics.register(StaticPathConfig::new(
        format!("/{}", DOMAIN),
        &www_dir,
        false,
    ));
    info!(url_path = %format!("/{}", DOMAIN), "Registered Homio static path");

    for rel in JS_FILES {
        let file = www_dir.join(rel);
        if file.is_file() {
            homio
                .resources
                .add_extra_js_url(format!("/{}/{}?v={}", DOMAIN, rel, VERSION), false);
        } else {
            warn!(path = %file.display(), "Card script not found, skipping");
        }
    }
}
