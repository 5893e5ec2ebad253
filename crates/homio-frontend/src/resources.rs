//! Extra JavaScript resources loaded by the frontend

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::{debug, info};

/// A JavaScript resource the frontend loads on every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraJsUrl {
    /// Resource URL, usually with a cache-busting `?v=` query parameter
    pub url: String,
    /// Whether the resource is an ES5 build rather than a module
    pub es5: bool,
}

/// Ordered collection of extra JS resources
///
/// URLs are deduplicated; insertion order is preserved so resources load in
/// registration order.
pub struct FrontendResources {
    urls: RwLock<IndexMap<String, ExtraJsUrl>>,
}

impl FrontendResources {
    /// Create an empty resource list
    pub fn new() -> Self {
        Self {
            urls: RwLock::new(IndexMap::new()),
        }
    }

    /// Add a resource URL
    ///
    /// Returns false when the URL is already registered.
    pub fn add_extra_js_url(&self, url: impl Into<String>, es5: bool) -> bool {
        let url = url.into();
        if let Ok(mut urls) = self.urls.write() {
            if urls.contains_key(&url) {
                debug!(url = %url, "Extra JS url already registered");
                return false;
            }
            info!(url = %url, es5, "Registered extra JS url");
            urls.insert(url.clone(), ExtraJsUrl { url, es5 });
            true
        } else {
            false
        }
    }

    /// All registered resources in insertion order
    pub fn urls(&self) -> Vec<ExtraJsUrl> {
        self.urls
            .read()
            .map(|urls| urls.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.urls.read().map(|urls| urls.len()).unwrap_or(0)
    }

    /// Whether no resources are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FrontendResources {
    fn default() -> Self {
        Self::new()
    }
}
