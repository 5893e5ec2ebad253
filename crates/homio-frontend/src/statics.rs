//! Static path registration and serving
//!
//! Integrations register a URL prefix pointing at a directory of static
//! files; the registry turns all registrations into one axum router.

use axum::http::{header, HeaderValue};
use axum::Router;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, info};

/// Cache-Control for registrations that opt into caching
const CACHE_CONTROL_CACHEABLE: &str = "public, max-age=2678400";

/// Cache-Control for registrations that opt out of caching
const CACHE_CONTROL_NO_CACHE: &str = "no-cache";

/// A URL prefix mapped to a directory of static files
#[derive(Debug, Clone)]
pub struct StaticPathConfig {
    /// URL prefix, must begin with `/`
    pub url_path: String,
    /// Directory served under the prefix
    pub fs_path: PathBuf,
    /// Whether responses carry long-lived cache headers
    pub cache_headers: bool,
}

impl StaticPathConfig {
    /// Create a static path registration
    pub fn new(
        url_path: impl Into<String>,
        fs_path: impl Into<PathBuf>,
        cache_headers: bool,
    ) -> Self {
        Self {
            url_path: url_path.into(),
            fs_path: fs_path.into(),
            cache_headers,
        }
    }
}

/// Registry of static path registrations
///
/// Thread-safe; a URL prefix can only be registered once.
pub struct StaticPathRegistry {
    paths: DashMap<String, StaticPathConfig>,
}

impl StaticPathRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            paths: DashMap::new(),
        }
    }

    /// Register a static path
    ///
    /// Returns false when the URL prefix is already taken; the existing
    /// registration wins.
    pub fn register(&self, config: StaticPathConfig) -> bool {
        match self.paths.entry(config.url_path.clone()) {
            Entry::Occupied(_) => {
                debug!(url_path = %config.url_path, "Static path already registered");
                false
            }
            Entry::Vacant(entry) => {
                info!(
                    url_path = %config.url_path,
                    fs_path = %config.fs_path.display(),
                    "Registered static path"
                );
                entry.insert(config);
                true
            }
        }
    }

    /// Get a registration by URL prefix
    pub fn get(&self, url_path: &str) -> Option<StaticPathConfig> {
        self.paths.get(url_path).map(|r| r.value().clone())
    }

    /// Number of registered prefixes
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no prefixes are registered
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Build a router serving every registration
    ///
    /// Each prefix nests a `ServeDir` for its directory. Registrations with
    /// `cache_headers: false` answer with `Cache-Control: no-cache`, the
    /// rest with a long-lived public max-age.
    pub fn router(&self) -> Router {
        let mut router = Router::new();

        for entry in self.paths.iter() {
            let config = entry.value();
            let cache_control = if config.cache_headers {
                CACHE_CONTROL_CACHEABLE
            } else {
                CACHE_CONTROL_NO_CACHE
            };

            let service = ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static(cache_control),
                ))
                .service(ServeDir::new(&config.fs_path));

            router = router.nest_service(&config.url_path, service);
        }

        router
    }
}

impl Default for StaticPathRegistry {
    fn default() -> Self {
        Self::new()
    }
}
