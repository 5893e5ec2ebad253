//! YAML-mode dashboards
//!
//! A YAML dashboard is a file on disk owned by whoever shipped it; the host
//! only parses and caches it. The parsed config is cached against the file
//! modification time so repeated loads don't reparse an unchanged file.

use homio_config::{ConfigError, YamlLoader};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use thiserror::Error;

use dashmap::DashMap;
use tracing::{debug, instrument};

/// Errors from dashboard loading
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Underlying file read or YAML parse failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The dashboard file does not hold a YAML mapping
    #[error("dashboard {path} is not a YAML mapping")]
    NotAMapping { path: PathBuf },

    /// `views` is missing or not a sequence
    #[error("dashboard {path} has no views list")]
    InvalidViews { path: PathBuf },
}

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// A dashboard as parsed from YAML
///
/// Keys this type doesn't model are preserved in `extra`, in file order, so
/// a hand-written dashboard survives a parse/serialize round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Dashboard title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The dashboard views
    pub views: Vec<ViewConfig>,

    /// Unknown top-level keys, preserved in order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// A single dashboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// View title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// View url path segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Tab icon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Theme applied to the view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// The cards on the view, passed through to the frontend
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<serde_yaml::Value>,

    /// Unknown view keys, preserved in order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Sidebar metadata for a dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMeta {
    /// Sidebar title
    pub title: String,
    /// Sidebar icon (mdi name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether the dashboard appears in the sidebar
    pub show_in_sidebar: bool,
    /// Whether only admins may open the dashboard
    pub require_admin: bool,
}

/// Parsed config cached against the file modification time
struct CachedConfig {
    config: Arc<DashboardConfig>,
    mtime: SystemTime,
}

/// A dashboard backed by a YAML file
pub struct YamlDashboard {
    url_path: String,
    file: PathBuf,
    meta: DashboardMeta,
    cache: RwLock<Option<CachedConfig>>,
}

impl YamlDashboard {
    /// Create a dashboard for the given YAML file
    pub fn new(url_path: impl Into<String>, file: impl Into<PathBuf>, meta: DashboardMeta) -> Self {
        Self {
            url_path: url_path.into(),
            file: file.into(),
            meta,
            cache: RwLock::new(None),
        }
    }

    /// The dashboard's url path
    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    /// The backing YAML file
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Sidebar metadata
    pub fn meta(&self) -> &DashboardMeta {
        &self.meta
    }

    /// Load the dashboard config
    ///
    /// The parsed config is cached; while the file's modification time is
    /// unchanged the cached config is returned. `force` skips the cache.
    #[instrument(skip(self), fields(url_path = %self.url_path))]
    pub fn load(&self, force: bool) -> DashboardResult<Arc<DashboardConfig>> {
        let mtime = std::fs::metadata(&self.file)
            .and_then(|m| m.modified())
            .map_err(|e| ConfigError::ReadFile {
                path: self.file.clone(),
                source: e,
            })?;

        if !force {
            if let Ok(cache) = self.cache.read() {
                if let Some(cached) = cache.as_ref() {
                    if cached.mtime == mtime {
                        debug!("Using cached dashboard config");
                        return Ok(cached.config.clone());
                    }
                }
            }
        }

        debug!(file = %self.file.display(), "Loading dashboard config");
        let base_dir = self.file.parent().unwrap_or(Path::new("."));
        let mut loader = YamlLoader::new(base_dir);
        let value = loader.load_file(&self.file)?;

        let config = Arc::new(parse_config(value, &self.file)?);

        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(CachedConfig {
                config: config.clone(),
                mtime,
            });
        }

        Ok(config)
    }
}

/// Validate the loaded value's shape and deserialize it
fn parse_config(value: serde_yaml::Value, path: &Path) -> DashboardResult<DashboardConfig> {
    {
        let map = value.as_mapping().ok_or_else(|| DashboardError::NotAMapping {
            path: path.to_path_buf(),
        })?;

        let views = map.get(&serde_yaml::Value::String("views".to_string()));
        if !matches!(views, Some(serde_yaml::Value::Sequence(_))) {
            return Err(DashboardError::InvalidViews {
                path: path.to_path_buf(),
            });
        }
    }

    serde_yaml::from_value(value).map_err(|e| {
        DashboardError::Config(ConfigError::ParseYaml {
            path: path.to_path_buf(),
            source: e,
        })
    })
}

/// Registered dashboards keyed by url path
///
/// This is where an integration parks its dashboard so the host (and a
/// later unload) can find it.
pub struct DashboardStore {
    dashboards: DashMap<String, Arc<YamlDashboard>>,
}

impl DashboardStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            dashboards: DashMap::new(),
        }
    }

    /// Insert a dashboard, returning any dashboard it replaced
    pub fn insert(&self, dashboard: Arc<YamlDashboard>) -> Option<Arc<YamlDashboard>> {
        self.dashboards
            .insert(dashboard.url_path().to_string(), dashboard)
    }

    /// Get a dashboard by url path
    pub fn get(&self, url_path: &str) -> Option<Arc<YamlDashboard>> {
        self.dashboards.get(url_path).map(|r| r.value().clone())
    }

    /// Remove a dashboard; removing an unknown path is a no-op
    pub fn remove(&self, url_path: &str) -> Option<Arc<YamlDashboard>> {
        self.dashboards.remove(url_path).map(|(_, d)| d)
    }

    /// Number of registered dashboards
    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    /// Whether no dashboards are registered
    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}
