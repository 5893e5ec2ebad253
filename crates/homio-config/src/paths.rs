//! Well-known locations inside the configuration directory

use std::path::{Path, PathBuf};

/// The configuration directory and its well-known subdirectories
///
/// Integrations that install files resolve their destinations through this
/// type instead of joining paths by hand, so the layout lives in one place.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    config_dir: PathBuf,
}

impl ConfigPaths {
    /// Create paths rooted at the given configuration directory
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// The configuration directory itself
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Directory holding installed themes
    pub fn themes_dir(&self) -> PathBuf {
        self.config_dir.join("themes")
    }

    /// Directory holding installed YAML packages
    pub fn packages_dir(&self) -> PathBuf {
        self.config_dir.join("packages")
    }

    /// Resolve a relative path under the configuration directory
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.config_dir.join(rel)
    }
}
