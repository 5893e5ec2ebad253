//! Locations inside the bundled asset tree
//!
//! Everything the integration installs or serves ships in the `assets/`
//! directory next to this crate's manifest: the Homio theme, the YAML
//! package fragments, the card scripts, and the dashboard itself.

use std::path::{Path, PathBuf};

/// The asset tree shipped with the integration
#[derive(Debug, Clone)]
pub struct BundledAssets {
    root: PathBuf,
}

impl BundledAssets {
    /// The assets bundled into this crate
    pub fn bundled() -> Self {
        Self {
            root: Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
        }
    }

    /// Use an alternate asset root
    ///
    /// Tests point this at a scratch directory instead of the bundled tree.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the asset tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The packaged Homio theme directory
    pub fn theme_dir(&self) -> PathBuf {
        self.root.join("themes").join("homio")
    }

    /// YAML package fragments installed into the configuration directory
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("packages")
    }

    /// Card scripts served as static files
    pub fn www_dir(&self) -> PathBuf {
        self.root.join("www")
    }

    /// The dashboard definition
    pub fn dashboard_file(&self) -> PathBuf {
        self.root.join("lovelace").join("homio.yaml")
    }
}

impl Default for BundledAssets {
    fn default() -> Self {
        Self::bundled()
    }
}
