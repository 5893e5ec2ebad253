//! Theme and package installation
//!
//! Both installers replace the destination wholesale, so re-running setup
//! restores a pristine copy of whatever this crate ships. The copies run
//! on the blocking thread pool and never abort setup: a failed install
//! leaves the dashboard degraded but reachable.

use crate::BundledAssets;
use homio_config::ConfigPaths;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

enum CopyOutcome {
    /// Number of files that landed in the destination
    Installed(usize),
    SourceMissing,
}

/// Install the Homio theme into `<config>/themes/homio`
///
/// Creates the themes directory if needed and removes any existing
/// `homio` subdirectory first. A missing bundled theme logs a warning,
/// a copy failure logs an error.
pub async fn install_theme(assets: &BundledAssets, paths: &ConfigPaths) {
    let source = assets.theme_dir();
    let themes_dir = paths.themes_dir();
    let dest = themes_dir.join("homio");

    let task = {
        let source = source.clone();
        let dest = dest.clone();
        tokio::task::spawn_blocking(move || -> io::Result<CopyOutcome> {
            if !source.is_dir() {
                return Ok(CopyOutcome::SourceMissing);
            }
            fs::create_dir_all(&themes_dir)?;
            if dest.exists() {
                fs::remove_dir_all(&dest)?;
            }
            let files = copy_dir_recursive(&source, &dest)?;
            Ok(CopyOutcome::Installed(files))
        })
    };

    match task.await {
        Ok(Ok(CopyOutcome::Installed(files))) => {
            info!(files, dest = %dest.display(), "Installed Homio theme");
        }
        Ok(Ok(CopyOutcome::SourceMissing)) => {
            warn!(source = %source.display(), "Bundled theme not found, skipping");
        }
        Ok(Err(e)) => {
            error!(error = %e, "Failed to install Homio theme");
        }
        Err(e) => {
            error!(error = %e, "Theme install task panicked");
        }
    }
}

/// Install the bundled YAML packages into `<config>/packages/homio`
///
/// Only `.yaml` files are copied. Same overwrite and error policy as the
/// theme install.
pub async fn install_packages(assets: &BundledAssets, paths: &ConfigPaths) {
    let source = assets.packages_dir();
    let dest = paths.packages_dir().join("homio");

    let task = {
        let source = source.clone();
        let dest = dest.clone();
        tokio::task::spawn_blocking(move || -> io::Result<CopyOutcome> {
            if !source.is_dir() {
                return Ok(CopyOutcome::SourceMissing);
            }
            if dest.exists() {
                fs::remove_dir_all(&dest)?;
            }
            let files = copy_yaml_files(&source, &dest)?;
            Ok(CopyOutcome::Installed(files))
        })
    };

    match task.await {
        Ok(Ok(CopyOutcome::Installed(files))) => {
            info!(files, dest = %dest.display(), "Installed Homio packages");
        }
        Ok(Ok(CopyOutcome::SourceMissing)) => {
            warn!(source = %source.display(), "Bundled packages not found, skipping");
        }
        Ok(Err(e)) => {
            error!(error = %e, "Failed to install Homio packages");
        }
        Err(e) => {
            error!(error = %e, "Package install task panicked");
        }
    }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<usize> {
    fs::create_dir_all(dst)?;
    let mut files = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dst.join(entry.file_name());
        if path.is_dir() {
            files += copy_dir_recursive(&path, &dest_path)?;
        } else if path.is_file() {
            fs::copy(&path, &dest_path)?;
            files += 1;
        }
    }
    Ok(files)
}

fn copy_yaml_files(src: &Path, dst: &Path) -> io::Result<usize> {
    fs::create_dir_all(dst)?;
    let mut files = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let is_yaml = path.extension().map(|ext| ext == "yaml").unwrap_or(false);
        if path.is_file() && is_yaml {
            fs::copy(&path, dst.join(entry.file_name()))?;
            files += 1;
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch_assets(dir: &Path) -> BundledAssets {
        let assets = BundledAssets::at(dir);
        fs::create_dir_all(assets.theme_dir().join("cards")).unwrap();
        fs::write(assets.theme_dir().join("homio.yaml"), "Homio:\n  x: 1\n").unwrap();
        fs::write(assets.theme_dir().join("cards").join("extra.yaml"), "y: 2\n").unwrap();
        fs::create_dir_all(assets.packages_dir()).unwrap();
        fs::write(assets.packages_dir().join("helpers.yaml"), "input_boolean:\n").unwrap();
        fs::write(assets.packages_dir().join("README.md"), "not yaml\n").unwrap();
        assets
    }

    #[tokio::test]
    async fn test_theme_install_mirrors_source() {
        let assets_dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        let assets = scratch_assets(assets_dir.path());
        let paths = ConfigPaths::new(config_dir.path());

        install_theme(&assets, &paths).await;

        let dest = paths.themes_dir().join("homio");
        assert!(dest.join("homio.yaml").is_file());
        assert!(dest.join("cards").join("extra.yaml").is_file());
        assert_eq!(
            fs::read_to_string(dest.join("homio.yaml")).unwrap(),
            "Homio:\n  x: 1\n"
        );
    }

    #[tokio::test]
    async fn test_theme_reinstall_removes_stale_files() {
        let assets_dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        let assets = scratch_assets(assets_dir.path());
        let paths = ConfigPaths::new(config_dir.path());

        install_theme(&assets, &paths).await;

        let dest = paths.themes_dir().join("homio");
        fs::write(dest.join("stale.yaml"), "left over\n").unwrap();
        fs::write(dest.join("homio.yaml"), "Homio:\n  x: tampered\n").unwrap();

        install_theme(&assets, &paths).await;

        assert!(!dest.join("stale.yaml").exists());
        assert_eq!(
            fs::read_to_string(dest.join("homio.yaml")).unwrap(),
            "Homio:\n  x: 1\n"
        );
    }

    #[tokio::test]
    async fn test_theme_missing_source_is_not_fatal() {
        let assets_dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        let assets = BundledAssets::at(assets_dir.path());
        let paths = ConfigPaths::new(config_dir.path());

        install_theme(&assets, &paths).await;

        assert!(!paths.themes_dir().join("homio").exists());
    }

    #[tokio::test]
    async fn test_packages_install_copies_only_yaml() {
        let assets_dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        let assets = scratch_assets(assets_dir.path());
        let paths = ConfigPaths::new(config_dir.path());

        install_packages(&assets, &paths).await;

        let dest = paths.packages_dir().join("homio");
        assert!(dest.join("helpers.yaml").is_file());
        assert!(!dest.join("README.md").exists());
    }

    #[tokio::test]
    async fn test_packages_reinstall_overwrites() {
        let assets_dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        let assets = scratch_assets(assets_dir.path());
        let paths = ConfigPaths::new(config_dir.path());

        install_packages(&assets, &paths).await;
        let dest = paths.packages_dir().join("homio");
        fs::write(dest.join("extra.yaml"), "input_text:\n").unwrap();

        install_packages(&assets, &paths).await;

        assert!(!dest.join("extra.yaml").exists());
        assert!(dest.join("helpers.yaml").is_file());
    }

    #[tokio::test]
    async fn test_bundled_theme_installs() {
        let config_dir = TempDir::new().unwrap();
        let assets = BundledAssets::bundled();
        let paths = ConfigPaths::new(config_dir.path());

        install_theme(&assets, &paths).await;

        assert!(paths.themes_dir().join("homio").join("homio.yaml").is_file());
    }
}
