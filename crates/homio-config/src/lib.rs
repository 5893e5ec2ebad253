//! YAML configuration loading for Homio
//!
//! This crate provides the configuration directory layout and YAML loading
//! with support for include tags:
//!
//! - `!include path` - Include another YAML file
//! - `!include_dir_list dir` - Include all YAML files in a directory as a list
//! - `!include_dir_merge_list dir` - Merge lists from all YAML files
//! - `!include_dir_named dir` - Include all YAML files as a mapping
//! - `!include_dir_merge_named dir` - Merge mappings from all YAML files
//!
//! Unknown tags pass through unchanged.
//!
//! # Example
//!
//! ```ignore
//! use homio_config::{load_yaml, YamlLoader};
//!
//! // Load a dashboard file
//! let config = load_yaml("/config", "lovelace/homio.yaml")?;
//!
//! // Or use the loader directly for more control
//! let mut loader = YamlLoader::new("/config");
//! let config = loader.load_file("lovelace/homio.yaml")?;
//! ```

mod error;
mod loader;
mod paths;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, YamlLoader};
pub use paths::ConfigPaths;

// Re-export serde_yaml::Value for convenience
pub use serde_yaml::Value;
