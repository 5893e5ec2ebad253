//! YAML loading with the include tag family.
//!
//! Dashboards and packages may stitch themselves together from other files:
//! `!include`, `!include_dir_list`, `!include_dir_merge_list`,
//! `!include_dir_named` and `!include_dir_merge_named` are expanded inline
//! while loading. Unknown tags pass through untouched so downstream
//! consumers can interpret them.

use crate::error::{ConfigError, ConfigResult};
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a directory include combines the files it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirMode {
    /// One sequence element per file.
    List,
    /// Files are sequences; concatenate them.
    MergeList,
    /// Mapping keyed by file stem.
    Named,
    /// Files are mappings; union their keys.
    MergeNamed,
}

impl DirMode {
    fn from_tag(tag: &str) -> Option<DirMode> {
        match tag {
            "!include_dir_list" => Some(DirMode::List),
            "!include_dir_merge_list" => Some(DirMode::MergeList),
            "!include_dir_named" => Some(DirMode::Named),
            "!include_dir_merge_named" => Some(DirMode::MergeNamed),
            _ => None,
        }
    }
}

/// Expands include tags while loading YAML documents.
pub struct YamlLoader {
    config_dir: PathBuf,
    /// Files currently being expanded, for circular include detection.
    visiting: HashSet<PathBuf>,
}

impl YamlLoader {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            visiting: HashSet::new(),
        }
    }

    /// The directory relative paths resolve against.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load a YAML file and expand every include tag in it.
    ///
    /// A relative `path` resolves under the config directory; includes inside
    /// the file resolve relative to the file itself.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<Value> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        };
        debug!(path = %path.display(), "Loading YAML file");

        if !self.visiting.insert(path.clone()) {
            return Err(ConfigError::CircularInclude { path });
        }

        let outcome = fs::read_to_string(&path)
            .map_err(|source| ConfigError::ReadFile {
                path: path.clone(),
                source,
            })
            .and_then(|text| self.load_string(&text, &path));

        self.visiting.remove(&path);
        outcome
    }

    /// Parse a YAML document and expand its include tags. `source_path` is
    /// where the text came from; relative includes resolve next to it.
    pub fn load_string(&mut self, text: &str, source_path: &Path) -> ConfigResult<Value> {
        let doc: Value = serde_yaml::from_str(text).map_err(|source| ConfigError::ParseYaml {
            path: source_path.to_path_buf(),
            source,
        })?;
        self.expand(doc, source_path)
    }

    /// Walk a value, replacing include tags with their expansion.
    fn expand(&mut self, value: Value, source_path: &Path) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) => self.expand_tag(*tagged, source_path),
            Value::Mapping(entries) => {
                let mut out = Mapping::with_capacity(entries.len());
                for (key, val) in entries {
                    let key = self.expand(key, source_path)?;
                    let val = self.expand(val, source_path)?;
                    out.insert(key, val);
                }
                Ok(Value::Mapping(out))
            }
            Value::Sequence(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.expand(item, source_path)?);
                }
                Ok(Value::Sequence(out))
            }
            scalar => Ok(scalar),
        }
    }

    fn expand_tag(&mut self, tagged: TaggedValue, source_path: &Path) -> ConfigResult<Value> {
        let tag = tagged.tag.to_string();

        if tag == "!include" {
            let target = self.tag_path(&tagged.value, source_path)?;
            debug!(target = %target.display(), "Expanding !include");
            return self.load_file(target);
        }

        if let Some(mode) = DirMode::from_tag(&tag) {
            let dir = self.tag_path(&tagged.value, source_path)?;
            debug!(dir = %dir.display(), ?mode, "Expanding directory include");
            return self.include_dir(mode, &dir);
        }

        // Not ours. Keep the tag, but expand anything nested under it.
        let inner = self.expand(tagged.value, source_path)?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: tagged.tag,
            value: inner,
        })))
    }

    /// Load every YAML file in `dir` and combine them per the mode.
    fn include_dir(&mut self, mode: DirMode, dir: &Path) -> ConfigResult<Value> {
        let files = yaml_files_sorted(dir)?;

        match mode {
            DirMode::List => {
                let mut seq = Vec::with_capacity(files.len());
                for file in files {
                    seq.push(self.load_file(&file)?);
                }
                Ok(Value::Sequence(seq))
            }
            DirMode::MergeList => {
                let mut seq = Vec::new();
                for file in files {
                    match self.load_file(&file)? {
                        Value::Sequence(items) => seq.extend(items),
                        single => seq.push(single),
                    }
                }
                Ok(Value::Sequence(seq))
            }
            DirMode::Named => {
                let mut map = Mapping::new();
                for file in files {
                    let stem = file
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or_default()
                        .to_string();
                    let contents = self.load_file(&file)?;
                    map.insert(Value::String(stem), contents);
                }
                Ok(Value::Mapping(map))
            }
            DirMode::MergeNamed => {
                let mut map = Mapping::new();
                for file in files {
                    if let Value::Mapping(entries) = self.load_file(&file)? {
                        for (key, val) in entries {
                            map.insert(key, val);
                        }
                    }
                }
                Ok(Value::Mapping(map))
            }
        }
    }

    /// The path argument of an include tag, resolved next to the source file.
    fn tag_path(&self, value: &Value, source_path: &Path) -> ConfigResult<PathBuf> {
        let raw = match value.as_str() {
            Some(s) => s,
            None => {
                return Err(ConfigError::InvalidIncludePath {
                    path: format!("{:?}", value),
                    reason: "path must be a string".to_string(),
                })
            }
        };

        if Path::new(raw).is_absolute() {
            return Ok(PathBuf::from(raw));
        }
        let base = source_path.parent().unwrap_or(&self.config_dir);
        Ok(base.join(raw))
    }
}

/// The `.yaml`/`.yml` files directly inside `dir`, sorted by name.
fn yaml_files_sorted(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConfigError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|source| ConfigError::ReadFile {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// One-shot load of a YAML file with include expansion.
pub fn load_yaml(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Value> {
    YamlLoader::new(config_dir).load_file(file)
}
