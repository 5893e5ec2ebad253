//! Entity ID type: a validated `domain.object_id` pair

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for invalid entity IDs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityIdError {
    #[error("entity id must contain exactly one '.' separator")]
    InvalidFormat,

    #[error("domain cannot be empty")]
    EmptyDomain,

    #[error("object id cannot be empty")]
    EmptyObjectId,

    #[error("domain '{0}' contains invalid characters (lowercase alphanumeric and single underscores only)")]
    InvalidDomain(String),

    #[error("object id '{0}' contains invalid characters (lowercase alphanumeric and underscores only)")]
    InvalidObjectId(String),
}

/// An entity identifier such as `sensor.homio_time`
///
/// Both halves are lowercase ASCII alphanumerics plus underscores and may
/// not start or end with an underscore; the domain additionally may not
/// contain a double underscore. Serializes as the joined string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    domain: String,
    object_id: String,
}

impl EntityId {
    /// Build an EntityId from its two halves, validating both
    pub fn new(
        domain: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Result<Self, EntityIdError> {
        let domain = domain.into();
        let object_id = object_id.into();

        if domain.is_empty() {
            return Err(EntityIdError::EmptyDomain);
        }
        if object_id.is_empty() {
            return Err(EntityIdError::EmptyObjectId);
        }
        // Domains reject double underscores; object ids allow them.
        if domain.contains("__") || !is_valid_part(&domain) {
            return Err(EntityIdError::InvalidDomain(domain));
        }
        if !is_valid_part(&object_id) {
            return Err(EntityIdError::InvalidObjectId(object_id));
        }

        Ok(Self { domain, object_id })
    }

    /// The domain half, e.g. `sensor`
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The object id half, e.g. `homio_time`
    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

/// Lowercase alphanumeric with underscores, no leading/trailing underscore
fn is_valid_part(s: &str) -> bool {
    if s.starts_with('_') || s.ends_with('_') {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((domain, object_id)) if !object_id.contains('.') => {
                Self::new(domain, object_id)
            }
            _ => Err(EntityIdError::InvalidFormat),
        }
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.object_id)
    }
}
