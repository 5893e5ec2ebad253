//! State snapshot of a single entity

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Context, EntityId};

/// The state of an entity at a point in time
///
/// A state is a string value plus free-form attributes. The runtime writes
/// whole states, never patches: an update replaces the value and the
/// attribute map in one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// The entity this state belongs to
    pub entity_id: EntityId,

    /// The state value, e.g. "off", "20", "2026-08-25"
    pub state: String,

    /// Attributes attached to the state
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,

    /// When the state value last changed
    pub last_changed: DateTime<Utc>,

    /// When the state was last written, even if the value was unchanged
    pub last_updated: DateTime<Utc>,

    /// Context of the write that produced this state
    pub context: Context,
}

impl State {
    /// Create the first state of an entity, stamped with the current time
    pub fn new(
        entity_id: EntityId,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
        context: Context,
    ) -> Self {
        let now = Utc::now();
        Self {
            entity_id,
            state: state.into(),
            attributes,
            last_changed: now,
            last_updated: now,
            context,
        }
    }

    /// Produce the successor state of an overwrite
    ///
    /// `last_changed` carries over when the state value is identical, so
    /// idempotent refresh ticks do not look like changes.
    pub fn with_update(
        &self,
        new_state: impl Into<String>,
        new_attributes: HashMap<String, serde_json::Value>,
        context: Context,
    ) -> Self {
        let now = Utc::now();
        let new_state = new_state.into();
        let changed = self.state != new_state;

        Self {
            entity_id: self.entity_id.clone(),
            state: new_state,
            attributes: new_attributes,
            last_changed: if changed { now } else { self.last_changed },
            last_updated: now,
            context,
        }
    }

    /// Read a typed attribute by key
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        // Timestamps and context are bookkeeping, not identity
        self.entity_id == other.entity_id
            && self.state == other.state
            && self.attributes == other.attributes
    }
}
