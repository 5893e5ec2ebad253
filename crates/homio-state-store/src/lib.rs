//! Current-state table for every Homio entity.
//!
//! Writes replace an entity's state and attributes wholesale and fire
//! `state_changed` on the event bus. A per-domain index backs the
//! domain-scoped queries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use homio_core::events::StateChangedData;
use homio_core::{Context, EntityId, State};
use homio_event_bus::EventBus;
use tracing::{debug, instrument};

/// Thread-safe store of the latest [`State`] per entity.
pub struct StateStore {
    /// Latest state keyed by the full entity id string.
    states: DashMap<String, State>,
    /// Entity id strings grouped by domain.
    domain_index: DashMap<String, HashSet<String>>,
    event_bus: Arc<EventBus>,
}

impl StateStore {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            states: DashMap::new(),
            domain_index: DashMap::new(),
            event_bus,
        }
    }

    /// Replace an entity's state and attributes.
    ///
    /// The write is a full overwrite; nothing from the previous attribute
    /// map survives. `last_changed` carries over from the previous state
    /// when the state value itself is unchanged. Fires `state_changed`
    /// carrying both the old and the new state.
    #[instrument(skip(self, state, attributes, context), fields(entity_id = %entity_id))]
    pub fn set(
        &self,
        entity_id: EntityId,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
        context: Context,
    ) -> State {
        let key = entity_id.to_string();

        let previous = self.states.get(&key).map(|entry| entry.clone());
        let next = match &previous {
            Some(current) => current.with_update(state, attributes, context.clone()),
            None => State::new(entity_id.clone(), state, attributes, context.clone()),
        };

        debug!(
            state = %next.state,
            changed = previous.as_ref().map_or(true, |p| p.state != next.state),
            "Setting entity state"
        );

        self.states.insert(key.clone(), next.clone());
        self.domain_index
            .entry(entity_id.domain().to_string())
            .or_default()
            .insert(key);

        self.event_bus.fire_typed(
            StateChangedData {
                entity_id,
                old_state: previous,
                new_state: Some(next.clone()),
            },
            context,
        );

        next
    }

    /// The full state of an entity, if it exists.
    pub fn get(&self, entity_id: &str) -> Option<State> {
        self.states.get(entity_id).map(|entry| entry.clone())
    }

    /// Just the state value of an entity.
    pub fn get_state(&self, entity_id: &str) -> Option<String> {
        self.states.get(entity_id).map(|entry| entry.state.clone())
    }

    /// Whether the entity exists and currently holds `state`.
    pub fn is_state(&self, entity_id: &str, state: &str) -> bool {
        self.states
            .get(entity_id)
            .is_some_and(|entry| entry.state == state)
    }

    /// Entity id strings of every entity in `domain`. Unordered.
    pub fn entity_ids(&self, domain: &str) -> Vec<String> {
        self.domain_index
            .get(domain)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// States of every entity in `domain`.
    pub fn domain_states(&self, domain: &str) -> Vec<State> {
        self.entity_ids(domain)
            .into_iter()
            .filter_map(|id| self.get(&id))
            .collect()
    }

    /// Every stored state.
    pub fn all(&self) -> Vec<State> {
        self.states.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of entities with a stored state.
    pub fn entity_count(&self) -> usize {
        self.states.len()
    }

    /// Drop an entity's state, firing `state_changed` with no new state.
    /// Removing an unknown entity is a no-op.
    #[instrument(skip(self, context), fields(entity_id = %entity_id))]
    pub fn remove(&self, entity_id: &EntityId, context: Context) -> Option<State> {
        let key = entity_id.to_string();
        let (_, removed) = self.states.remove(&key)?;

        if let Some(mut members) = self.domain_index.get_mut(entity_id.domain()) {
            members.remove(&key);
        }
        debug!("Removed entity state");

        self.event_bus.fire_typed(
            StateChangedData {
                entity_id: entity_id.clone(),
                old_state: Some(removed.clone()),
                new_state: None,
            },
            context,
        );

        Some(removed)
    }
}
