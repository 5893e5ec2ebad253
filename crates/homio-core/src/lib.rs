//! Core types for Homio
//!
//! This crate provides the fundamental types shared by the Homio runtime
//! and the dashboard integration: EntityId, State, Event, and Context.

mod context;
mod entity_id;
mod event;
mod state;

pub use context::Context;
pub use entity_id::{EntityId, EntityIdError};
pub use event::{Event, EventData, EventType};
pub use state::State;

/// State value for a boolean entity that is on
pub const STATE_ON: &str = "on";

/// State value for a boolean entity that is off
pub const STATE_OFF: &str = "off";

/// Standard event types fired by the runtime
pub mod events {
    use super::*;

    /// Event type for state changes
    pub const STATE_CHANGED: &str = "state_changed";

    /// Event type for sidebar panel registration changes
    pub const PANELS_UPDATED: &str = "panels_updated";

    /// Data for STATE_CHANGED events
    ///
    /// `old_state` is `None` when an entity first appears, `new_state` is
    /// `None` when an entity is removed.
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    pub struct StateChangedData {
        pub entity_id: EntityId,
        pub old_state: Option<State>,
        pub new_state: Option<State>,
    }

    impl EventData for StateChangedData {
        fn event_type() -> &'static str {
            STATE_CHANGED
        }
    }

    /// Data for PANELS_UPDATED events
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    pub struct PanelsUpdatedData {
        /// Sidebar url path of the panel that changed
        pub url_path: String,
        /// True when the panel was removed rather than added
        pub removed: bool,
    }

    impl EventData for PanelsUpdatedData {
        fn event_type() -> &'static str {
            PANELS_UPDATED
        }
    }
}
