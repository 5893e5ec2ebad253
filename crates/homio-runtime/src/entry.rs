//! Config entry lifecycle
//!
//! A ConfigEntry represents one set-up instance of an integration. Its state
//! moves through a validated machine:
//!
//! ```text
//! NotLoaded → SetupInProgress → Loaded
//!                            ↘ SetupError
//!
//! Loaded/SetupError → UnloadInProgress → NotLoaded
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a config entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Not set up yet
    #[default]
    NotLoaded,
    /// Currently being set up
    SetupInProgress,
    /// Successfully set up
    Loaded,
    /// Setup failed
    SetupError,
    /// Currently unloading
    UnloadInProgress,
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid state transition from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: EntryState,
    pub to: EntryState,
}

impl EntryState {
    /// Attempt a transition to a new state
    ///
    /// Returns the new state if valid, or an error naming the rejected edge.
    pub fn try_transition(self, to: EntryState) -> Result<EntryState, InvalidTransition> {
        use EntryState::*;

        let valid = matches!(
            (self, to),
            // Setup is the only way out of NotLoaded
            (NotLoaded, SetupInProgress)
                // Setup either succeeds or fails
                | (SetupInProgress, Loaded)
                | (SetupInProgress, SetupError)
                // Loaded and SetupError entries can start unloading
                | (Loaded, UnloadInProgress)
                | (SetupError, UnloadInProgress)
                // Unload completes back to NotLoaded
                | (UnloadInProgress, NotLoaded)
        );

        if valid {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition_to(self, to: EntryState) -> bool {
        self.try_transition(to).is_ok()
    }
}

/// One set-up instance of an integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// ULID identifying this entry
    pub entry_id: String,

    /// Integration domain (e.g., "homio_dashboard")
    pub domain: String,

    /// Display name shown to users
    pub title: String,

    /// Lifecycle state; runtime-only
    #[serde(skip, default)]
    pub state: EntryState,

    /// Why the entry is in a failed state, if it is
    #[serde(skip, default)]
    pub reason: Option<String>,
}

impl ConfigEntry {
    /// Create a new config entry in NotLoaded state
    pub fn new(domain: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            entry_id: ulid::Ulid::new().to_string(),
            domain: domain.into(),
            title: title.into(),
            state: EntryState::NotLoaded,
            reason: None,
        }
    }

    /// Check if the entry is loaded
    pub fn is_loaded(&self) -> bool {
        self.state == EntryState::Loaded
    }

    /// Attempt to transition to a new state with validation
    ///
    /// On success, updates the state and reason fields.
    pub fn try_set_state(
        &mut self,
        new_state: EntryState,
        reason: Option<String>,
    ) -> Result<(), InvalidTransition> {
        self.state.try_transition(new_state)?;
        self.state = new_state;
        self.reason = reason;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EntryState::*;

    // ==================== Valid Transitions ====================

    #[test]
    fn test_not_loaded_to_setup_in_progress() {
        assert_eq!(
            NotLoaded.try_transition(SetupInProgress),
            Ok(SetupInProgress)
        );
    }

    #[test]
    fn test_setup_in_progress_to_loaded() {
        assert!(SetupInProgress.can_transition_to(Loaded));
    }

    #[test]
    fn test_setup_in_progress_to_setup_error() {
        assert!(SetupInProgress.can_transition_to(SetupError));
    }

    #[test]
    fn test_loaded_to_unload_in_progress() {
        assert!(Loaded.can_transition_to(UnloadInProgress));
    }

    #[test]
    fn test_setup_error_to_unload_in_progress() {
        assert!(SetupError.can_transition_to(UnloadInProgress));
    }

    #[test]
    fn test_unload_in_progress_to_not_loaded() {
        assert!(UnloadInProgress.can_transition_to(NotLoaded));
    }

    // ==================== Invalid Transitions ====================

    #[test]
    fn test_not_loaded_cannot_jump_to_loaded() {
        let result = NotLoaded.try_transition(Loaded);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.from, NotLoaded);
        assert_eq!(err.to, Loaded);
    }

    #[test]
    fn test_loaded_cannot_jump_to_not_loaded() {
        assert!(!Loaded.can_transition_to(NotLoaded));
    }

    #[test]
    fn test_loaded_cannot_restart_setup() {
        assert!(!Loaded.can_transition_to(SetupInProgress));
    }

    #[test]
    fn test_setup_error_cannot_retry_directly() {
        assert!(!SetupError.can_transition_to(SetupInProgress));
    }

    #[test]
    fn test_setup_in_progress_cannot_go_to_not_loaded() {
        assert!(!SetupInProgress.can_transition_to(NotLoaded));
    }

    #[test]
    fn test_unload_in_progress_cannot_go_back_to_loaded() {
        assert!(!UnloadInProgress.can_transition_to(Loaded));
    }

    // ==================== Complete Paths ====================

    #[test]
    fn test_full_setup_success_path() {
        // Successful lifecycle: setup, load, unload, back to start.
        let state = NotLoaded;
        let state = state.try_transition(SetupInProgress).unwrap();
        let state = state.try_transition(Loaded).unwrap();
        let state = state.try_transition(UnloadInProgress).unwrap();
        let state = state.try_transition(NotLoaded).unwrap();
        assert_eq!(state, NotLoaded);
    }

    #[test]
    fn test_setup_error_unload_path() {
        // A failed setup still unloads cleanly.
        let state = NotLoaded;
        let state = state.try_transition(SetupInProgress).unwrap();
        let state = state.try_transition(SetupError).unwrap();
        let state = state.try_transition(UnloadInProgress).unwrap();
        let state = state.try_transition(NotLoaded).unwrap();
        assert_eq!(state, NotLoaded);
    }

    // ==================== ConfigEntry ====================

    #[test]
    fn test_config_entry_new() {
        let entry = ConfigEntry::new("homio_dashboard", "Homio Dashboard");
        assert_eq!(entry.domain, "homio_dashboard");
        assert_eq!(entry.title, "Homio Dashboard");
        assert_eq!(entry.state, EntryState::NotLoaded);
        assert!(!entry.is_loaded());
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = ConfigEntry::new("homio_dashboard", "A");
        let b = ConfigEntry::new("homio_dashboard", "B");
        assert_ne!(a.entry_id, b.entry_id);
    }

    #[test]
    fn test_try_set_state_records_reason() {
        let mut entry = ConfigEntry::new("homio_dashboard", "Homio Dashboard");
        entry.try_set_state(SetupInProgress, None).unwrap();
        entry
            .try_set_state(SetupError, Some("dashboard file missing".to_string()))
            .unwrap();

        assert_eq!(entry.state, SetupError);
        assert_eq!(entry.reason.as_deref(), Some("dashboard file missing"));
    }

    #[test]
    fn test_try_set_state_rejects_invalid_and_keeps_state() {
        let mut entry = ConfigEntry::new("homio_dashboard", "Homio Dashboard");
        let result = entry.try_set_state(Loaded, None);
        assert!(result.is_err());
        assert_eq!(entry.state, NotLoaded);
    }
}
