//! Write context for tracing cause and effect

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Identifies the origin of a state write or event
///
/// Every write carries a context. Writes caused by another write share the
/// parent id, which lets a reader chain an automation's effects back to the
/// trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Unique id of this context
    pub id: String,

    /// Id of the context that caused this one, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// User that initiated the write, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Context {
    /// Create a fresh context with a new ULID
    pub fn new() -> Self {
        Self {
            id: Ulid::new().to_string(),
            parent_id: None,
            user_id: None,
        }
    }

    /// Create a context caused by this one
    pub fn child(&self) -> Self {
        Self {
            id: Ulid::new().to_string(),
            parent_id: Some(self.id.clone()),
            user_id: self.user_id.clone(),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
