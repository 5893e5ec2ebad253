//! The entities the dashboard binds to
//!
//! Three boolean helpers, one number helper, and two clock sensors. All of
//! them are created directly in the state store with dashboard defaults;
//! a failure to create one entity is logged and the rest still load.

use chrono::{DateTime, Local};
use homio_core::{Context, EntityId, STATE_OFF};
use homio_state_store::StateStore;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, error, info};

/// Date sensor, formatted `%Y-%m-%d`
pub const DATE_SENSOR: &str = "sensor.homio_date";
/// Time sensor, formatted `%H:%M`
pub const TIME_SENSOR: &str = "sensor.homio_time";

/// Boolean helpers: object id, friendly name, icon
const BOOLEAN_HELPERS: [(&str, &str, &str); 3] = [
    ("homio_edit_mode", "Homio Edit Mode", "mdi:pencil"),
    ("homio_dark_mode", "Homio Dark Mode", "mdi:theme-light-dark"),
    ("homio_notifications", "Homio Notifications", "mdi:bell-outline"),
];

/// Create the dashboard's helper entities and the initial clock values
pub fn create_entities(states: &StateStore) {
    for (object_id, name, icon) in BOOLEAN_HELPERS {
        match EntityId::new("input_boolean", object_id) {
            Ok(entity_id) => {
                let mut attributes = HashMap::new();
                attributes.insert("friendly_name".to_string(), json!(name));
                attributes.insert("icon".to_string(), json!(icon));
                attributes.insert("editable".to_string(), json!(false));
                states.set(entity_id, STATE_OFF, attributes, Context::new());
            }
            Err(e) => {
                error!(object_id, error = %e, "Failed to create boolean helper");
            }
        }
    }

    create_target_temperature(states);
    refresh_clock(states, Local::now());
    info!("Created Homio dashboard entities");
}

fn create_target_temperature(states: &StateStore) {
    match EntityId::new("input_number", "homio_target_temperature") {
        Ok(entity_id) => {
            let mut attributes = HashMap::new();
            attributes.insert(
                "friendly_name".to_string(),
                json!("Homio Target Temperature"),
            );
            attributes.insert("icon".to_string(), json!("mdi:thermometer"));
            attributes.insert("min".to_string(), json!(7.0));
            attributes.insert("max".to_string(), json!(24.0));
            attributes.insert("step".to_string(), json!(0.5));
            attributes.insert("mode".to_string(), json!("slider"));
            attributes.insert("unit_of_measurement".to_string(), json!("°C"));
            attributes.insert("editable".to_string(), json!(false));
            states.set(entity_id, format_number(20.0), attributes, Context::new());
        }
        Err(e) => {
            error!(error = %e, "Failed to create target temperature helper");
        }
    }
}

/// Overwrite both clock sensors from the given instant
///
/// Called once a minute by the refresher. Every call writes the full state
/// and attribute set, so a tick can never leave a partial value behind.
pub fn refresh_clock(states: &StateStore, now: DateTime<Local>) {
    set_clock_sensor(
        states,
        "homio_date",
        now.format("%Y-%m-%d").to_string(),
        "Homio Date",
        "mdi:calendar",
    );
    set_clock_sensor(
        states,
        "homio_time",
        now.format("%H:%M").to_string(),
        "Homio Time",
        "mdi:clock-outline",
    );
    debug!("Refreshed clock sensors");
}

fn set_clock_sensor(states: &StateStore, object_id: &str, value: String, name: &str, icon: &str) {
    match EntityId::new("sensor", object_id) {
        Ok(entity_id) => {
            let mut attributes = HashMap::new();
            attributes.insert("friendly_name".to_string(), json!(name));
            attributes.insert("icon".to_string(), json!(icon));
            states.set(entity_id, value, attributes, Context::new());
        }
        Err(e) => {
            error!(object_id, error = %e, "Failed to refresh clock sensor");
        }
    }
}

/// Format a number state the way the frontend expects, without a
/// trailing `.0` on whole values
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}
