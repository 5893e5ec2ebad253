//! The event bus all Homio components communicate over.
//!
//! Publishing is type-erased: every event crosses the bus as
//! [`Event<serde_json::Value>`]. Subscribers can stay at that level with
//! [`EventBus::subscribe`] or get decoded payloads back through
//! [`EventBus::subscribe_typed`].

use std::marker::PhantomData;

use dashmap::DashMap;
use homio_core::{Context, Event, EventData, EventType};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Per-event-type channel capacity.
const CHANNEL_CAPACITY: usize = 1024;

/// An event as it travels over the bus, payload erased to JSON.
pub type RawEvent = Event<serde_json::Value>;

/// Broadcast-based pub/sub for [`Event`]s.
///
/// Each event type gets its own broadcast channel, created lazily on first
/// subscription. A separate channel carries every event for
/// [`subscribe_all`](EventBus::subscribe_all) listeners.
pub struct EventBus {
    channels: DashMap<EventType, broadcast::Sender<RawEvent>>,
    all_events: broadcast::Sender<RawEvent>,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            all_events: broadcast::channel(capacity).0,
            capacity,
        }
    }

    /// Subscribe to one event type.
    pub fn subscribe(&self, event_type: impl Into<EventType>) -> broadcast::Receiver<RawEvent> {
        let event_type = event_type.into();
        trace!(event_type = %event_type, "New subscription");

        self.channels
            .entry(event_type)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Subscribe to the event type of `T`, decoding payloads into `T`.
    pub fn subscribe_typed<T: EventData + serde::de::DeserializeOwned>(
        &self,
    ) -> TypedEventReceiver<T> {
        TypedEventReceiver {
            raw: self.subscribe(T::event_type()),
            _data: PhantomData,
        }
    }

    /// Subscribe to every event regardless of type.
    pub fn subscribe_all(&self) -> broadcast::Receiver<RawEvent> {
        self.all_events.subscribe()
    }

    /// Deliver an event to its type's subscribers and to all-event
    /// subscribers. A send error only means nobody is listening right now.
    pub fn fire(&self, event: RawEvent) {
        debug!(event_type = %event.event_type, "Firing event");

        if let Some(tx) = self.channels.get(&event.event_type) {
            let _ = tx.send(event.clone());
        }
        let _ = self.all_events.send(event);
    }

    /// Serialize `data` and fire it under `T`'s event type.
    pub fn fire_typed<T: EventData + serde::Serialize>(&self, data: T, context: Context) {
        let payload = serde_json::to_value(&data).unwrap_or_default();
        self.fire(Event::new(T::event_type(), payload, context));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver half of [`EventBus::subscribe_typed`].
pub struct TypedEventReceiver<T> {
    raw: broadcast::Receiver<RawEvent>,
    _data: PhantomData<T>,
}

impl<T: EventData + serde::de::DeserializeOwned> TypedEventReceiver<T> {
    /// Receive the next event whose payload decodes as `T`.
    ///
    /// Events on the same type with a payload that does not decode are
    /// skipped, not surfaced as errors.
    pub async fn recv(&mut self) -> Result<Event<T>, broadcast::error::RecvError> {
        loop {
            let event = self.raw.recv().await?;
            match serde_json::from_value(event.data) {
                Ok(data) => {
                    return Ok(Event {
                        event_type: event.event_type,
                        data,
                        time_fired: event.time_fired,
                        context: event.context,
                    })
                }
                Err(err) => {
                    trace!(error = %err, "Skipping event with mismatched payload");
                }
            }
        }
    }
}
