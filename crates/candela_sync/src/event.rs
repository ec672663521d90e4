//! # Scene Event Bus
//!
//! Observer registration replacing callback listener interfaces: the
//! synchronizer and render loop publish, any number of subscribers
//! receive over channels. Delivery threading (e.g. marshaling onto a
//! UI executor) is the subscriber's concern, never the core's.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

/// Events published by the synchronizer and render loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    /// A scene description was loaded into the editable generation.
    SceneLoaded {
        /// Name of the loaded scene.
        name: String,
    },
    /// The snapshot generation was persisted.
    SceneSaved {
        /// Name it was saved under.
        name: String,
    },
    /// Chunk geometry finished loading.
    ChunksLoaded {
        /// World the chunks came from.
        world: String,
        /// Number of chunks loaded.
        count: usize,
    },
    /// The policy gate wants the user to confirm a destructive reset.
    ///
    /// The subscriber answers by calling `apply_pending_edits` or
    /// `discard_pending_edits` on the synchronizer.
    ResetConfirmRequested,
    /// The render loop switched mode (for UI state, not a handoff).
    RenderStateChanged(candela_scene::RenderMode),
}

struct BusInner {
    subscribers: Mutex<Vec<Sender<SceneEvent>>>,
}

/// Fan-out event bus. Cheap to clone; clones share subscribers.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Registers a new subscriber and returns its receiving end.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<SceneEvent> {
        let (tx, rx) = unbounded();
        self.inner.subscribers.lock().push(tx);
        rx
    }

    /// Publishes an event to all live subscribers.
    ///
    /// Subscribers whose receiver has been dropped are pruned here.
    pub fn publish(&self, event: &SceneEvent) {
        let mut subs = self.inner.subscribers.lock();
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers (after the last prune).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_to_all_subscribers() {
        let bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(&SceneEvent::ResetConfirmRequested);

        assert_eq!(a.try_recv().ok(), Some(SceneEvent::ResetConfirmRequested));
        assert_eq!(b.try_recv().ok(), Some(SceneEvent::ResetConfirmRequested));
    }

    #[test]
    fn prunes_dropped_subscribers() {
        let bus = EventBus::new();
        let a = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(&SceneEvent::ResetConfirmRequested);
        assert_eq!(bus.subscriber_count(), 1);
        assert!(a.try_recv().is_ok());
    }
}
