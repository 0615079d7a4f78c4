//! Broadcast event bus.

use tokio::sync::broadcast;

use super::types::BattleEvent;

/// Fan-out of [`BattleEvent`]s to any number of subscribers.
///
/// Publishing is best-effort: with no subscribers the event is dropped, and
/// slow subscribers observe `RecvError::Lagged` rather than blocking the battle.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<BattleEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: BattleEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!(target: "runtime::events", "No subscribers for battle event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
