//! Cross-component notifications.

use atelier_core::UserId;
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before the oldest are skipped.
const CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// An address book entry was created, updated or deleted.
    AddressBookChanged,
    /// The user picked a different shipping address.
    ShippingSelectionChanged { user_id: UserId },
}

/// Broadcast bus for [`StoreEvent`]s.
///
/// Delivery is best effort: a slow subscriber skips what it missed.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, event: StoreEvent) {
        // no subscribers is fine
        if self.tx.send(event).is_err() {
            debug!(?event, "event published with no subscribers");
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}
