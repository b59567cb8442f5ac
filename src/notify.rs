use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;
use ulid::Ulid;

use crate::model::Booking;

const CHANNEL_CAPACITY: usize = 256;

/// A fire-and-forget booking signal. Carries the full booking so consumers
/// (mailers, dashboards) need no follow-up read.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEvent {
    Created(Booking),
    Cancelled(Booking),
}

impl BookingEvent {
    pub fn booking(&self) -> &Booking {
        match self {
            BookingEvent::Created(b) | BookingEvent::Cancelled(b) => b,
        }
    }
}

/// Broadcast hub for booking notifications, one channel per shop.
///
/// Delivery is at-most-one-attempt and never blocks the booking path. A
/// send with no live subscribers is dropped, logged, and counted; it can
/// never affect the result of the operation that emitted it.
pub struct NotifyHub {
    channels: DashMap<Ulid, broadcast::Sender<BookingEvent>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to notifications for a shop. Creates the channel if needed.
    pub fn subscribe(&self, shop_id: Ulid) -> broadcast::Receiver<BookingEvent> {
        let sender = self
            .channels
            .entry(shop_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. Dropped if nobody is listening.
    pub fn send(&self, shop_id: Ulid, event: BookingEvent) {
        let dropped = match self.channels.get(&shop_id) {
            Some(sender) => sender.send(event).is_err(),
            None => true,
        };
        if dropped {
            debug!("notification dropped for shop {shop_id}: no subscribers");
            metrics::counter!(crate::observability::NOTIFICATIONS_DROPPED_TOTAL).increment(1);
        }
    }

    /// Remove a channel (e.g. when a shop is decommissioned).
    #[allow(dead_code)]
    pub fn remove(&self, shop_id: &Ulid) {
        self.channels.remove(shop_id);
    }
}
