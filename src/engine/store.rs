use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use ulid::Ulid;

use crate::model::{Booking, ServiceInfo, Span};

/// Service lookup collaborator. Read-only to the engine; the engine
/// snapshots whatever it reads here into the booking it creates.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn get_service(&self, id: Ulid) -> Option<ServiceInfo>;
}

/// Booking persistence collaborator.
///
/// `save` is insert-or-update and must be all-or-nothing: a booking is
/// either fully committed or absent. Range queries use overlap semantics on
/// each booking's snapshotted interval, so bookings that start before the
/// range but extend into it are returned.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Bookings whose status is not Cancelled/NoShow and whose interval
    /// overlaps `range`.
    async fn find_active_by_staff_in_range(&self, staff_id: Ulid, range: Span) -> Vec<Booking>;

    async fn find_by_id(&self, id: Ulid) -> Option<Booking>;

    async fn save(&self, booking: Booking) -> Booking;

    /// All of a staff member's bookings, optionally bounded by appointment
    /// start (half-open `[from, to)`). Terminal bookings included.
    async fn find_by_staff(
        &self,
        staff_id: Ulid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<Booking>;

    /// All of a shop's bookings, optionally bounded by appointment start.
    async fn find_by_shop(
        &self,
        shop_id: Ulid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<Booking>;
}

fn within_bounds(b: &Booking, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    from.is_none_or(|f| b.appointment_at >= f) && to.is_none_or(|t| b.appointment_at < t)
}

// ── In-memory implementations ────────────────────────────────────

pub struct InMemoryServiceCatalog {
    services: DashMap<Ulid, ServiceInfo>,
}

impl Default for InMemoryServiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryServiceCatalog {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    pub fn insert(&self, service: ServiceInfo) {
        self.services.insert(service.id, service);
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryServiceCatalog {
    async fn get_service(&self, id: Ulid) -> Option<ServiceInfo> {
        self.services.get(&id).map(|e| e.value().clone())
    }
}

pub struct InMemoryBookingStore {
    bookings: DashMap<Ulid, Booking>,
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: DashMap::new(),
        }
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    fn collect_sorted(&self, mut matching: Vec<Booking>) -> Vec<Booking> {
        matching.sort_by_key(|b| b.appointment_at);
        matching
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn find_active_by_staff_in_range(&self, staff_id: Ulid, range: Span) -> Vec<Booking> {
        let matching = self
            .bookings
            .iter()
            .filter(|e| {
                let b = e.value();
                b.staff_id == staff_id && b.status.is_active() && b.interval().overlaps(&range)
            })
            .map(|e| e.value().clone())
            .collect();
        self.collect_sorted(matching)
    }

    async fn find_by_id(&self, id: Ulid) -> Option<Booking> {
        self.bookings.get(&id).map(|e| e.value().clone())
    }

    async fn save(&self, booking: Booking) -> Booking {
        self.bookings.insert(booking.id, booking.clone());
        booking
    }

    async fn find_by_staff(
        &self,
        staff_id: Ulid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<Booking> {
        let matching = self
            .bookings
            .iter()
            .filter(|e| e.value().staff_id == staff_id && within_bounds(e.value(), from, to))
            .map(|e| e.value().clone())
            .collect();
        self.collect_sorted(matching)
    }

    async fn find_by_shop(
        &self,
        shop_id: Ulid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<Booking> {
        let matching = self
            .bookings
            .iter()
            .filter(|e| e.value().shop_id == shop_id && within_bounds(e.value(), from, to))
            .map(|e| e.value().clone())
            .collect();
        self.collect_sorted(matching)
    }
}
