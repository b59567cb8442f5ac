use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open interval `[start, end)` over absolute instants.
///
/// Instants are absolute, not day-relative, so spans that cross midnight
/// behave like any other span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[allow(dead_code)]
    pub fn contains_instant(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

/// Lifecycle status of a booking.
///
/// Cancelled, Completed, and NoShow are terminal: once entered, no further
/// lifecycle transition is permitted. Payment adjustments remain possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::Completed | BookingStatus::NoShow
        )
    }

    /// Active bookings are the only ones considered for conflict purposes.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::NoShow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// Read-only view of a service as supplied by the catalog collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub id: Ulid,
    pub duration_minutes: i64,
    pub buffer_minutes: i64,
    pub price: f64,
}

/// Client-supplied booking parameters. The customer id travels separately,
/// resolved by the authenticating caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub shop_id: Ulid,
    pub staff_id: Ulid,
    pub service_id: Ulid,
    pub appointment_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// A pending-or-later appointment on a staff member's schedule.
///
/// `duration_minutes`, `buffer_minutes`, and `total_amount` are snapshotted
/// from the service at creation time and never recomputed, so later edits to
/// the service cannot move an existing booking's interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub shop_id: Ulid,
    pub staff_id: Ulid,
    pub customer_id: Ulid,
    pub service_id: Ulid,
    pub appointment_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub buffer_minutes: i64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// External payment identifier stamped by the payment collaborator.
    pub payment_ref: Option<String>,
    pub total_amount: f64,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        request: &BookingRequest,
        customer_id: Ulid,
        service: &ServiceInfo,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Ulid::new(),
            shop_id: request.shop_id,
            staff_id: request.staff_id,
            customer_id,
            service_id: request.service_id,
            appointment_at: request.appointment_at,
            duration_minutes: service.duration_minutes,
            buffer_minutes: service.buffer_minutes,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_ref: None,
            total_amount: service.price,
            notes: request.notes.clone(),
            cancellation_reason: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The interval this booking occupies for conflict purposes:
    /// `[appointment_at, appointment_at + duration_minutes)`, using the
    /// duration snapshotted at creation.
    pub fn interval(&self) -> Span {
        Span::new(
            self.appointment_at,
            self.appointment_at + Duration::minutes(self.duration_minutes),
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Daily operating window and slot granularity for availability queries.
/// Configuration input to the generator, never derived from bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub granularity_minutes: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            close: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            granularity_minutes: 30,
        }
    }
}
