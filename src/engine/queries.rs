use std::time::Instant;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use ulid::Ulid;

use crate::limits::*;
use crate::model::{Booking, Span};
use crate::observability;

use super::availability::generate_slots;
use super::conflict::now;
use super::{Engine, EngineError};

fn validate_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(), EngineError> {
    if let (Some(from), Some(to)) = (from, to) {
        if to <= from {
            return Err(EngineError::InvalidRequest("empty query range"));
        }
        if to - from > Duration::days(MAX_QUERY_WINDOW_DAYS) {
            return Err(EngineError::InvalidRequest("query window too wide"));
        }
    }
    Ok(())
}

impl Engine {
    pub async fn get_booking(&self, id: Ulid) -> Result<Booking, EngineError> {
        self.bounded(self.store.find_by_id(id))
            .await?
            .ok_or(EngineError::NotFound(id))
    }

    /// Bookable start instants for `staff_id` performing `service_id` on
    /// `date`, ascending.
    ///
    /// Read-only and unsynchronized: a listed slot may be claimed by a
    /// concurrent request, which surfaces as `SlotUnavailable` at actual
    /// creation time, not here.
    pub async fn available_slots(
        &self,
        staff_id: Ulid,
        service_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, EngineError> {
        let service = self
            .bounded(self.services.get_service(service_id))
            .await?
            .ok_or(EngineError::NotFound(service_id))?;

        let schedule = self.config.schedule;
        let day = Span::new(
            date.and_time(schedule.open).and_utc(),
            date.and_time(schedule.close).and_utc(),
        );
        let existing = self
            .bounded(self.store.find_active_by_staff_in_range(staff_id, day))
            .await?;

        metrics::counter!(observability::AVAILABILITY_QUERIES_TOTAL).increment(1);
        let started = Instant::now();
        let slots = generate_slots(
            staff_id,
            service.duration_minutes,
            service.buffer_minutes,
            date,
            &existing,
            now(),
            &schedule,
        );
        metrics::histogram!(observability::SLOT_GENERATION_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        Ok(slots)
    }

    /// A staff member's bookings, optionally bounded by appointment start.
    /// Includes terminal bookings; no side effects.
    pub async fn list_by_staff_in_range(
        &self,
        staff_id: Ulid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Booking>, EngineError> {
        validate_range(from, to)?;
        self.bounded(self.store.find_by_staff(staff_id, from, to))
            .await
    }

    /// A shop's bookings across all staff, optionally bounded.
    pub async fn list_by_shop_in_range(
        &self,
        shop_id: Ulid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Booking>, EngineError> {
        validate_range(from, to)?;
        self.bounded(self.store.find_by_shop(shop_id, from, to))
            .await
    }
}
