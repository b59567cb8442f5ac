use chrono::{DateTime, Duration, NaiveDate, Utc};
use ulid::Ulid;

use crate::model::{Booking, ScheduleConfig, Span};

use super::conflict::has_conflict;

/// Generate the ordered sequence of bookable start instants for one staff
/// member on `date`.
///
/// Candidates step through the operating window at the configured
/// granularity. A candidate is offered iff its occupied span (service
/// duration plus buffer) fits before closing time, does not overlap any of
/// the staff member's existing active bookings, and starts strictly after
/// `now`. An empty result means a fully booked (or past) day, not an error.
///
/// Deterministic and side-effect-free: safe to call repeatedly and
/// concurrently over the same snapshot.
pub fn generate_slots(
    staff_id: Ulid,
    service_duration_minutes: i64,
    buffer_minutes: i64,
    date: NaiveDate,
    existing: &[Booking],
    now: DateTime<Utc>,
    schedule: &ScheduleConfig,
) -> Vec<DateTime<Utc>> {
    if date < now.date_naive() {
        return Vec::new();
    }

    let occupied = Duration::minutes(service_duration_minutes + buffer_minutes);
    let step = Duration::minutes(schedule.granularity_minutes);
    if occupied <= Duration::zero() || step <= Duration::zero() {
        return Vec::new();
    }

    let open = date.and_time(schedule.open).and_utc();
    let close = date.and_time(schedule.close).and_utc();

    let mut slots = Vec::new();
    let mut slot = open;
    while slot < close {
        // The full occupied span must fit before closing time.
        if slot + occupied <= close && slot > now {
            let candidate = Span::new(slot, slot + occupied);
            if !has_conflict(staff_id, &candidate, existing) {
                slots.push(slot);
            }
        }
        slot += step;
    }
    slots
}
