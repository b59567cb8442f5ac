use chrono::{DateTime, Duration, Utc};
use ulid::Ulid;

use crate::limits::*;
use crate::model::{Booking, BookingRequest, ServiceInfo, Span};

use super::EngineError;

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// True iff the proposed interval overlaps any booking in `existing`.
///
/// Precondition: `existing` holds only this staff member's active bookings
/// (Cancelled/NoShow excluded by the caller). Each existing booking occupies
/// the interval snapshotted at its creation, never the service's current
/// duration. Deterministic and side-effect-free; short-circuits on the first
/// overlap, with no guarantee about which conflicting booking it was.
pub fn has_conflict(staff_id: Ulid, proposed: &Span, existing: &[Booking]) -> bool {
    debug_assert!(
        existing
            .iter()
            .all(|b| b.staff_id == staff_id && b.status.is_active()),
        "conflict input must be pre-filtered to the staff member's active bookings"
    );
    existing.iter().any(|b| b.interval().overlaps(proposed))
}

pub(crate) fn validate_request(
    request: &BookingRequest,
    service: &ServiceInfo,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    if service.duration_minutes <= 0 {
        return Err(EngineError::InvalidRequest("non-positive service duration"));
    }
    if service.buffer_minutes < 0 {
        return Err(EngineError::InvalidRequest("negative buffer time"));
    }
    if service.duration_minutes + service.buffer_minutes > MAX_SERVICE_DURATION_MINUTES {
        return Err(EngineError::InvalidRequest("service duration too long"));
    }
    if request.appointment_at > now + Duration::days(MAX_ADVANCE_DAYS) {
        return Err(EngineError::InvalidRequest("appointment too far in advance"));
    }
    if let Some(ref notes) = request.notes
        && notes.len() > MAX_NOTES_LEN
    {
        return Err(EngineError::InvalidRequest("notes too long"));
    }
    Ok(())
}
