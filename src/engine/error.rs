use ulid::Ulid;

use crate::model::BookingStatus;

#[derive(Debug)]
pub enum EngineError {
    /// Referenced service or booking does not exist.
    NotFound(Ulid),
    /// The proposed interval overlaps an active booking for this staff
    /// member, detected either at check time or at commit time.
    SlotUnavailable(Ulid),
    /// A lifecycle transition was attempted on a terminal booking.
    AlreadyTerminal { id: Ulid, status: BookingStatus },
    /// A collaborator round-trip exceeded its bound. Retryable by the caller.
    Timeout,
    /// Malformed request, e.g. non-positive duration.
    InvalidRequest(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::SlotUnavailable(staff_id) => {
                write!(f, "slot unavailable for staff {staff_id}")
            }
            EngineError::AlreadyTerminal { id, status } => {
                write!(f, "booking {id} is already terminal ({status:?})")
            }
            EngineError::Timeout => write!(f, "store round-trip timed out"),
            EngineError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
