use chrono::Duration;
use ulid::Ulid;

use crate::limits::*;
use crate::model::{Booking, BookingRequest, BookingStatus, PaymentStatus, Span};
use crate::notify::BookingEvent;
use crate::observability;

use super::conflict::{has_conflict, now, validate_request};
use super::{Engine, EngineError};

impl Engine {
    /// Create a booking in Pending/Pending status.
    ///
    /// The conflict check and the insert run under the staff member's lock,
    /// so at most one booking can commit for a given overlapping interval no
    /// matter how many requests race. The save is the single suspension
    /// point: an abandoned request leaves no partial commit behind.
    pub async fn create_booking(
        &self,
        request: BookingRequest,
        customer_id: Ulid,
    ) -> Result<Booking, EngineError> {
        let service = self
            .bounded(self.services.get_service(request.service_id))
            .await?
            .ok_or(EngineError::NotFound(request.service_id))?;
        let now = now();
        validate_request(&request, &service, now)?;

        let proposed = Span::new(
            request.appointment_at,
            request.appointment_at + Duration::minutes(service.duration_minutes),
        );

        let lock = self.staff_lock(request.staff_id);
        let _guard = lock.lock().await;

        let existing = self
            .bounded(
                self.store
                    .find_active_by_staff_in_range(request.staff_id, proposed),
            )
            .await?;
        if has_conflict(request.staff_id, &proposed, &existing) {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(EngineError::SlotUnavailable(request.staff_id));
        }

        let booking = Booking::new(&request, customer_id, &service, now);
        let saved = self.bounded(self.store.save(booking)).await?;
        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);

        // Best-effort signal: delivery problems never roll back the booking.
        self.notify
            .send(saved.shop_id, BookingEvent::Created(saved.clone()));
        Ok(saved)
    }

    /// Cancel a booking with a reason. Cancellation is a status change, not
    /// removal: the record stays queryable forever.
    pub async fn cancel_booking(
        &self,
        id: Ulid,
        reason: impl Into<String>,
    ) -> Result<Booking, EngineError> {
        let reason = reason.into();
        if reason.len() > MAX_REASON_LEN {
            return Err(EngineError::InvalidRequest("cancellation reason too long"));
        }

        let (mut booking, _guard) = self.resolve_for_update(id).await?;
        if booking.is_terminal() {
            return Err(EngineError::AlreadyTerminal {
                id,
                status: booking.status,
            });
        }

        let now = now();
        booking.status = BookingStatus::Cancelled;
        booking.cancellation_reason = Some(reason);
        booking.cancelled_at = Some(now);
        booking.updated_at = now;

        let saved = self.bounded(self.store.save(booking)).await?;
        metrics::counter!(observability::BOOKINGS_CANCELLED_TOTAL).increment(1);

        self.notify
            .send(saved.shop_id, BookingEvent::Cancelled(saved.clone()));
        Ok(saved)
    }

    /// Direct status overwrite for privileged callers (staff/admin).
    ///
    /// Deliberately permissive: any target status is accepted, including
    /// jumping straight to a terminal one (Completed, NoShow). The only
    /// guard is that the current status is not already terminal.
    pub async fn update_status(
        &self,
        id: Ulid,
        new_status: BookingStatus,
    ) -> Result<Booking, EngineError> {
        let (mut booking, _guard) = self.resolve_for_update(id).await?;
        if booking.is_terminal() {
            return Err(EngineError::AlreadyTerminal {
                id,
                status: booking.status,
            });
        }

        booking.status = new_status;
        booking.updated_at = now();

        let saved = self.bounded(self.store.save(booking)).await?;
        metrics::counter!(observability::STATUS_OVERRIDES_TOTAL).increment(1);
        Ok(saved)
    }

    /// Record a payment outcome reported by the payment collaborator.
    ///
    /// Allowed at any lifecycle point, including on terminal bookings
    /// (a refund lands after a cancellation). A completed payment on a
    /// booking still Pending promotes it to Confirmed.
    pub async fn record_payment(
        &self,
        id: Ulid,
        payment_status: PaymentStatus,
        payment_ref: Option<String>,
    ) -> Result<Booking, EngineError> {
        let (mut booking, _guard) = self.resolve_for_update(id).await?;

        booking.payment_status = payment_status;
        if payment_ref.is_some() {
            booking.payment_ref = payment_ref;
        }
        if payment_status == PaymentStatus::Completed && booking.status == BookingStatus::Pending {
            booking.status = BookingStatus::Confirmed;
        }
        booking.updated_at = now();

        let saved = self.bounded(self.store.save(booking)).await?;
        metrics::counter!(observability::PAYMENT_UPDATES_TOTAL).increment(1);
        Ok(saved)
    }
}
