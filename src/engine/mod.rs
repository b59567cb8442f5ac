mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;
mod store;

pub use availability::generate_slots;
pub use conflict::has_conflict;
pub use error::EngineError;
pub use store::{BookingStore, InMemoryBookingStore, InMemoryServiceCatalog, ServiceCatalog};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use ulid::Ulid;

use crate::model::{Booking, ScheduleConfig};
use crate::notify::NotifyHub;

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub schedule: ScheduleConfig,
    /// Bound on every collaborator round-trip. Elapsing surfaces
    /// `EngineError::Timeout`, which the caller may retry; the engine never
    /// retries internally.
    pub store_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// The booking lifecycle manager.
///
/// Owns every booking state transition. Conflict detection and slot
/// generation are pure functions over snapshots read through the store
/// collaborator; the engine adds the serialization that makes
/// check-then-insert atomically observed per staff member.
pub struct Engine {
    services: Arc<dyn ServiceCatalog>,
    store: Arc<dyn BookingStore>,
    pub notify: Arc<NotifyHub>,
    config: EngineConfig,
    /// Mutual-exclusion scopes keyed by staff member, created lazily.
    staff_locks: DashMap<Ulid, Arc<Mutex<()>>>,
}

impl Engine {
    pub fn new(
        services: Arc<dyn ServiceCatalog>,
        store: Arc<dyn BookingStore>,
        notify: Arc<NotifyHub>,
        config: EngineConfig,
    ) -> Self {
        Self {
            services,
            store,
            notify,
            config,
            staff_locks: DashMap::new(),
        }
    }

    pub fn schedule(&self) -> &ScheduleConfig {
        &self.config.schedule
    }

    /// The serialization scope for one staff member's schedule. Held across
    /// a check-then-write sequence; requests for different staff members
    /// proceed fully in parallel.
    fn staff_lock(&self, staff_id: Ulid) -> Arc<Mutex<()>> {
        self.staff_locks
            .entry(staff_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run a collaborator round-trip under the configured bound.
    async fn bounded<T>(&self, fut: impl Future<Output = T>) -> Result<T, EngineError> {
        match tokio::time::timeout(self.config.store_timeout, fut).await {
            Ok(value) => Ok(value),
            Err(_) => {
                metrics::counter!(crate::observability::STORE_TIMEOUTS_TOTAL).increment(1);
                Err(EngineError::Timeout)
            }
        }
    }

    /// Look up a booking and acquire its staff member's lock, then re-read
    /// so the transition check sees the latest committed state.
    async fn resolve_for_update(
        &self,
        id: Ulid,
    ) -> Result<(Booking, OwnedMutexGuard<()>), EngineError> {
        let staff_id = self
            .bounded(self.store.find_by_id(id))
            .await?
            .ok_or(EngineError::NotFound(id))?
            .staff_id;
        let guard = self.staff_lock(staff_id).lock_owned().await;
        let booking = self
            .bounded(self.store.find_by_id(id))
            .await?
            .ok_or(EngineError::NotFound(id))?;
        Ok((booking, guard))
    }
}
