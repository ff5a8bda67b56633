// libs/shared/store/src/traits.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use shared_models::{AvailabilitySlot, DisruptionEvent, SchedulingError, Session};

/// Read access to current booking state, plus the transactional boundary for
/// committing a reschedule. The engine never mutates sessions through any
/// other path.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Session>, SchedulingError>;

    async fn insert(&self, session: Session) -> Result<Session, SchedulingError>;

    /// Sessions for this staff member whose [start, end) interval overlaps
    /// the given one. Status filtering is the caller's concern.
    async fn find_overlapping_for_staff(
        &self,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> Result<Vec<Session>, SchedulingError>;

    async fn find_overlapping_for_client(
        &self,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> Result<Vec<Session>, SchedulingError>;

    /// Sessions whose start time falls inside [start, end].
    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, SchedulingError>;

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Session>, SchedulingError>;

    async fn list_by_staff(&self, staff_id: Uuid) -> Result<Vec<Session>, SchedulingError>;

    /// Atomically cancel the original session and persist its replacement.
    ///
    /// Implementations must re-run the overlap check for the replacement
    /// inside the same atomic unit and return
    /// [`SchedulingError::ConcurrencyConflict`] if a racing booking won;
    /// in that case neither session may be modified. A prior "no conflicts
    /// found" answer is a point-in-time statement, not a reservation.
    async fn commit_reschedule(
        &self,
        original_id: Uuid,
        replacement: Session,
    ) -> Result<Session, SchedulingError>;
}

/// Read access to recurring staff availability.
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// Active slots for the staff member on the given weekday whose effective
    /// window covers the date.
    async fn list_active_slots(
        &self,
        staff_id: Uuid,
        day_of_week: u8,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, SchedulingError>;
}

/// Append-only read access to the disruption audit stream. The engine only
/// reads; `append` exists for the audit collaborator and test fixtures.
#[async_trait]
pub trait DisruptionEventLog: Send + Sync {
    async fn list_by_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DisruptionEvent>, SchedulingError>;

    async fn list_by_client(
        &self,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DisruptionEvent>, SchedulingError>;

    async fn list_by_staff(
        &self,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DisruptionEvent>, SchedulingError>;

    async fn append(&self, event: DisruptionEvent) -> Result<(), SchedulingError>;
}
