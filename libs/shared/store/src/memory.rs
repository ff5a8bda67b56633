// libs/shared/store/src/memory.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::{
    AvailabilitySlot, DisruptionEvent, SchedulingError, Session, SessionStatus,
};

use crate::traits::{AvailabilityStore, DisruptionEventLog, SessionStore};

/// In-memory reference store backing all three collaborator traits.
///
/// Used by the test suites and by embedders that do not need durable
/// persistence. Its `commit_reschedule` holds the session write lock for the
/// whole recheck-and-swap, which is what closes the time-of-check/time-of-use
/// window for this backend.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    slots: RwLock<Vec<AvailabilitySlot>>,
    events: RwLock<Vec<DisruptionEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_sessions(&self, sessions: impl IntoIterator<Item = Session>) {
        let mut guard = self.sessions.write().await;
        for session in sessions {
            guard.insert(session.id, session);
        }
    }

    pub async fn seed_slots(&self, slots: impl IntoIterator<Item = AvailabilitySlot>) {
        self.slots.write().await.extend(slots);
    }

    pub async fn seed_events(&self, events: impl IntoIterator<Item = DisruptionEvent>) {
        self.events.write().await.extend(events);
    }
}

fn sorted_by_start(mut sessions: Vec<Session>) -> Vec<Session> {
    sessions.sort_by_key(|s| s.start_time);
    sessions
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Session>, SchedulingError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn insert(&self, session: Session) -> Result<Session, SchedulingError> {
        let mut guard = self.sessions.write().await;
        if guard.contains_key(&session.id) {
            return Err(SchedulingError::Validation(format!(
                "Session {} already exists",
                session.id
            )));
        }
        guard.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_overlapping_for_staff(
        &self,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> Result<Vec<Session>, SchedulingError> {
        let guard = self.sessions.read().await;
        Ok(sorted_by_start(
            guard
                .values()
                .filter(|s| s.staff_id == Some(staff_id))
                .filter(|s| Some(s.id) != exclude_session_id)
                .filter(|s| s.overlaps(start, end))
                .cloned()
                .collect(),
        ))
    }

    async fn find_overlapping_for_client(
        &self,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> Result<Vec<Session>, SchedulingError> {
        let guard = self.sessions.read().await;
        Ok(sorted_by_start(
            guard
                .values()
                .filter(|s| s.client_id == client_id)
                .filter(|s| Some(s.id) != exclude_session_id)
                .filter(|s| s.overlaps(start, end))
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, SchedulingError> {
        let guard = self.sessions.read().await;
        Ok(sorted_by_start(
            guard
                .values()
                .filter(|s| s.start_time >= start && s.start_time <= end)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Session>, SchedulingError> {
        let guard = self.sessions.read().await;
        Ok(sorted_by_start(
            guard
                .values()
                .filter(|s| s.client_id == client_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_staff(&self, staff_id: Uuid) -> Result<Vec<Session>, SchedulingError> {
        let guard = self.sessions.read().await;
        Ok(sorted_by_start(
            guard
                .values()
                .filter(|s| s.staff_id == Some(staff_id))
                .cloned()
                .collect(),
        ))
    }

    async fn commit_reschedule(
        &self,
        original_id: Uuid,
        replacement: Session,
    ) -> Result<Session, SchedulingError> {
        let mut guard = self.sessions.write().await;

        let original = guard
            .get(&original_id)
            .cloned()
            .ok_or_else(|| SchedulingError::NotFound(format!("Session {}", original_id)))?;

        // Commit-time recheck under the write lock. A booking that landed
        // between the caller's conflict check and this commit loses nothing;
        // the reschedule is the one that backs off.
        let race = guard.values().any(|s| {
            s.id != original_id
                && s.is_active()
                && s.overlaps(replacement.start_time, replacement.end_time)
                && (s.staff_id == replacement.staff_id && replacement.staff_id.is_some()
                    || s.client_id == replacement.client_id)
        });
        if race {
            warn!(
                "Commit-time recheck found a racing booking for session {}",
                original_id
            );
            return Err(SchedulingError::ConcurrencyConflict(format!(
                "Replacement slot for session {} was taken by a concurrent booking",
                original_id
            )));
        }

        let now = Utc::now();
        let mut cancelled = original;
        cancelled.status = SessionStatus::Cancelled;
        cancelled.updated_at = now;
        guard.insert(original_id, cancelled);
        guard.insert(replacement.id, replacement.clone());

        debug!(
            "Rescheduled session {} to replacement {}",
            original_id, replacement.id
        );
        Ok(replacement)
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn list_active_slots(
        &self,
        staff_id: Uuid,
        day_of_week: u8,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, SchedulingError> {
        let guard = self.slots.read().await;
        Ok(guard
            .iter()
            .filter(|slot| slot.staff_id == staff_id && slot.day_of_week == day_of_week)
            .filter(|slot| slot.covers_date(date))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DisruptionEventLog for MemoryStore {
    async fn list_by_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DisruptionEvent>, SchedulingError> {
        let guard = self.events.read().await;
        let mut events: Vec<DisruptionEvent> = guard
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }

    async fn list_by_client(
        &self,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DisruptionEvent>, SchedulingError> {
        let events = self.list_by_range(start, end).await?;
        Ok(events
            .into_iter()
            .filter(|e| e.client_id == Some(client_id))
            .collect())
    }

    async fn list_by_staff(
        &self,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DisruptionEvent>, SchedulingError> {
        let events = self.list_by_range(start, end).await?;
        Ok(events
            .into_iter()
            .filter(|e| e.staff_id == Some(staff_id))
            .collect())
    }

    async fn append(&self, event: DisruptionEvent) -> Result<(), SchedulingError> {
        self.events.write().await.push(event);
        Ok(())
    }
}
