// Shared fixtures for disruption-cell tests.
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use shared_models::{DisruptionEvent, DisruptionType, Session, SessionStatus};
use shared_store::MemoryStore;

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// 2025-03-03 is a Monday; reports in these tests use a 30-day window
/// starting here.
pub fn window_start() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2025, 3, 3)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn window_end() -> DateTime<Utc> {
    window_start() + Duration::days(30)
}

pub fn session_at(
    client_id: Uuid,
    staff_id: Uuid,
    start: DateTime<Utc>,
    status: SessionStatus,
) -> Session {
    Session {
        id: Uuid::new_v4(),
        client_id,
        staff_id: Some(staff_id),
        start_time: start,
        end_time: start + Duration::hours(3),
        status,
        location: None,
        notes: None,
        created_at: start - Duration::days(3),
        updated_at: start - Duration::days(3),
    }
}

pub fn event(
    event_type: DisruptionType,
    client_id: Uuid,
    staff_id: Uuid,
    timestamp: DateTime<Utc>,
    reason: &str,
) -> DisruptionEvent {
    DisruptionEvent {
        id: Uuid::new_v4(),
        event_type,
        session_id: Some(Uuid::new_v4()),
        client_id: Some(client_id),
        staff_id: Some(staff_id),
        replacement_session_id: None,
        timestamp,
        reason: Some(reason.to_string()),
    }
}
