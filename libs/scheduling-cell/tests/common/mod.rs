// Shared fixtures for scheduling-cell tests.
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{AvailabilitySlot, Session, SessionStatus};
use shared_store::MemoryStore;

pub fn config() -> SchedulingConfig {
    SchedulingConfig::default()
}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// 2025-03-03 is a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

pub fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    date.and_hms_opt(hour, 0, 0).unwrap().and_utc()
}

/// A three-hour session starting at the given instant.
pub fn session(
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
        location: Some("clinic".to_string()),
        notes: None,
        created_at: start - Duration::days(7),
        updated_at: start - Duration::days(7),
    }
}

/// Active Monday-Friday 08:00-18:00 slots, effective since 2020, no expiry.
pub fn weekday_slots(staff_id: Uuid) -> Vec<AvailabilitySlot> {
    (1..=5)
        .map(|day_of_week| AvailabilitySlot {
            id: Uuid::new_v4(),
            staff_id,
            day_of_week,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            effective_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: None,
            is_active: true,
        })
        .collect()
}
