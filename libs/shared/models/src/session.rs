// libs/shared/models/src/session.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A scheduled therapy session between a client and a staff member (RBT).
///
/// Sessions are never physically deleted; cancellation is a status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub client_id: Uuid,
    /// None until a staff member has been assigned by the booking workflow.
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Half-open interval overlap test: [self.start, self.end) vs [start, end).
    /// Adjacent sessions (self.end == start) do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// A session counts against the calendar unless it has been cancelled.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, SessionStatus::Cancelled)
    }

    /// Sessions that actually happened or are still expected to happen.
    /// Used by continuity scoring; no-shows do not build pairing history.
    pub fn counts_for_continuity(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Scheduled | SessionStatus::Confirmed | SessionStatus::Completed
        )
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Scheduled => write!(f, "scheduled"),
            SessionStatus::Confirmed => write!(f, "confirmed"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Cancelled => write!(f, "cancelled"),
            SessionStatus::NoShow => write!(f, "no_show"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn session(start_hour: u32, end_hour: u32) -> Session {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, start_hour, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 3, end_hour, 0, 0).unwrap();
        Session {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            staff_id: Some(Uuid::new_v4()),
            start_time: start,
            end_time: end,
            status: SessionStatus::Scheduled,
            location: None,
            notes: None,
            created_at: start - Duration::days(1),
            updated_at: start - Duration::days(1),
        }
    }

    #[test]
    fn overlap_is_half_open() {
        let s = session(10, 13);
        assert!(s.overlaps(
            Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 3, 15, 0, 0).unwrap(),
        ));
        // Adjacent intervals share an endpoint but do not overlap.
        assert!(!s.overlaps(
            Utc.with_ymd_and_hms(2025, 3, 3, 13, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 3, 16, 0, 0).unwrap(),
        ));
    }

    #[test]
    fn cancelled_sessions_are_inactive_and_build_no_history() {
        let mut s = session(10, 13);
        s.status = SessionStatus::Cancelled;
        assert!(!s.is_active());
        assert!(!s.counts_for_continuity());

        s.status = SessionStatus::NoShow;
        assert!(s.is_active());
        assert!(!s.counts_for_continuity());
    }

    #[test]
    fn duration_is_measured_in_minutes() {
        assert_eq!(session(10, 13).duration_minutes(), 180);
    }
}
