// libs/shared/models/src/disruption.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An immutable fact drawn from the audit log: something removed or altered
/// a previously scheduled session. The engine only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionEvent {
    pub id: Uuid,
    pub event_type: DisruptionType,
    pub session_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    /// For reschedule events, the session that replaced the disrupted one.
    pub replacement_session_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionType {
    SessionCancelled,
    SessionRescheduled,
    StaffUnavailable,
    ClientNoShow,
}

impl fmt::Display for DisruptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisruptionType::SessionCancelled => write!(f, "session_cancelled"),
            DisruptionType::SessionRescheduled => write!(f, "session_rescheduled"),
            DisruptionType::StaffUnavailable => write!(f, "staff_unavailable"),
            DisruptionType::ClientNoShow => write!(f, "client_no_show"),
        }
    }
}
