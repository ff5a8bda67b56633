// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::TrendDirection;

// ==============================================================================
// CONFLICT DETECTION MODELS
// ==============================================================================

/// Why a candidate booking is invalid. Transient value, never persisted.
///
/// Closed variant set so that callers handle every kind exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "conflict_type", rename_all = "snake_case")]
pub enum Conflict {
    StaffDoubleBooked {
        conflicting_session_id: Uuid,
        description: String,
    },
    ClientDoubleBooked {
        conflicting_session_id: Uuid,
        description: String,
    },
    StaffUnavailable {
        description: String,
    },
    OutsideBusinessHours {
        description: String,
    },
}

impl Conflict {
    pub fn conflicting_session_id(&self) -> Option<Uuid> {
        match self {
            Conflict::StaffDoubleBooked {
                conflicting_session_id,
                ..
            }
            | Conflict::ClientDoubleBooked {
                conflicting_session_id,
                ..
            } => Some(*conflicting_session_id),
            _ => None,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Conflict::StaffDoubleBooked { description, .. }
            | Conflict::ClientDoubleBooked { description, .. }
            | Conflict::StaffUnavailable { description }
            | Conflict::OutsideBusinessHours { description } => description,
        }
    }
}

// ==============================================================================
// CONTINUITY SCORING MODELS
// ==============================================================================

/// How consistently a client has been paired with one staff member,
/// computed on demand from session history as of a reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinuityScore {
    pub staff_id: Uuid,
    pub client_id: Uuid,
    /// 0-100; weighted blend of overall share and recent share.
    pub score: f64,
    pub total_sessions: usize,
    /// Sessions inside the trailing recency window.
    pub recent_sessions: usize,
    pub last_session_date: Option<DateTime<Utc>>,
    pub trend: TrendDirection,
    /// True for the staff member with the highest score.
    pub is_primary: bool,
}

/// Share of a client's sessions held with one staff member over a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingFrequency {
    pub staff_id: Uuid,
    pub session_count: usize,
    /// Percentage of the client's sessions in the window; sums to 100
    /// across all staff who served the client.
    pub percentage: f64,
    pub average_sessions_per_week: f64,
}

// ==============================================================================
// RESCHEDULING MODELS
// ==============================================================================

/// One conflict-free replacement slot for a disrupted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReschedulingCandidate {
    pub staff_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub continuity_score: f64,
    pub is_original_staff: bool,
}

/// Outcome of a rescheduling search. Exhaustion is a normal result, not an
/// error; the caller surfaces it to a human scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReschedulingOptions {
    Candidates {
        session_id: Uuid,
        candidates: Vec<ReschedulingCandidate>,
    },
    ManualReviewRequired {
        session_id: Uuid,
        reason: String,
    },
}
