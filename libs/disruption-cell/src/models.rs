// libs/disruption-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{DisruptionType, TrendDirection};

// ==============================================================================
// FREQUENCY REPORT MODELS
// ==============================================================================

/// Aggregated view of the disruption event stream over a date window.
/// Pure function of its inputs; safe to regenerate any number of times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionFrequencyReport {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_disruptions: usize,
    pub breakdown_by_type: Vec<TypeBreakdown>,
    /// Disruptions as a percentage of sessions scheduled in the window.
    pub disruption_rate: f64,
    pub average_per_week: f64,
    pub most_common_reason: Option<String>,
    pub trend: TrendDirection,
    pub top_reasons: Vec<ReasonFrequency>,
    /// Index 0 = midnight UTC.
    pub hour_of_day_histogram: Vec<usize>,
    /// Index 0 = Sunday.
    pub day_of_week_histogram: Vec<usize>,
    pub impact: ImpactAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub event_type: DisruptionType,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonFrequency {
    pub reason: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub affected_sessions: usize,
    pub affected_clients: usize,
    pub affected_staff: usize,
    /// Disrupted sessions whose replacement went on to complete, as a
    /// percentage of all disrupted sessions.
    pub reschedule_success_rate: f64,
    /// Hours between a disruption and the creation of its replacement.
    pub average_hours_to_reschedule: Option<f64>,
    /// Composite of disruption rate and reschedule delay, bounded 0-100.
    pub client_impact_score: f64,
}

// ==============================================================================
// PER-ENTITY PROFILE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDisruptionProfile {
    pub client_id: Uuid,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_sessions: usize,
    pub disrupted_sessions: usize,
    pub disruption_rate: f64,
    pub most_common_type: Option<DisruptionType>,
    pub average_hours_to_reschedule: Option<f64>,
    /// Percentage points of primary-staff share the disruptions cost this
    /// client over the window.
    pub continuity_impact: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffDisruptionProfile {
    pub staff_id: Uuid,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_sessions: usize,
    /// Disruptions this staff member caused (unavailability reports).
    pub disruptions_caused: usize,
    /// Disruptions that hit this staff member's sessions from the outside.
    pub disruptions_affecting: usize,
    pub disruption_rate: f64,
    /// 100 minus a penalty derived from the caused-disruption rate.
    pub reliability_score: f64,
    pub most_common_type: Option<DisruptionType>,
    pub recommendations: Vec<String>,
}
