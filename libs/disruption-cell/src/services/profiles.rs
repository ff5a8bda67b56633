// libs/disruption-cell/src/services/profiles.rs
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_models::{
    DisruptionEvent, DisruptionType, SchedulingError, Session, SessionStatus,
};
use shared_store::{DisruptionEventLog, SessionStore};

use crate::models::{ClientDisruptionProfile, StaffDisruptionProfile};
use crate::services::analyzer::percentage_of;

const HIGH_DISRUPTION_RATE: f64 = 25.0;
const SLOW_RESCHEDULE_HOURS: f64 = 48.0;
const CONTINUITY_IMPACT_POINTS: f64 = 10.0;
/// Multiplier turning a staff member's caused-disruption rate into a
/// reliability penalty.
const RELIABILITY_PENALTY_FACTOR: f64 = 1.5;

/// Per-client and per-staff views over the disruption stream. Read-only,
/// windowed, and idempotent like the frequency report.
pub struct DisruptionProfileService {
    events: Arc<dyn DisruptionEventLog>,
    sessions: Arc<dyn SessionStore>,
}

impl DisruptionProfileService {
    pub fn new(events: Arc<dyn DisruptionEventLog>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { events, sessions }
    }

    pub async fn client_profile(
        &self,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ClientDisruptionProfile, SchedulingError> {
        validate_window(start, end)?;

        let events = self.events.list_by_client(client_id, start, end).await?;
        let sessions: Vec<Session> = self
            .sessions
            .list_by_client(client_id)
            .await?
            .into_iter()
            .filter(|s| s.start_time >= start && s.start_time <= end)
            .collect();

        let total_sessions = sessions.len();
        let disrupted_sessions = distinct_disrupted_sessions(&events);
        let disruption_rate = percentage_of(disrupted_sessions, total_sessions);
        let most_common_type = most_common_type(&events);
        let average_hours_to_reschedule = self.average_reschedule_hours(&events).await?;
        let continuity_impact = continuity_impact(&sessions);

        let mut recommendations = Vec::new();
        if disruption_rate > HIGH_DISRUPTION_RATE {
            recommendations.push(
                "High disruption rate: review this client's scheduling preferences".to_string(),
            );
        }
        if average_hours_to_reschedule.unwrap_or(0.0) > SLOW_RESCHEDULE_HOURS {
            recommendations.push(
                "Reschedules are slow: widen the search horizon or the staff pool".to_string(),
            );
        }
        if continuity_impact > CONTINUITY_IMPACT_POINTS {
            recommendations.push(
                "Disruptions are eroding the primary pairing: prefer the primary staff member when rescheduling".to_string(),
            );
        }

        debug!(
            "Client {} profile: {}/{} sessions disrupted",
            client_id, disrupted_sessions, total_sessions
        );

        Ok(ClientDisruptionProfile {
            client_id,
            window_start: start,
            window_end: end,
            total_sessions,
            disrupted_sessions,
            disruption_rate,
            most_common_type,
            average_hours_to_reschedule,
            continuity_impact,
            recommendations,
        })
    }

    pub async fn staff_profile(
        &self,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<StaffDisruptionProfile, SchedulingError> {
        validate_window(start, end)?;

        let events = self.events.list_by_staff(staff_id, start, end).await?;
        let total_sessions = self
            .sessions
            .list_by_staff(staff_id)
            .await?
            .into_iter()
            .filter(|s| s.start_time >= start && s.start_time <= end)
            .count();

        let disruptions_caused = events
            .iter()
            .filter(|e| e.event_type == DisruptionType::StaffUnavailable)
            .count();
        let disruptions_affecting = events.len() - disruptions_caused;

        let disruption_rate = percentage_of(distinct_disrupted_sessions(&events), total_sessions);
        let caused_rate = percentage_of(disruptions_caused, total_sessions);
        let reliability_score =
            (100.0 - caused_rate * RELIABILITY_PENALTY_FACTOR).clamp(0.0, 100.0);
        let most_common_type = most_common_type(&events);

        let mut recommendations = Vec::new();
        if caused_rate > HIGH_DISRUPTION_RATE {
            recommendations.push(
                "Frequent unavailability reports: review this staff member's recurring schedule"
                    .to_string(),
            );
        }
        if disruption_rate > HIGH_DISRUPTION_RATE {
            recommendations.push(
                "High disruption exposure: rebalance this staff member's caseload".to_string(),
            );
        }

        Ok(StaffDisruptionProfile {
            staff_id,
            window_start: start,
            window_end: end,
            total_sessions,
            disruptions_caused,
            disruptions_affecting,
            disruption_rate,
            reliability_score,
            most_common_type,
            recommendations,
        })
    }

    async fn average_reschedule_hours(
        &self,
        events: &[DisruptionEvent],
    ) -> Result<Option<f64>, SchedulingError> {
        let mut delays = Vec::new();
        for event in events
            .iter()
            .filter(|e| e.event_type == DisruptionType::SessionRescheduled)
        {
            let Some(replacement_id) = event.replacement_session_id else {
                continue;
            };
            if let Some(replacement) = self.sessions.get(replacement_id).await? {
                let hours = (replacement.created_at - event.timestamp).num_minutes() as f64 / 60.0;
                delays.push(hours.max(0.0));
            }
        }
        if delays.is_empty() {
            Ok(None)
        } else {
            Ok(Some(delays.iter().sum::<f64>() / delays.len() as f64))
        }
    }
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), SchedulingError> {
    if end <= start {
        return Err(SchedulingError::Validation(
            "Profile window end must be after its start".to_string(),
        ));
    }
    Ok(())
}

fn distinct_disrupted_sessions(events: &[DisruptionEvent]) -> usize {
    let with_session: HashSet<Uuid> = events.iter().filter_map(|e| e.session_id).collect();
    let without_session = events.iter().filter(|e| e.session_id.is_none()).count();
    with_session.len() + without_session
}

fn most_common_type(events: &[DisruptionEvent]) -> Option<DisruptionType> {
    let mut counts: HashMap<DisruptionType, usize> = HashMap::new();
    for event in events {
        *counts.entry(event.event_type).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| b.0.to_string().cmp(&a.0.to_string()))
        })
        .map(|(event_type, _)| event_type)
}

/// How many percentage points of primary-staff share the client lost to
/// cancelled sessions: compares the share the primary staff member actually
/// held against the share they would have held had the cancelled sessions
/// gone ahead.
fn continuity_impact(sessions: &[Session]) -> f64 {
    let countable: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.counts_for_continuity() && s.staff_id.is_some())
        .collect();
    if countable.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for session in &countable {
        if let Some(staff_id) = session.staff_id {
            *counts.entry(staff_id).or_default() += 1;
        }
    }
    let (primary_staff, primary_count) = match counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    {
        Some(entry) => entry,
        None => return 0.0,
    };

    let cancelled: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Cancelled && s.staff_id.is_some())
        .collect();
    let cancelled_with_primary = cancelled
        .iter()
        .filter(|s| s.staff_id == Some(primary_staff))
        .count();

    let actual_share = primary_count as f64 / countable.len() as f64;
    let hypothetical_share = (primary_count + cancelled_with_primary) as f64
        / (countable.len() + cancelled.len()) as f64;

    ((hypothetical_share - actual_share) * 100.0).max(0.0)
}
