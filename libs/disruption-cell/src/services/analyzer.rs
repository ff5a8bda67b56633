// libs/disruption-cell/src/services/analyzer.rs
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{
    DisruptionEvent, DisruptionType, SchedulingError, SessionStatus, TrendDirection,
};
use shared_store::{DisruptionEventLog, SessionStore};

use crate::models::{
    DisruptionFrequencyReport, ImpactAnalysis, ReasonFrequency, TypeBreakdown,
};

const TOP_REASONS: usize = 5;
/// Delay at which the reschedule-delay component of the impact score
/// saturates, in hours.
const DELAY_SATURATION_HOURS: f64 = 72.0;

/// Aggregates the immutable disruption event stream into frequency and
/// impact reports. Read-only over both collaborators; a fixed window and
/// fixed data always produce the same report.
pub struct DisruptionAnalysisService {
    events: Arc<dyn DisruptionEventLog>,
    sessions: Arc<dyn SessionStore>,
    config: SchedulingConfig,
}

impl DisruptionAnalysisService {
    pub fn new(
        events: Arc<dyn DisruptionEventLog>,
        sessions: Arc<dyn SessionStore>,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            events,
            sessions,
            config,
        }
    }

    pub async fn generate_frequency_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DisruptionFrequencyReport, SchedulingError> {
        if end <= start {
            return Err(SchedulingError::Validation(
                "Report window end must be after its start".to_string(),
            ));
        }

        let events = self.events.list_by_range(start, end).await?;
        let sessions_in_window = self.sessions.list_by_date_range(start, end).await?;
        let total = events.len();
        let total_sessions = sessions_in_window.len();

        debug!(
            "Frequency report over {} event(s) / {} session(s)",
            total, total_sessions
        );

        let disruption_rate = if total_sessions == 0 {
            0.0
        } else {
            total as f64 / total_sessions as f64 * 100.0
        };

        let weeks = ((end - start).num_days().max(1)) as f64 / 7.0;
        let average_per_week = total as f64 / weeks;

        // Breakdown by type
        let mut type_counts: HashMap<DisruptionType, usize> = HashMap::new();
        for event in &events {
            *type_counts.entry(event.event_type).or_default() += 1;
        }
        let mut breakdown_by_type: Vec<TypeBreakdown> = type_counts
            .into_iter()
            .map(|(event_type, count)| TypeBreakdown {
                event_type,
                count,
                percentage: percentage_of(count, total),
            })
            .collect();
        breakdown_by_type.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.event_type.to_string().cmp(&b.event_type.to_string()))
        });

        // Stated reasons
        let mut reason_counts: HashMap<String, usize> = HashMap::new();
        for event in &events {
            if let Some(reason) = &event.reason {
                *reason_counts.entry(reason.clone()).or_default() += 1;
            }
        }
        let mut top_reasons: Vec<ReasonFrequency> = reason_counts
            .into_iter()
            .map(|(reason, count)| ReasonFrequency {
                percentage: percentage_of(count, total),
                reason,
                count,
            })
            .collect();
        top_reasons.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
        top_reasons.truncate(TOP_REASONS);
        let most_common_reason = top_reasons.first().map(|r| r.reason.clone());

        // First half vs second half of the window, same rule as continuity
        // trends. More disruptions later means things are getting worse.
        let midpoint = start + (end - start) / 2;
        let earlier = events.iter().filter(|e| e.timestamp < midpoint).count();
        let later = total - earlier;
        let trend = TrendDirection::from_halves_inverted(
            earlier as f64,
            later as f64,
            self.config.trend_threshold * total as f64,
        );

        // When disruptions happen
        let mut hour_of_day_histogram = vec![0usize; 24];
        let mut day_of_week_histogram = vec![0usize; 7];
        for event in &events {
            hour_of_day_histogram[event.timestamp.hour() as usize] += 1;
            day_of_week_histogram
                [event.timestamp.weekday().num_days_from_sunday() as usize] += 1;
        }

        let impact = self.analyze_impact(&events, disruption_rate).await?;

        Ok(DisruptionFrequencyReport {
            window_start: start,
            window_end: end,
            total_disruptions: total,
            breakdown_by_type,
            disruption_rate,
            average_per_week,
            most_common_reason,
            trend,
            top_reasons,
            hour_of_day_histogram,
            day_of_week_histogram,
            impact,
        })
    }

    async fn analyze_impact(
        &self,
        events: &[DisruptionEvent],
        disruption_rate: f64,
    ) -> Result<ImpactAnalysis, SchedulingError> {
        let affected_sessions: HashSet<Uuid> =
            events.iter().filter_map(|e| e.session_id).collect();
        let affected_clients: HashSet<Uuid> = events.iter().filter_map(|e| e.client_id).collect();
        let affected_staff: HashSet<Uuid> = events.iter().filter_map(|e| e.staff_id).collect();

        // Follow reschedule events to their replacement sessions to measure
        // turnaround and eventual completion.
        let mut completed_replacements = 0usize;
        let mut delays_hours: Vec<f64> = Vec::new();
        for event in events
            .iter()
            .filter(|e| e.event_type == DisruptionType::SessionRescheduled)
        {
            let Some(replacement_id) = event.replacement_session_id else {
                continue;
            };
            if let Some(replacement) = self.sessions.get(replacement_id).await? {
                let delay = (replacement.created_at - event.timestamp).num_minutes() as f64 / 60.0;
                delays_hours.push(delay.max(0.0));
                if replacement.status == SessionStatus::Completed {
                    completed_replacements += 1;
                }
            }
        }

        let reschedule_success_rate = percentage_of(completed_replacements, affected_sessions.len());
        let average_hours_to_reschedule = if delays_hours.is_empty() {
            None
        } else {
            Some(delays_hours.iter().sum::<f64>() / delays_hours.len() as f64)
        };

        let delay_component = average_hours_to_reschedule
            .map(|h| (h / DELAY_SATURATION_HOURS).min(1.0) * 100.0)
            .unwrap_or(0.0);
        let client_impact_score =
            (disruption_rate * 0.7 + delay_component * 0.3).clamp(0.0, 100.0);

        Ok(ImpactAnalysis {
            affected_sessions: affected_sessions.len(),
            affected_clients: affected_clients.len(),
            affected_staff: affected_staff.len(),
            reschedule_success_rate,
            average_hours_to_reschedule,
            client_impact_score,
        })
    }
}

pub(crate) fn percentage_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
