// libs/scheduling-cell/src/services/continuity.rs
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{SchedulingError, Session, TrendDirection};
use shared_store::SessionStore;

use crate::models::{ContinuityScore, PairingFrequency};

/// Weight of the overall pairing share in the continuity score.
const SHARE_WEIGHT: f64 = 0.7;
/// Weight of the trailing-window share.
const RECENCY_WEIGHT: f64 = 0.3;

/// Scores how consistently a client has been paired with each staff member.
///
/// Pure aggregation over committed history as of a reference instant;
/// re-running with the same inputs always produces the same output.
pub struct ContinuityScoringService {
    sessions: Arc<dyn SessionStore>,
    config: SchedulingConfig,
}

impl ContinuityScoringService {
    pub fn new(sessions: Arc<dyn SessionStore>, config: SchedulingConfig) -> Self {
        Self { sessions, config }
    }

    /// One entry per staff member who has ever served the client, ordered by
    /// score descending. The top entry is flagged as the primary pairing.
    pub async fn get_scores(
        &self,
        client_id: Uuid,
        reference_date: DateTime<Utc>,
    ) -> Result<Vec<ContinuityScore>, SchedulingError> {
        let history = self.client_history(client_id, reference_date).await?;
        if history.is_empty() {
            debug!("No countable session history for client {}", client_id);
            return Ok(vec![]);
        }

        let recency_cutoff = reference_date - Duration::days(self.config.recency_window_days);
        let total = history.len();
        let recent_total = history
            .iter()
            .filter(|s| s.start_time > recency_cutoff)
            .count();

        // Trend halves span from the earliest countable session up to the
        // reference instant. The sort above makes the split deterministic.
        let earliest = history[0].start_time;
        let midpoint = earliest + (reference_date - earliest) / 2;
        let earlier_total = history.iter().filter(|s| s.start_time < midpoint).count();
        let later_total = total - earlier_total;

        // BTreeMap keeps staff iteration order stable across runs.
        let mut per_staff: BTreeMap<Uuid, Vec<&Session>> = BTreeMap::new();
        for session in &history {
            if let Some(staff_id) = session.staff_id {
                per_staff.entry(staff_id).or_default().push(session);
            }
        }

        let mut scores: Vec<ContinuityScore> = per_staff
            .into_iter()
            .map(|(staff_id, sessions)| {
                let count = sessions.len();
                let recent_count = sessions
                    .iter()
                    .filter(|s| s.start_time > recency_cutoff)
                    .count();

                let share = count as f64 / total as f64;
                let recent_share = if recent_total > 0 {
                    recent_count as f64 / recent_total as f64
                } else {
                    // No sessions in the trailing window for anyone; fall
                    // back to the overall share rather than zeroing the bonus.
                    share
                };

                let score =
                    ((SHARE_WEIGHT * share + RECENCY_WEIGHT * recent_share) * 100.0).clamp(0.0, 100.0);

                let earlier_count = sessions.iter().filter(|s| s.start_time < midpoint).count();
                let later_count = count - earlier_count;
                let earlier_share = if earlier_total > 0 {
                    earlier_count as f64 / earlier_total as f64
                } else {
                    0.0
                };
                let later_share = if later_total > 0 {
                    later_count as f64 / later_total as f64
                } else {
                    0.0
                };
                let trend = TrendDirection::from_halves(
                    earlier_share,
                    later_share,
                    self.config.trend_threshold,
                );

                ContinuityScore {
                    staff_id,
                    client_id,
                    score,
                    total_sessions: count,
                    recent_sessions: recent_count,
                    last_session_date: sessions.iter().map(|s| s.start_time).max(),
                    trend,
                    is_primary: false,
                }
            })
            .collect();

        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.staff_id.cmp(&b.staff_id))
        });
        if let Some(first) = scores.first_mut() {
            first.is_primary = true;
        }

        debug!(
            "Computed {} continuity score(s) for client {}",
            scores.len(),
            client_id
        );
        Ok(scores)
    }

    /// Percentage of the client's sessions in [start, end] held with each
    /// staff member, plus average sessions per week over the window.
    pub async fn compute_pairing_frequencies(
        &self,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PairingFrequency>, SchedulingError> {
        if end < start {
            return Err(SchedulingError::Validation(
                "Window end must not precede window start".to_string(),
            ));
        }

        let history: Vec<Session> = self
            .sessions
            .list_by_client(client_id)
            .await?
            .into_iter()
            .filter(|s| s.counts_for_continuity() && s.staff_id.is_some())
            .filter(|s| s.start_time >= start && s.start_time <= end)
            .collect();

        let total = history.len();
        if total == 0 {
            return Ok(vec![]);
        }

        let weeks = ((end - start).num_days().max(1)) as f64 / 7.0;

        let mut counts: BTreeMap<Uuid, usize> = BTreeMap::new();
        for session in &history {
            if let Some(staff_id) = session.staff_id {
                *counts.entry(staff_id).or_default() += 1;
            }
        }

        let mut frequencies: Vec<PairingFrequency> = counts
            .into_iter()
            .map(|(staff_id, count)| PairingFrequency {
                staff_id,
                session_count: count,
                percentage: count as f64 / total as f64 * 100.0,
                average_sessions_per_week: count as f64 / weeks,
            })
            .collect();

        frequencies.sort_by(|a, b| {
            b.session_count
                .cmp(&a.session_count)
                .then_with(|| a.staff_id.cmp(&b.staff_id))
        });
        Ok(frequencies)
    }

    /// Countable history as of the reference instant, sorted by start time so
    /// the result never depends on store iteration order.
    async fn client_history(
        &self,
        client_id: Uuid,
        reference_date: DateTime<Utc>,
    ) -> Result<Vec<Session>, SchedulingError> {
        let mut history: Vec<Session> = self
            .sessions
            .list_by_client(client_id)
            .await?
            .into_iter()
            .filter(|s| s.counts_for_continuity() && s.staff_id.is_some())
            .filter(|s| s.start_time <= reference_date)
            .collect();
        history.sort_by_key(|s| (s.start_time, s.id));
        Ok(history)
    }
}
