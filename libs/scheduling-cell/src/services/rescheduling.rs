// libs/scheduling-cell/src/services/rescheduling.rs
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{SchedulingError, Session, SessionStatus};
use shared_store::{AvailabilityStore, SessionStore};

use crate::models::{ReschedulingCandidate, ReschedulingOptions};
use crate::services::conflict::ConflictDetectionService;
use crate::services::continuity::ContinuityScoringService;

/// Proposes and commits replacement slots for a disrupted session.
///
/// Greedy multi-criteria ranking, not a solver: original staff member first,
/// then continuity score descending, then soonest start. The service never
/// auto-commits; choosing a candidate is a separate explicit step.
pub struct ReschedulingService {
    sessions: Arc<dyn SessionStore>,
    conflict_service: ConflictDetectionService,
    continuity_service: ContinuityScoringService,
    config: SchedulingConfig,
}

impl ReschedulingService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        availability: Arc<dyn AvailabilityStore>,
        config: SchedulingConfig,
    ) -> Self {
        let conflict_service =
            ConflictDetectionService::new(Arc::clone(&sessions), availability, config.clone());
        let continuity_service =
            ContinuityScoringService::new(Arc::clone(&sessions), config.clone());
        Self {
            sessions,
            conflict_service,
            continuity_service,
            config,
        }
    }

    /// Generate and rank conflict-free replacement slots within the horizon.
    ///
    /// Exhausting the horizon is a terminal, non-error outcome: the session
    /// needs a human scheduler.
    pub async fn find_rescheduling_options(
        &self,
        session_id: Uuid,
    ) -> Result<ReschedulingOptions, SchedulingError> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("Session {}", session_id)))?;

        let now = Utc::now();
        info!(
            "Generating rescheduling candidates for session {} (client {})",
            session_id, session.client_id
        );

        let scores = self
            .continuity_service
            .get_scores(session.client_id, now)
            .await?;
        let score_by_staff: HashMap<Uuid, f64> =
            scores.iter().map(|s| (s.staff_id, s.score)).collect();

        // Original staff member first, then continuity-ranked staff.
        let mut staff_order: Vec<Uuid> = Vec::new();
        if let Some(original) = session.staff_id {
            staff_order.push(original);
        }
        for score in &scores {
            if !staff_order.contains(&score.staff_id) {
                staff_order.push(score.staff_id);
            }
        }

        if staff_order.is_empty() {
            warn!(
                "Session {} has no assigned staff and no pairing history",
                session_id
            );
            return Ok(ReschedulingOptions::ManualReviewRequired {
                session_id,
                reason: "No staff member to consider: session is unassigned and the client has no pairing history".to_string(),
            });
        }

        let slot_starts = self.candidate_slot_starts(now);
        let mut candidates = Vec::new();

        for staff_id in &staff_order {
            for start_time in &slot_starts {
                let end_time = *start_time + Duration::minutes(self.config.session_duration_minutes);

                let conflicts = self
                    .conflict_service
                    .check_conflicts(
                        session.client_id,
                        *staff_id,
                        *start_time,
                        end_time,
                        Some(session_id),
                    )
                    .await?;

                if conflicts.is_empty() {
                    candidates.push(ReschedulingCandidate {
                        staff_id: *staff_id,
                        start_time: *start_time,
                        end_time,
                        continuity_score: score_by_staff.get(staff_id).copied().unwrap_or(0.0),
                        is_original_staff: session.staff_id == Some(*staff_id),
                    });
                }
            }
        }

        if candidates.is_empty() {
            info!(
                "No conflict-free replacement slot for session {} within {} business days",
                session_id, self.config.reschedule_horizon_days
            );
            return Ok(ReschedulingOptions::ManualReviewRequired {
                session_id,
                reason: format!(
                    "No conflict-free slot within the next {} business days",
                    self.config.reschedule_horizon_days
                ),
            });
        }

        candidates.sort_by(|a, b| {
            b.is_original_staff
                .cmp(&a.is_original_staff)
                .then_with(|| {
                    b.continuity_score
                        .partial_cmp(&a.continuity_score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.start_time.cmp(&b.start_time))
        });
        candidates.truncate(self.config.max_rescheduling_candidates);

        debug!(
            "Ranked {} candidate(s) for session {}",
            candidates.len(),
            session_id
        );
        Ok(ReschedulingOptions::Candidates {
            session_id,
            candidates,
        })
    }

    /// Commit the chosen candidate: re-validate it, then hand the swap to the
    /// store's transactional boundary, which cancels the original and
    /// persists the replacement atomically.
    pub async fn commit_reschedule(
        &self,
        session_id: Uuid,
        candidate: &ReschedulingCandidate,
    ) -> Result<Session, SchedulingError> {
        let original = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("Session {}", session_id)))?;

        if !original.is_active() {
            return Err(SchedulingError::Validation(format!(
                "Session {} is already cancelled",
                session_id
            )));
        }

        let conflicts = self
            .conflict_service
            .check_conflicts(
                original.client_id,
                candidate.staff_id,
                candidate.start_time,
                candidate.end_time,
                Some(session_id),
            )
            .await?;
        if !conflicts.is_empty() {
            warn!(
                "Candidate for session {} is no longer conflict-free ({} conflicts)",
                session_id,
                conflicts.len()
            );
            return Err(SchedulingError::ConcurrencyConflict(format!(
                "Chosen slot for session {} is no longer conflict-free",
                session_id
            )));
        }

        let now = Utc::now();
        let replacement = Session {
            id: Uuid::new_v4(),
            client_id: original.client_id,
            staff_id: Some(candidate.staff_id),
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            status: SessionStatus::Scheduled,
            location: original.location.clone(),
            notes: original.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        let committed = self
            .sessions
            .commit_reschedule(session_id, replacement)
            .await?;
        info!(
            "Session {} rescheduled as {} with staff {}",
            session_id, committed.id, candidate.staff_id
        );
        Ok(committed)
    }

    /// Hourly slot starts inside the operating window across the next
    /// `reschedule_horizon_days` business days, all strictly in the future.
    fn candidate_slot_starts(&self, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let mut starts = Vec::new();
        let mut date: NaiveDate = now.date_naive();
        let mut business_days = 0;

        while business_days < self.config.reschedule_horizon_days {
            if self.config.is_business_weekday(date.weekday()) {
                business_days += 1;
                let mut time = self.config.business_day_start;
                loop {
                    let end = time + Duration::minutes(self.config.session_duration_minutes);
                    if end > self.config.business_day_end
                        || end < time
                    {
                        break;
                    }
                    let start_dt = date.and_time(time).and_utc();
                    if start_dt > now {
                        starts.push(start_dt);
                    }
                    time += Duration::hours(1);
                    if time <= self.config.business_day_start {
                        // Wrapped past midnight; stop scanning this day.
                        break;
                    }
                }
            }
            date = date.succ_opt().unwrap_or(date);
        }

        starts
    }
}
