// libs/scheduling-cell/src/services/conflict.rs
use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::SchedulingError;
use shared_store::{AvailabilityStore, SessionStore};

use crate::models::Conflict;
use crate::services::availability::AvailabilityIndex;

/// Detects why a candidate booking is invalid: staff or client double
/// booking, staff unavailability, or a business-hours violation.
///
/// Pure read path. "No conflicts found" is a point-in-time statement, not a
/// reservation; the persistence layer re-validates at commit time.
pub struct ConflictDetectionService {
    sessions: Arc<dyn SessionStore>,
    availability: AvailabilityIndex,
    config: SchedulingConfig,
}

impl ConflictDetectionService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        availability_store: Arc<dyn AvailabilityStore>,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            sessions,
            availability: AvailabilityIndex::new(availability_store),
            config,
        }
    }

    /// Run all four checks unconditionally and concatenate their results.
    /// An empty list means the candidate is bookable.
    ///
    /// `exclude_session_id` lets an existing session be re-validated without
    /// conflicting with itself.
    pub async fn check_conflicts(
        &self,
        client_id: Uuid,
        staff_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> Result<Vec<Conflict>, SchedulingError> {
        if end_time <= start_time {
            return Err(SchedulingError::Validation(
                "End time must be after start time".to_string(),
            ));
        }

        debug!(
            "Checking conflicts for client {} / staff {} from {} to {}",
            client_id, staff_id, start_time, end_time
        );

        let mut conflicts = Vec::new();

        // 1. Staff double-booking
        let staff_overlaps = self
            .sessions
            .find_overlapping_for_staff(staff_id, start_time, end_time, exclude_session_id)
            .await?;
        for session in staff_overlaps.iter().filter(|s| s.is_active()) {
            conflicts.push(Conflict::StaffDoubleBooked {
                conflicting_session_id: session.id,
                description: format!(
                    "Staff member {} already has a session from {} to {}",
                    staff_id, session.start_time, session.end_time
                ),
            });
        }

        // 2. Client double-booking
        let client_overlaps = self
            .sessions
            .find_overlapping_for_client(client_id, start_time, end_time, exclude_session_id)
            .await?;
        for session in client_overlaps.iter().filter(|s| s.is_active()) {
            conflicts.push(Conflict::ClientDoubleBooked {
                conflicting_session_id: session.id,
                description: format!(
                    "Client {} already has a session from {} to {}",
                    client_id, session.start_time, session.end_time
                ),
            });
        }

        // 3. Staff availability
        let available = self
            .availability
            .is_available(
                staff_id,
                start_time.date_naive(),
                start_time.time(),
                end_time.time(),
            )
            .await?;
        if !available {
            conflicts.push(Conflict::StaffUnavailable {
                description: format!(
                    "Staff member {} has no availability covering {} to {}",
                    staff_id,
                    start_time.time(),
                    end_time.time()
                ),
            });
        }

        // 4. Business-weekday and operating-window rule
        if !self.within_business_hours(start_time, end_time) {
            conflicts.push(Conflict::OutsideBusinessHours {
                description: format!(
                    "Sessions run {} to {} on business weekdays only",
                    self.config.business_day_start, self.config.business_day_end
                ),
            });
        }

        if !conflicts.is_empty() {
            warn!(
                "Found {} conflict(s) for client {} / staff {}",
                conflicts.len(),
                client_id,
                staff_id
            );
        }

        Ok(conflicts)
    }

    /// Creation-time invariants for a new booking: well-formed interval, the
    /// configured fixed duration, a business weekday, and not in the past.
    pub fn validate_booking(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), SchedulingError> {
        if end_time <= start_time {
            return Err(SchedulingError::Validation(
                "End time must be after start time".to_string(),
            ));
        }

        let duration = (end_time - start_time).num_minutes();
        if duration != self.config.session_duration_minutes {
            return Err(SchedulingError::Validation(format!(
                "Sessions must be exactly {} minutes, got {}",
                self.config.session_duration_minutes, duration
            )));
        }

        if start_time < now {
            return Err(SchedulingError::Validation(
                "Sessions cannot be scheduled in the past".to_string(),
            ));
        }

        if !self.config.is_business_weekday(start_time.weekday()) {
            return Err(SchedulingError::Validation(
                "Sessions must start on a business weekday".to_string(),
            ));
        }

        Ok(())
    }

    fn within_business_hours(&self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> bool {
        self.config.is_business_weekday(start_time.weekday())
            && start_time.time() >= self.config.business_day_start
            && end_time.time() <= self.config.business_day_end
            && start_time.date_naive() == end_time.date_naive()
    }
}
