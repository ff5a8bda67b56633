// libs/scheduling-cell/src/services/availability.rs
use chrono::{Datelike, NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_models::SchedulingError;
use shared_store::AvailabilityStore;

/// Read-only view over recurring staff availability.
///
/// Answers "is this staff member nominally available for [start, end) on
/// this date?" No match means unavailable; data-access errors propagate.
pub struct AvailabilityIndex {
    store: Arc<dyn AvailabilityStore>,
}

impl AvailabilityIndex {
    pub fn new(store: Arc<dyn AvailabilityStore>) -> Self {
        Self { store }
    }

    pub async fn is_available(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<bool, SchedulingError> {
        let day_of_week = date.weekday().num_days_from_sunday() as u8;

        let slots = self
            .store
            .list_active_slots(staff_id, day_of_week, date)
            .await?;

        // The store filters by weekday and effective window; the slot still
        // has to fully cover the requested time range.
        let available = slots
            .iter()
            .filter(|slot| slot.covers_date(date))
            .any(|slot| slot.covers_time_range(start_time, end_time));

        debug!(
            "Availability for staff {} on {} {}-{}: {}",
            staff_id, date, start_time, end_time, available
        );

        Ok(available)
    }
}
