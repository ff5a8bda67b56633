// libs/shared/models/src/availability.rs
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring weekly availability window for one staff member.
///
/// A slot is authoritative for a date only if the date falls inside the
/// effective window and the slot is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub staff_id: Uuid,
    /// 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub effective_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl AvailabilitySlot {
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        if !self.is_active || self.effective_date > date {
            return false;
        }
        match self.end_date {
            Some(end) => date <= end,
            None => true,
        }
    }

    /// Whether the slot's time-of-day window fully covers [start, end).
    pub fn covers_time_range(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time <= start && self.end_time >= end
    }

    pub fn matches_weekday(&self, date: NaiveDate) -> bool {
        self.day_of_week == date.weekday().num_days_from_sunday() as u8
    }
}
