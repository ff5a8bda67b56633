use chrono::{NaiveTime, Weekday};
use std::env;
use tracing::warn;

/// Deployment-level scheduling rules.
///
/// The fixed session length and the business-weekday rule are configuration
/// rather than hard-coded invariants; the defaults reflect standard clinic
/// operations (3-hour sessions, Monday through Friday, 08:00-18:00).
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    pub session_duration_minutes: i64,
    pub business_day_start: NaiveTime,
    pub business_day_end: NaiveTime,
    pub business_weekdays: Vec<Weekday>,
    /// Trailing window for the continuity recency bonus, in days.
    pub recency_window_days: i64,
    /// How far ahead the rescheduling search looks, in business days.
    pub reschedule_horizon_days: i64,
    pub max_rescheduling_candidates: usize,
    /// Share delta (0.0-1.0) below which a trend is classified as stable.
    pub trend_threshold: f64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            session_duration_minutes: 180,
            business_day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            business_day_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            business_weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            recency_window_days: 30,
            reschedule_horizon_days: 14,
            max_rescheduling_candidates: 10,
            trend_threshold: 0.05,
        }
    }
}

impl SchedulingConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Self {
            session_duration_minutes: parse_env(
                "SCHEDULING_SESSION_DURATION_MINUTES",
                defaults.session_duration_minutes,
            ),
            business_day_start: parse_time_env(
                "SCHEDULING_BUSINESS_DAY_START",
                defaults.business_day_start,
            ),
            business_day_end: parse_time_env(
                "SCHEDULING_BUSINESS_DAY_END",
                defaults.business_day_end,
            ),
            business_weekdays: defaults.business_weekdays,
            recency_window_days: parse_env(
                "SCHEDULING_RECENCY_WINDOW_DAYS",
                defaults.recency_window_days,
            ),
            reschedule_horizon_days: parse_env(
                "SCHEDULING_RESCHEDULE_HORIZON_DAYS",
                defaults.reschedule_horizon_days,
            ),
            max_rescheduling_candidates: parse_env(
                "SCHEDULING_MAX_RESCHEDULING_CANDIDATES",
                defaults.max_rescheduling_candidates,
            ),
            trend_threshold: parse_env("SCHEDULING_TREND_THRESHOLD", defaults.trend_threshold),
        }
    }

    pub fn is_business_weekday(&self, weekday: Weekday) -> bool {
        self.business_weekdays.contains(&weekday)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value, using default", key);
            default
        }),
        Err(_) => default,
    }
}

fn parse_time_env(key: &str, default: NaiveTime) -> NaiveTime {
    match env::var(key) {
        Ok(raw) => NaiveTime::parse_from_str(&raw, "%H:%M").unwrap_or_else(|_| {
            warn!("{} is not a valid HH:MM time, using default", key);
            default
        }),
        Err(_) => default,
    }
}
