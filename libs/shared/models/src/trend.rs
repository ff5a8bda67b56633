// libs/shared/models/src/trend.rs
use serde::{Deserialize, Serialize};

/// Half-window trend classification shared by continuity scoring and
/// disruption analytics: the most recent half of a window is compared
/// against the earlier half, with a small threshold absorbing noise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    /// Classify a metric where higher is better (e.g. primary-staff share).
    pub fn from_halves(earlier: f64, recent: f64, threshold: f64) -> Self {
        if recent - earlier > threshold {
            TrendDirection::Improving
        } else if earlier - recent > threshold {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }

    /// Classify a metric where higher is worse (e.g. disruption counts).
    pub fn from_halves_inverted(earlier: f64, recent: f64, threshold: f64) -> Self {
        Self::from_halves(recent, earlier, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_within_the_threshold_are_stable() {
        assert_eq!(TrendDirection::from_halves(0.50, 0.54, 0.05), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_halves(0.50, 0.56, 0.05), TrendDirection::Improving);
        assert_eq!(TrendDirection::from_halves(0.56, 0.50, 0.05), TrendDirection::Declining);
    }

    #[test]
    fn inverted_classification_flips_the_direction() {
        assert_eq!(
            TrendDirection::from_halves_inverted(2.0, 8.0, 1.0),
            TrendDirection::Declining
        );
        assert_eq!(
            TrendDirection::from_halves_inverted(8.0, 2.0, 1.0),
            TrendDirection::Improving
        );
    }
}
