use serde::{Deserialize, Serialize};

use crate::models::checkin::{CheckIn, Mood};

/// Aggregate view over a set of check-ins. Derived on every fetch, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMetrics {
    /// "Happy", "Neutral", "Sad", or "N/A" when there is nothing to average.
    pub average_mood: String,
    /// Mean stress level with one fractional digit.
    pub average_stress: String,
    pub average_productivity: String,
    pub total_check_ins: usize,
}

impl TeamMetrics {
    fn empty() -> Self {
        Self {
            average_mood: "N/A".to_string(),
            average_stress: "0.0".to_string(),
            average_productivity: "0.0".to_string(),
            total_check_ins: 0,
        }
    }
}

/// Reduces check-ins into averaged mood/stress/productivity.
/// Empty input is a defined case, not an error.
pub fn compute_team_metrics(records: &[CheckIn]) -> TeamMetrics {
    if records.is_empty() {
        return TeamMetrics::empty();
    }

    let count = records.len() as f64;
    let mood_sum: f64 = records.iter().map(|r| f64::from(Mood::score(&r.mood))).sum();
    let stress_sum: f64 = records.iter().map(|r| f64::from(r.stress_level)).sum();
    let productivity_sum: f64 = records
        .iter()
        .map(|r| f64::from(r.productivity_level))
        .sum();

    TeamMetrics {
        average_mood: mood_label(mood_sum / count).to_string(),
        average_stress: format!("{:.1}", stress_sum / count),
        average_productivity: format!("{:.1}", productivity_sum / count),
        total_check_ins: records.len(),
    }
}

/// Maps a mean mood value back onto a label.
pub fn mood_label(mean: f64) -> &'static str {
    match mean {
        m if m >= 2.5 => "Happy",
        m if m >= 1.5 => "Neutral",
        _ => "Sad",
    }
}
