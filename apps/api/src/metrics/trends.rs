use serde::{Deserialize, Serialize};

use crate::models::checkin::{CheckIn, Mood};

/// One stress/productivity sample, labelled by day ("Mar 21").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub stress_level: i32,
    pub productivity_level: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodDistribution {
    pub happy: usize,
    pub neutral: usize,
    pub sad: usize,
}

/// Produces one point per check-in, preserving input order. Dates are labelled in UTC.
pub fn trend_series(records: &[CheckIn]) -> Vec<TrendPoint> {
    records
        .iter()
        .map(|r| TrendPoint {
            date: r.created_at.format("%b %-d").to_string(),
            stress_level: r.stress_level,
            productivity_level: r.productivity_level,
        })
        .collect()
}

/// Counts check-ins per mood. Unrecognised labels are not counted.
pub fn mood_distribution(records: &[CheckIn]) -> MoodDistribution {
    records
        .iter()
        .filter_map(|r| r.mood.parse::<Mood>().ok())
        .fold(MoodDistribution::default(), |mut acc, mood| {
            match mood {
                Mood::Happy => acc.happy += 1,
                Mood::Neutral => acc.neutral += 1,
                Mood::Sad => acc.sad += 1,
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checkin::sample_check_in;

    #[test]
    fn test_trend_series_labels_days_in_order() {
        let records = vec![
            sample_check_in(4, "happy", 2, 9),
            sample_check_in(21, "sad", 8, 3),
        ];
        let series = trend_series(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, "Mar 4");
        assert_eq!(series[1].date, "Mar 21");
        assert_eq!(series[1].stress_level, 8);
        assert_eq!(series[1].productivity_level, 3);
    }

    #[test]
    fn test_mood_distribution_skips_unknown_labels() {
        let records = vec![
            sample_check_in(1, "happy", 2, 9),
            sample_check_in(2, "Happy", 2, 9),
            sample_check_in(3, "sad", 8, 3),
            sample_check_in(4, "bored", 5, 5),
        ];
        assert_eq!(
            mood_distribution(&records),
            MoodDistribution {
                happy: 2,
                neutral: 0,
                sad: 1
            }
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(trend_series(&[]).is_empty());
        assert_eq!(mood_distribution(&[]), MoodDistribution::default());
    }
}
