use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One stored wellness check-in. Immutable once inserted.
///
/// `mood` stays a plain string: rows written by older clients may carry labels
/// outside [`Mood`], and readers score those as unknown rather than failing.
/// Field order is load-bearing for the content fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CheckIn {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
    pub mood: String,
    pub stress_level: i32,
    pub productivity_level: i32,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
        }
    }

    /// Numeric value used for averaging: happy=3, neutral=2, sad=1.
    pub fn value(&self) -> u8 {
        match self {
            Mood::Happy => 3,
            Mood::Neutral => 2,
            Mood::Sad => 1,
        }
    }

    /// Scores a stored mood label. Unknown labels score 0.
    pub fn score(label: &str) -> u8 {
        label.parse::<Mood>().map(|m| m.value()).unwrap_or(0)
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "neutral" => Ok(Mood::Neutral),
            "sad" => Ok(Mood::Sad),
            other => Err(format!("unknown mood '{other}'")),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a deterministic check-in for `alex` on 2024-03-(`day`) at 09:00 UTC.
#[cfg(test)]
pub(crate) fn sample_check_in(day: u32, mood: &str, stress: i32, productivity: i32) -> CheckIn {
    use chrono::TimeZone;

    CheckIn {
        id: Uuid::from_u128(u128::from(day)),
        created_at: Utc
            .with_ymd_and_hms(2024, 3, day, 9, 0, 0)
            .single()
            .expect("valid fixture date"),
        user_id: Uuid::from_u128(1),
        user_name: "alex".to_string(),
        mood: mood.to_string(),
        stress_level: stress,
        productivity_level: productivity,
        notes: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_score_is_case_insensitive() {
        assert_eq!(Mood::score("HAPPY"), 3);
        assert_eq!(Mood::score("Neutral"), 2);
        assert_eq!(Mood::score("sad"), 1);
    }

    #[test]
    fn test_unknown_mood_scores_zero() {
        assert_eq!(Mood::score("ecstatic"), 0);
        assert_eq!(Mood::score(""), 0);
    }

    #[test]
    fn test_mood_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Mood::Neutral).unwrap(), "\"neutral\"");
    }
}
