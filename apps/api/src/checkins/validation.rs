use serde::Deserialize;

use crate::errors::AppError;
use crate::models::checkin::Mood;

pub const MIN_LEVEL: i32 = 0;
pub const MAX_LEVEL: i32 = 10;
/// Level assumed when the form omits a slider value.
const DEFAULT_LEVEL: i32 = 5;

/// Raw check-in form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInSubmission {
    #[serde(default)]
    pub name: String,
    pub mood: Option<String>,
    #[serde(default = "default_level")]
    pub stress_level: i32,
    #[serde(default = "default_level")]
    pub productivity_level: i32,
    #[serde(default)]
    pub notes: String,
}

fn default_level() -> i32 {
    DEFAULT_LEVEL
}

/// A submission that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCheckIn {
    pub user_name: String,
    pub mood: Mood,
    pub stress_level: i32,
    pub productivity_level: i32,
    pub notes: String,
}

/// Rejects incomplete or out-of-range submissions. Runs before any database call.
pub fn validate_submission(submission: &CheckInSubmission) -> Result<ValidCheckIn, AppError> {
    let user_name = submission.name.trim();
    if user_name.is_empty() {
        return Err(AppError::Validation("Please enter your name".to_string()));
    }

    let mood = match submission.mood.as_deref().map(str::trim) {
        None | Some("") => return Err(AppError::Validation("Please select your mood".to_string())),
        Some(raw) => raw.parse::<Mood>().map_err(|e| {
            AppError::Validation(format!("{e}: expected one of happy, neutral, sad"))
        })?,
    };

    check_level("stress_level", submission.stress_level)?;
    check_level("productivity_level", submission.productivity_level)?;

    Ok(ValidCheckIn {
        user_name: user_name.to_string(),
        mood,
        stress_level: submission.stress_level,
        productivity_level: submission.productivity_level,
        notes: submission.notes.clone(),
    })
}

fn check_level(field: &str, value: i32) -> Result<(), AppError> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be between {MIN_LEVEL} and {MAX_LEVEL}, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, mood: Option<&str>) -> CheckInSubmission {
        CheckInSubmission {
            name: name.to_string(),
            mood: mood.map(String::from),
            stress_level: 4,
            productivity_level: 7,
            notes: "  shipped the release  ".to_string(),
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_name_is_trimmed_and_notes_kept_as_typed() {
        let valid = validate_submission(&submission("  Alex  ", Some("Happy"))).unwrap();
        assert_eq!(valid.user_name, "Alex");
        assert_eq!(valid.mood, Mood::Happy);
        assert_eq!(valid.notes, "  shipped the release  ");
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = validate_submission(&submission("   ", Some("happy"))).unwrap_err();
        assert_eq!(message(err), "Please enter your name");
    }

    #[test]
    fn test_missing_mood_rejected() {
        let err = validate_submission(&submission("Alex", None)).unwrap_err();
        assert_eq!(message(err), "Please select your mood");
    }

    #[test]
    fn test_name_checked_before_mood() {
        let err = validate_submission(&submission("", None)).unwrap_err();
        assert_eq!(message(err), "Please enter your name");
    }

    #[test]
    fn test_unknown_mood_rejected() {
        let err = validate_submission(&submission("Alex", Some("elated"))).unwrap_err();
        assert!(message(err).contains("elated"));
    }

    #[test]
    fn test_out_of_range_levels_rejected() {
        let mut high = submission("Alex", Some("sad"));
        high.stress_level = 11;
        assert!(message(validate_submission(&high).unwrap_err()).contains("stress_level"));

        let mut low = submission("Alex", Some("sad"));
        low.productivity_level = -1;
        assert!(message(validate_submission(&low).unwrap_err()).contains("productivity_level"));
    }

    #[test]
    fn test_boundary_levels_accepted() {
        let mut edge = submission("Alex", Some("neutral"));
        edge.stress_level = 0;
        edge.productivity_level = 10;
        assert!(validate_submission(&edge).is_ok());
    }

    #[test]
    fn test_missing_sliders_default_to_five() {
        let parsed: CheckInSubmission =
            serde_json::from_str(r#"{"name": "Alex", "mood": "happy"}"#).unwrap();
        assert_eq!(parsed.stress_level, 5);
        assert_eq!(parsed.productivity_level, 5);
        assert!(parsed.notes.is_empty());
    }
}
