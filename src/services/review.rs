use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Decision, HistoryEntry, Title},
};

pub const MAX_STARS: u8 = 5;

/// A user's verdict on the picked title
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ReviewSubmission {
    /// Star rating, 1 to [`MAX_STARS`]
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub family_friendly: bool,
    #[serde(default)]
    pub repeat_watch: bool,
}

/// Validates a submission and turns it into a history entry for `picked`
pub fn capture(
    picked: &Title,
    submission: &ReviewSubmission,
    today: NaiveDate,
) -> AppResult<HistoryEntry> {
    let rating = submission.rating.ok_or(AppError::MissingRating)?;
    if !(1..=MAX_STARS).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between 1 and {}, got {}",
            MAX_STARS, rating
        )));
    }

    Ok(HistoryEntry {
        id: picked.id.clone(),
        title: picked.name.clone(),
        decision: Decision::Reviewed,
        user_rating: Some(rating),
        family_friendly: submission.family_friendly,
        repeat_watch: submission.repeat_watch,
        date: today,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::title::sample_title;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_capture_builds_reviewed_entry() {
        let submission = ReviewSubmission {
            rating: Some(4),
            family_friendly: true,
            repeat_watch: false,
        };
        let entry = capture(&sample_title("tt1", "8.0"), &submission, today()).unwrap();

        assert_eq!(entry.id, "tt1");
        assert_eq!(entry.decision, Decision::Reviewed);
        assert_eq!(entry.user_rating, Some(4));
        assert!(entry.family_friendly);
        assert!(!entry.repeat_watch);
        assert_eq!(entry.date, today());
    }

    #[test]
    fn test_capture_requires_rating() {
        let result = capture(
            &sample_title("tt1", "8.0"),
            &ReviewSubmission::default(),
            today(),
        );
        assert!(matches!(result, Err(AppError::MissingRating)));
    }

    #[test]
    fn test_capture_rejects_out_of_range() {
        for rating in [0, 6] {
            let submission = ReviewSubmission {
                rating: Some(rating),
                ..Default::default()
            };
            let result = capture(&sample_title("tt1", "8.0"), &submission, today());
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_submission_tags_default_to_false() {
        let submission: ReviewSubmission = serde_json::from_str(r#"{"rating": 5}"#).unwrap();
        assert_eq!(submission.rating, Some(5));
        assert!(!submission.family_friendly);
        assert!(!submission.repeat_watch);
    }
}
