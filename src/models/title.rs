use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Kind of content a title represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    #[serde(alias = "series")]
    Show,
}

impl MediaKind {
    /// Value of the `type` query parameter understood by OMDb
    pub fn as_omdb_type(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "series",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Show => write!(f, "show"),
        }
    }
}

/// A movie or show candidate, as supplied by a catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    /// Catalog-unique identifier (e.g. "tt1375666")
    pub id: String,
    pub name: String,
    /// Rating exactly as the catalog reported it; may be "N/A"
    #[serde(default)]
    pub rating: Option<String>,
    /// Comma separated genre labels
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub poster: Option<String>,
    pub kind: MediaKind,
}

impl Title {
    /// Parsed numeric rating, `None` when missing or unparsable
    pub fn rating(&self) -> Option<f32> {
        self.rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f32>().ok())
            .filter(|r| r.is_finite())
    }

    /// True when the title has a parsable rating of at least `threshold`
    pub fn meets_rating(&self, threshold: f32) -> bool {
        self.rating().is_some_and(|r| r >= threshold)
    }

    pub fn has_poster(&self) -> bool {
        self.poster.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[cfg(test)]
pub(crate) fn sample_title(id: &str, rating: &str) -> Title {
    Title {
        id: id.to_string(),
        name: format!("Title {}", id),
        rating: Some(rating.to_string()),
        genre: "Drama, Crime".to_string(),
        poster: Some(format!("https://img.example/{}.jpg", id)),
        kind: MediaKind::Movie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_parses() {
        let title = sample_title("tt1", "7.8");
        assert_eq!(title.rating(), Some(7.8));
        assert!(title.meets_rating(7.0));
        assert!(!title.meets_rating(8.0));
    }

    #[test]
    fn test_rating_not_available() {
        let title = sample_title("tt1", "N/A");
        assert_eq!(title.rating(), None);
        assert!(!title.meets_rating(0.0));

        let missing = Title {
            rating: None,
            ..sample_title("tt2", "1")
        };
        assert_eq!(missing.rating(), None);
    }

    #[test]
    fn test_media_kind_serialization() {
        assert_eq!(serde_json::to_string(&MediaKind::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&MediaKind::Show).unwrap(), "\"show\"");

        let series: MediaKind = serde_json::from_str("\"series\"").unwrap();
        assert_eq!(series, MediaKind::Show);
        assert_eq!(series.as_omdb_type(), "series");
    }
}
