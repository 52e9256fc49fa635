use serde::Deserialize;

use super::{MediaKind, Title};

/// OMDb signals "not available" with this literal instead of null
pub const NOT_AVAILABLE: &str = "N/A";

/// Response of `GET /?s={query}`
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbSearchResponse {
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
}

/// Response of `GET /?i={id}`
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbTitle {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
}

impl TryFrom<OmdbTitle> for Title {
    type Error = String;

    fn try_from(detail: OmdbTitle) -> Result<Self, Self::Error> {
        if !detail.response.eq_ignore_ascii_case("true") {
            return Err(detail
                .error
                .unwrap_or_else(|| "OMDb returned no title".to_string()));
        }

        let id = detail
            .imdb_id
            .ok_or_else(|| "OMDb response missing imdbID".to_string())?;

        let kind = match detail.item_type.as_deref() {
            Some("series") | Some("episode") => MediaKind::Show,
            _ => MediaKind::Movie,
        };

        Ok(Title {
            name: detail.title.unwrap_or_else(|| id.clone()),
            id,
            rating: detail.imdb_rating,
            genre: detail
                .genre
                .filter(|g| g != NOT_AVAILABLE)
                .unwrap_or_default(),
            poster: detail.poster.filter(|p| p != NOT_AVAILABLE),
            kind,
        })
    }
}
