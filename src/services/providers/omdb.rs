/// OMDb (Open Movie Database) provider
///
/// API Flow:
/// 1. Search: `/?s={keyword}&type={movie|series}` → page of ids
/// 2. Detail: `/?i={imdb_id}` → rating, genre, poster
///
/// OMDb answers HTTP 200 for logical failures and reports them through the
/// `Response`/`Error` fields, so both are inspected.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MediaKind, OmdbSearchResponse, OmdbTitle, Title},
    services::providers::SearchProvider,
};
use reqwest::Client as HttpClient;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const TITLE_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl OmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.api_url)
    }

    /// Turns a search response into ids.
    ///
    /// "not found" and "too many results" are ordinary empty searches; any
    /// other reported error (bad key, quota) is surfaced.
    fn search_response_ids(response: OmdbSearchResponse) -> AppResult<Vec<String>> {
        if response.is_success() {
            return Ok(response.search.into_iter().map(|item| item.imdb_id).collect());
        }

        let error = response.error.unwrap_or_default();
        let lowered = error.to_lowercase();
        if lowered.contains("not found") || lowered.contains("too many results") {
            Ok(Vec::new())
        } else {
            Err(AppError::ExternalApi(format!("OMDb search failed: {}", error)))
        }
    }

    async fn get(&self, params: &[(&str, &str)]) -> AppResult<reqwest::Response> {
        let response = self
            .http_client
            .get(self.endpoint())
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl SearchProvider for OmdbProvider {
    async fn search_ids(&self, query: &str, kind: MediaKind) -> AppResult<Vec<String>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::TitleSearch {
                kind,
                query: query.to_string(),
            },
            SEARCH_CACHE_TTL,
            async move {
                let response = self
                    .get(&[("s", query), ("type", kind.as_omdb_type())])
                    .await?;
                let search: OmdbSearchResponse = response.json().await?;
                let ids = Self::search_response_ids(search)?;

                tracing::info!(
                    query = %query,
                    kind = %kind,
                    results = ids.len(),
                    provider = "omdb",
                    "Title search completed"
                );

                Ok::<_, AppError>(ids)
            }
        )
    }

    async fn fetch_title(&self, id: &str) -> AppResult<Title> {
        cached!(
            self.cache,
            CacheKey::TitleDetail(id.to_string()),
            TITLE_CACHE_TTL,
            async move {
                let response = self.get(&[("i", id)]).await?;
                let detail: OmdbTitle = response.json().await?;
                let title = Title::try_from(detail).map_err(|e| {
                    AppError::ExternalApi(format!("OMDb lookup of {} failed: {}", id, e))
                })?;

                tracing::debug!(
                    title_id = %title.id,
                    rating = ?title.rating,
                    provider = "omdb",
                    "Title fetched"
                );

                Ok::<_, AppError>(title)
            }
        )
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{KeyValueStore, MemoryStore};
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Minimal OMDb stand-in: one search keyword and two titles
    async fn fake_omdb(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        if params.get("apikey").map(String::as_str) != Some("test_key") {
            return Json(json!({"Response": "False", "Error": "Invalid API key!"}));
        }

        if let Some(query) = params.get("s") {
            return match query.as_str() {
                "Heist" => Json(json!({
                    "Search": [
                        {"Title": "Heat", "imdbID": "tt0113277", "Type": "movie"},
                        {"Title": "Inception", "imdbID": "tt1375666", "Type": "movie"}
                    ],
                    "Response": "True"
                })),
                _ => Json(json!({"Response": "False", "Error": "Movie not found!"})),
            };
        }

        match params.get("i").map(String::as_str) {
            Some("tt1375666") => Json(json!({
                "Title": "Inception",
                "Genre": "Action, Adventure, Sci-Fi",
                "Poster": "https://img.example/inception.jpg",
                "imdbRating": "8.8",
                "imdbID": "tt1375666",
                "Type": "movie",
                "Response": "True"
            })),
            _ => Json(json!({"Response": "False", "Error": "Incorrect IMDb ID."})),
        }
    }

    async fn spawn_fake_omdb() -> String {
        let app = Router::new().route("/", get(fake_omdb));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn create_test_provider(api_key: &str) -> OmdbProvider {
        let api_url = spawn_fake_omdb().await;
        let (cache, _handle) = Cache::new(Arc::new(MemoryStore::new()));
        OmdbProvider::new(cache, api_key.to_string(), api_url)
    }

    #[tokio::test]
    async fn test_search_ids() {
        let provider = create_test_provider("test_key").await;
        let ids = provider.search_ids("Heist", MediaKind::Movie).await.unwrap();
        assert_eq!(ids, vec!["tt0113277".to_string(), "tt1375666".to_string()]);
    }

    #[tokio::test]
    async fn test_search_not_found_is_empty() {
        let provider = create_test_provider("test_key").await;
        let ids = provider.search_ids("Nothing", MediaKind::Movie).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let provider = create_test_provider("test_key").await;
        let result = provider.search_ids("   ", MediaKind::Movie).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_invalid_key_is_an_error() {
        let provider = create_test_provider("wrong").await;
        let result = provider.search_ids("Heist", MediaKind::Movie).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_fetch_title() {
        let provider = create_test_provider("test_key").await;
        let title = provider.fetch_title("tt1375666").await.unwrap();
        assert_eq!(title.name, "Inception");
        assert_eq!(title.rating(), Some(8.8));
    }

    #[tokio::test]
    async fn test_fetch_unknown_title_fails() {
        let provider = create_test_provider("test_key").await;
        let result = provider.fetch_title("tt0000000").await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_fetch_title_served_from_cache() {
        let store = MemoryStore::new();
        let (cache, _handle) = Cache::new(Arc::new(store.clone()));
        let cached = Title {
            id: "tt9".to_string(),
            name: "Cached".to_string(),
            rating: Some("7.1".to_string()),
            genre: "Drama".to_string(),
            poster: None,
            kind: MediaKind::Movie,
        };
        store
            .set(
                &CacheKey::TitleDetail("tt9".to_string()).to_string(),
                &serde_json::to_string(&cached).unwrap(),
            )
            .await
            .unwrap();

        // Unreachable API: a hit must not touch the network
        let provider = OmdbProvider::new(cache, "k".to_string(), "http://127.0.0.1:9".to_string());
        assert_eq!(provider.fetch_title("tt9").await.unwrap(), cached);
    }

    #[test]
    fn test_search_response_ids_too_many_results() {
        let response: OmdbSearchResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Too many results."}"#).unwrap();
        assert!(OmdbProvider::search_response_ids(response).unwrap().is_empty());
    }

    #[test]
    fn test_search_response_ids_limit_reached() {
        let response: OmdbSearchResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Request limit reached!"}"#)
                .unwrap();
        assert!(OmdbProvider::search_response_ids(response).is_err());
    }
}
