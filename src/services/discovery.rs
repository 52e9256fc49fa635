use std::collections::HashSet;
use std::sync::Arc;

use fastrand::Rng;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{MediaKind, Title, QUEUE_SIZE},
    services::providers::{Catalog, SearchProvider, SnapshotCatalog},
};

/// A themed keyword list; one keyword per lane is searched per run
#[derive(Debug, Clone, Copy)]
pub struct Lane {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const LANES: [Lane; 4] = [
    Lane {
        name: "pulse",
        keywords: &[
            "Action", "Thriller", "Noir", "Crime", "Heist", "Revenge", "Assassin", "Manhunt",
            "Warfare", "Espionage", "Vigilante", "Underworld",
        ],
    },
    Lane {
        name: "wonder",
        keywords: &[
            "Sci-Fi", "Cyberpunk", "Dystopian", "Space", "Multiverse", "Time Travel", "Alien",
            "Simulation", "Apocalypse", "Galaxy", "Fantasy", "Magic", "Mythology",
        ],
    },
    Lane {
        name: "thought",
        keywords: &[
            "Mystery", "Psychological", "Conspiracy", "Identity", "Memory", "Mind-bending",
            "Investigation", "Detective", "Secret", "Documentary", "Biographical", "Historical",
        ],
    },
    Lane {
        name: "heart",
        keywords: &[
            "Comedy", "Animation", "Family", "Satire", "Drama", "Coming-of-age", "Redemption",
            "Inspirational", "Romance", "Musical", "Western", "Classic",
        ],
    },
];

const LANES_PER_RUN: usize = 3;
const IDS_PER_SEARCH: usize = 5;
const MAX_CANDIDATES: usize = 15;
const MAX_RETRIES: u32 = 1;

/// Thresholds and scope of a discovery run
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryPolicy {
    pub min_rating: f32,
    /// Threshold used by the single retry when the first attempt falls short
    pub relaxed_rating: f32,
    pub media_kind: MediaKind,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            min_rating: 7.0,
            relaxed_rating: 6.0,
            media_kind: MediaKind::Movie,
        }
    }
}

impl From<&Config> for DiscoveryPolicy {
    fn from(config: &Config) -> Self {
        Self {
            min_rating: config.min_rating,
            relaxed_rating: config.relaxed_rating,
            media_kind: config.media_kind,
        }
    }
}

/// Builds the daily queue from a catalog
pub struct DiscoveryEngine {
    catalog: Catalog,
    policy: DiscoveryPolicy,
}

impl DiscoveryEngine {
    pub fn new(catalog: Catalog, policy: DiscoveryPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog_name(&self) -> &'static str {
        self.catalog.name()
    }

    /// Produces at most [`QUEUE_SIZE`] qualifying titles, none of them in
    /// `exclude`, in random order.
    pub async fn discover(&self, exclude: &HashSet<String>, rng: &mut Rng) -> AppResult<Vec<Title>> {
        match &self.catalog {
            Catalog::Search(provider) => self.discover_from_search(provider, exclude, rng).await,
            Catalog::Snapshot(snapshot) => self.discover_from_snapshot(snapshot, exclude, rng),
        }
    }

    async fn discover_from_search(
        &self,
        provider: &Arc<dyn SearchProvider>,
        exclude: &HashSet<String>,
        rng: &mut Rng,
    ) -> AppResult<Vec<Title>> {
        let mut attempt = 0;

        loop {
            let threshold = if attempt == 0 {
                self.policy.min_rating
            } else {
                self.policy.relaxed_rating
            };

            let keywords = pick_keywords(rng);
            tracing::info!(
                attempt,
                threshold,
                keywords = ?keywords,
                provider = provider.name(),
                "Starting discovery"
            );

            let candidates = self.search_candidates(provider, keywords, exclude).await?;
            let titles = fetch_titles(provider, candidates).await?;
            let found: Vec<Title> = titles
                .into_iter()
                .filter(|t| t.meets_rating(threshold) && t.has_poster())
                .collect();

            if found.len() < QUEUE_SIZE && attempt < MAX_RETRIES {
                tracing::warn!(
                    found = found.len(),
                    threshold,
                    "Not enough highly rated titles, retrying"
                );
                attempt += 1;
                continue;
            }

            if found.is_empty() {
                return Err(AppError::NothingNew);
            }

            return Ok(sample(found, rng));
        }
    }

    /// Runs one search per keyword concurrently and merges the leading ids
    async fn search_candidates(
        &self,
        provider: &Arc<dyn SearchProvider>,
        keywords: Vec<&'static str>,
        exclude: &HashSet<String>,
    ) -> AppResult<Vec<String>> {
        let kind = self.policy.media_kind;
        let mut tasks = Vec::new();

        for keyword in keywords {
            let provider = Arc::clone(provider);
            let task = tokio::spawn(async move { provider.search_ids(keyword, kind).await });
            tasks.push(task);
        }

        let mut ids = Vec::new();
        let mut errors = Vec::new();

        for task in tasks {
            match task.await {
                Ok(Ok(found)) => ids.extend(found.into_iter().take(IDS_PER_SEARCH)),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Title search failed");
                    errors.push(e);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    errors.push(AppError::Internal(e.to_string()));
                }
            }
        }

        if ids.is_empty() && !errors.is_empty() {
            return Err(errors.remove(0));
        }

        let mut seen = HashSet::new();
        Ok(ids
            .into_iter()
            .filter(|id| !exclude.contains(id) && seen.insert(id.clone()))
            .take(MAX_CANDIDATES)
            .collect())
    }

    fn discover_from_snapshot(
        &self,
        snapshot: &SnapshotCatalog,
        exclude: &HashSet<String>,
        rng: &mut Rng,
    ) -> AppResult<Vec<Title>> {
        let found: Vec<Title> = snapshot
            .titles()
            .iter()
            .filter(|t| {
                t.kind == self.policy.media_kind
                    && !exclude.contains(&t.id)
                    && t.meets_rating(self.policy.min_rating)
                    && t.has_poster()
            })
            .cloned()
            .collect();

        tracing::info!(
            snapshot_size = snapshot.len(),
            qualifying = found.len(),
            "Snapshot discovery completed"
        );

        if found.is_empty() {
            return Err(AppError::NothingNew);
        }

        Ok(sample(found, rng))
    }
}

/// Picks one random keyword from each of [`LANES_PER_RUN`] random lanes
pub fn pick_keywords(rng: &mut Rng) -> Vec<&'static str> {
    let mut lanes = LANES.to_vec();
    rng.shuffle(&mut lanes);

    lanes
        .iter()
        .take(LANES_PER_RUN)
        .map(|lane| lane.keywords[rng.usize(..lane.keywords.len())])
        .collect()
}

/// Fetches full records concurrently. Individual failures are skipped; the
/// run only fails when every lookup failed.
async fn fetch_titles(provider: &Arc<dyn SearchProvider>, ids: Vec<String>) -> AppResult<Vec<Title>> {
    let mut tasks = Vec::new();

    for id in ids {
        let provider = Arc::clone(provider);
        let task = tokio::spawn(async move { provider.fetch_title(&id).await });
        tasks.push(task);
    }

    let mut titles = Vec::new();
    let mut errors = Vec::new();

    for task in tasks {
        match task.await {
            Ok(Ok(title)) => titles.push(title),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Title lookup failed");
                errors.push(e);
            }
            Err(e) => errors.push(AppError::Internal(e.to_string())),
        }
    }

    if !errors.is_empty() {
        tracing::warn!(
            success_count = titles.len(),
            error_count = errors.len(),
            "Partial title lookup failure"
        );
    }

    if titles.is_empty() && !errors.is_empty() {
        return Err(errors.remove(0));
    }

    Ok(titles)
}

fn sample(mut titles: Vec<Title>, rng: &mut Rng) -> Vec<Title> {
    rng.shuffle(&mut titles);
    titles.truncate(QUEUE_SIZE);
    titles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::title::sample_title;
    use crate::services::providers::MockSearchProvider;

    fn rated(id: &str, rating: &str) -> Title {
        sample_title(id, rating)
    }

    fn engine_with(mock: MockSearchProvider) -> DiscoveryEngine {
        DiscoveryEngine::new(Catalog::Search(Arc::new(mock)), DiscoveryPolicy::default())
    }

    fn exclude(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn ids(titles: &[Title]) -> HashSet<String> {
        titles.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_pick_keywords_one_per_distinct_lane() {
        let mut rng = Rng::with_seed(42);
        for _ in 0..20 {
            let keywords = pick_keywords(&mut rng);
            assert_eq!(keywords.len(), LANES_PER_RUN);

            let lanes: HashSet<&str> = keywords
                .iter()
                .map(|k| {
                    LANES
                        .iter()
                        .find(|lane| lane.keywords.contains(k))
                        .unwrap()
                        .name
                })
                .collect();
            assert_eq!(lanes.len(), LANES_PER_RUN);
        }
    }

    #[tokio::test]
    async fn test_history_titles_are_excluded() {
        let mut mock = MockSearchProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_search_ids()
            .returning(|_, _| Ok(vec!["tt1".into(), "tt2".into(), "tt3".into()]));
        mock.expect_fetch_title()
            .withf(|id| id != "tt1")
            .returning(|id| Ok(rated(id, "7.5")));

        let engine = engine_with(mock);
        let queue = engine
            .discover(&exclude(&["tt1"]), &mut Rng::with_seed(1))
            .await
            .unwrap();

        assert_eq!(ids(&queue), exclude(&["tt2", "tt3"]));
    }

    #[tokio::test]
    async fn test_queue_is_capped_and_does_not_retry_when_full() {
        let mut mock = MockSearchProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_search_ids()
            .times(LANES_PER_RUN)
            .returning(|query, _| Ok((0..10).map(|i| format!("{}-{}", query, i)).collect()));
        mock.expect_fetch_title()
            .times(MAX_CANDIDATES)
            .returning(|id| Ok(rated(id, "8.0")));

        let engine = engine_with(mock);
        let queue = engine
            .discover(&HashSet::new(), &mut Rng::with_seed(2))
            .await
            .unwrap();

        assert_eq!(queue.len(), QUEUE_SIZE);
        assert_eq!(ids(&queue).len(), QUEUE_SIZE);
    }

    #[tokio::test]
    async fn test_relaxes_threshold_once() {
        let mut mock = MockSearchProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_search_ids()
            .times(LANES_PER_RUN * 2)
            .returning(|_, _| Ok(vec!["tt1".into(), "tt2".into()]));
        mock.expect_fetch_title()
            .returning(|id| Ok(rated(id, "6.5")));

        let engine = engine_with(mock);
        let queue = engine
            .discover(&HashSet::new(), &mut Rng::with_seed(3))
            .await
            .unwrap();

        assert_eq!(ids(&queue), exclude(&["tt1", "tt2"]));
    }

    #[tokio::test]
    async fn test_nothing_qualifies_after_retry() {
        let mut mock = MockSearchProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_search_ids()
            .times(LANES_PER_RUN * 2)
            .returning(|_, _| Ok(vec!["tt1".into()]));
        mock.expect_fetch_title()
            .returning(|id| Ok(rated(id, "N/A")));

        let engine = engine_with(mock);
        let result = engine.discover(&HashSet::new(), &mut Rng::with_seed(4)).await;

        assert!(matches!(result, Err(AppError::NothingNew)));
    }

    #[tokio::test]
    async fn test_titles_without_poster_are_dropped() {
        let mut mock = MockSearchProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_search_ids()
            .returning(|_, _| Ok(vec!["tt1".into(), "tt2".into()]));
        mock.expect_fetch_title().returning(|id| {
            let mut title = rated(id, "9.0");
            if id == "tt1" {
                title.poster = None;
            }
            Ok(title)
        });

        let engine = engine_with(mock);
        let queue = engine
            .discover(&HashSet::new(), &mut Rng::with_seed(5))
            .await
            .unwrap();

        assert_eq!(ids(&queue), exclude(&["tt2"]));
    }

    #[tokio::test]
    async fn test_failed_lookups_are_skipped() {
        let mut mock = MockSearchProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_search_ids()
            .returning(|_, _| Ok(vec!["tt1".into(), "tt2".into()]));
        mock.expect_fetch_title().returning(|id| {
            if id == "tt1" {
                Err(AppError::ExternalApi("timeout".to_string()))
            } else {
                Ok(rated(id, "8.0"))
            }
        });

        let engine = engine_with(mock);
        let queue = engine
            .discover(&HashSet::new(), &mut Rng::with_seed(6))
            .await
            .unwrap();

        assert_eq!(ids(&queue), exclude(&["tt2"]));
    }

    #[tokio::test]
    async fn test_search_outage_is_reported() {
        let mut mock = MockSearchProvider::new();
        mock.expect_name().return_const("mock");
        mock.expect_search_ids()
            .returning(|_, _| Err(AppError::ExternalApi("offline".to_string())));

        let engine = engine_with(mock);
        let result = engine.discover(&HashSet::new(), &mut Rng::with_seed(7)).await;

        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_partial_search_failure_still_discovers() {
        let mut mock = MockSearchProvider::new();
        mock.expect_name().return_const("mock");
        let mut calls = 0;
        mock.expect_search_ids().returning(move |_, _| {
            calls += 1;
            if calls % 2 == 0 {
                Err(AppError::ExternalApi("flaky".to_string()))
            } else {
                Ok(vec!["tt1".into()])
            }
        });
        mock.expect_fetch_title().returning(|id| Ok(rated(id, "8.0")));

        let engine = engine_with(mock);
        let queue = engine
            .discover(&HashSet::new(), &mut Rng::with_seed(8))
            .await
            .unwrap();

        assert_eq!(ids(&queue), exclude(&["tt1"]));
    }

    fn snapshot_engine(titles: Vec<Title>) -> DiscoveryEngine {
        DiscoveryEngine::new(
            Catalog::Snapshot(Arc::new(SnapshotCatalog::new(titles))),
            DiscoveryPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_snapshot_filters_and_samples() {
        let mut titles: Vec<Title> = (0..12)
            .map(|i| rated(&format!("tt{}", i), "8.1"))
            .collect();
        titles.push(rated("low", "5.0"));
        let mut show = rated("show", "9.0");
        show.kind = MediaKind::Show;
        titles.push(show);

        let engine = snapshot_engine(titles);
        let excluded = exclude(&["tt0", "tt1"]);
        let queue = engine
            .discover(&excluded, &mut Rng::with_seed(9))
            .await
            .unwrap();

        assert_eq!(queue.len(), QUEUE_SIZE);
        for title in &queue {
            assert!(!excluded.contains(&title.id));
            assert_ne!(title.id, "low");
            assert_ne!(title.id, "show");
        }
    }

    #[tokio::test]
    async fn test_snapshot_history_scenario() {
        let engine = snapshot_engine(vec![
            rated("tt1", "7.0"),
            rated("tt2", "7.4"),
            rated("tt3", "8.9"),
        ]);

        let queue = engine
            .discover(&exclude(&["tt1"]), &mut Rng::with_seed(10))
            .await
            .unwrap();

        assert_eq!(ids(&queue), exclude(&["tt2", "tt3"]));
    }

    #[tokio::test]
    async fn test_snapshot_exhausted() {
        let engine = snapshot_engine(vec![rated("tt1", "9.0")]);
        let result = engine.discover(&exclude(&["tt1"]), &mut Rng::with_seed(11)).await;
        assert!(matches!(result, Err(AppError::NothingNew)));
    }
}
