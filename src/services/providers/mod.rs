/// Catalog sources feeding the discovery engine
///
/// A catalog is either a remote search API (searched by keyword, then looked
/// up title by title) or a static snapshot that already holds full records.
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MediaKind, Title},
};

pub mod omdb;
pub mod snapshot;

pub use omdb::OmdbProvider;
pub use snapshot::SnapshotCatalog;

/// Trait for remote title databases
///
/// Search returns ids only; full records come from `fetch_title`. Both calls
/// are fanned out concurrently by the discovery engine, so implementations
/// must be cheap to share behind an `Arc`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Ids of titles matching `query`, in the provider's relevance order
    async fn search_ids(&self, query: &str, kind: MediaKind) -> AppResult<Vec<String>>;

    /// Full record for one title
    async fn fetch_title(&self, id: &str) -> AppResult<Title>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// The configured source of candidate titles
#[derive(Clone)]
pub enum Catalog {
    Search(Arc<dyn SearchProvider>),
    Snapshot(Arc<SnapshotCatalog>),
}

impl Catalog {
    pub fn name(&self) -> &'static str {
        match self {
            Catalog::Search(provider) => provider.name(),
            Catalog::Snapshot(_) => "snapshot",
        }
    }
}
