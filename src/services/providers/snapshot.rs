use std::path::Path;

use crate::models::Title;

/// Bundled, read-only list of titles
#[derive(Debug, Clone, Default)]
pub struct SnapshotCatalog {
    titles: Vec<Title>,
}

impl SnapshotCatalog {
    pub fn new(titles: Vec<Title>) -> Self {
        Self { titles }
    }

    /// Loads a JSON array of titles from disk
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read snapshot {}: {}", path.display(), e))?;
        let titles: Vec<Title> = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Failed to parse snapshot {}: {}", path.display(), e))?;

        tracing::info!(
            path = %path.display(),
            titles = titles.len(),
            "Loaded title snapshot"
        );

        let snapshot = Self::new(titles);
        if snapshot.is_empty() {
            tracing::warn!(
                path = %path.display(),
                "Snapshot holds no titles, discovery will find nothing"
            );
        }

        Ok(snapshot)
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
