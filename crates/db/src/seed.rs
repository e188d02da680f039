use std::{collections::BTreeMap, path::Path};

use serde_json::Value;

use crate::{
    error::{DbError, DbResult},
    store::DocumentStore,
};

/// Per-collection document counts loaded from a seed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub counts: BTreeMap<String, usize>,
}

impl SeedSummary {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl DocumentStore {
    /// Loads a seed file of the form `{ "<collection>": [ {..}, .. ], .. }`.
    pub async fn load_seed(&self, path: &Path) -> DbResult<SeedSummary> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DbError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let summary = self.load_seed_str(&raw).await?;
        tracing::info!(
            store = %self.name(),
            path = %path.display(),
            documents = summary.total(),
            "seed loaded"
        );
        Ok(summary)
    }

    /// Loads seed documents from a JSON string.
    pub async fn load_seed_str(&self, raw: &str) -> DbResult<SeedSummary> {
        let seed: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        let mut summary = SeedSummary::default();

        for (collection, documents) in seed {
            let Value::Array(documents) = documents else {
                return Err(DbError::InvalidSeed(format!(
                    "collection '{collection}' must be an array of documents"
                )));
            };

            let count = documents.len();
            for document in documents {
                self.insert(&collection, document).await?;
            }
            summary.counts.insert(collection, count);
        }

        Ok(summary)
    }
}
