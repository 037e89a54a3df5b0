//! Full assessment documents

use serde_json::Value;
use tracing::debug;

use crate::client::RedListClient;
use crate::error::{RedListError, Result};
use crate::parse::Parsed;
use crate::types::Query;
use crate::validation;

/// Separator between path elements accepted by [`extract`]
pub const PATH_SEPARATOR: &str = "__";

impl RedListClient {
    /// One assessment: `assessment/{id}`
    pub async fn assessment(&self, id: u64, flatten: bool) -> Result<Parsed> {
        let id = validation::positive("id", id)?;
        self.fetch(&format!("assessment/{}", id), &Query::new(), flatten)
            .await
    }

    /// Several assessments, fetched one after another
    ///
    /// The first failure aborts the whole batch.
    pub async fn assessment_list(&self, ids: &[u64], flatten: bool) -> Result<Vec<Parsed>> {
        if ids.is_empty() {
            return Err(RedListError::Validation("`ids` must not be empty".to_string()));
        }
        let mut out = Vec::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            debug!(id, n = i + 1, total = ids.len(), "Fetching assessment");
            out.push(self.assessment(*id, flatten).await?);
        }
        Ok(out)
    }
}

/// Pull one element out of each assessment
///
/// `path` names nested fields joined with `__`, e.g.
/// `taxon__scientific_name`. Assessments lacking the element yield `null`.
pub fn extract(assessments: &[Parsed], path: &str) -> Result<Vec<Value>> {
    let path = validation::non_empty("path", path)?;
    let parts: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(RedListError::Validation(format!("malformed path '{}'", path)));
    }

    Ok(assessments
        .iter()
        .map(|a| {
            let doc = a.to_json();
            let found = parts
                .iter()
                .try_fold(&doc, |v, key| v.get(*key))
                .cloned();
            found.unwrap_or(Value::Null)
        })
        .collect())
}
