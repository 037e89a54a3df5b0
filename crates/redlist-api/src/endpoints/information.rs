//! Version, statistics, and citation

use serde_json::Value;

use crate::client::RedListClient;
use crate::error::{RedListError, Result};
use crate::parse::Parsed;
use crate::types::Query;

impl RedListClient {
    /// Current Red List version, e.g. `2025-1`
    pub async fn red_list_version(&self) -> Result<String> {
        let doc = self.information("information/red_list_version").await?;
        string_field(&doc, "red_list_version")
    }

    /// Version of the API itself
    pub async fn api_version(&self) -> Result<String> {
        let doc = self.information("information/api_version").await?;
        string_field(&doc, "api_version")
    }

    /// Species counts: `statistics/count`
    pub async fn species_count(&self) -> Result<Value> {
        self.information("statistics/count").await
    }

    /// Recommended citation for the current Red List version
    pub async fn citation(&self) -> Result<String> {
        let version = self.red_list_version().await?;
        Ok(citation_for(&version))
    }

    async fn information(&self, path: &str) -> Result<Value> {
        match self.fetch(path, &Query::new(), false).await? {
            Parsed::Nested(v) => Ok(v),
            Parsed::Flat(f) => Ok(serde_json::to_value(f)?),
        }
    }
}

fn string_field(doc: &Value, field: &str) -> Result<String> {
    match doc.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(RedListError::Parse(format!("response has no `{}`", field))),
    }
}

/// Citation text; the year is the leading part of the version (`2025-1` -> `2025`)
pub fn citation_for(version: &str) -> String {
    let year = version.split('-').next().unwrap_or(version);
    format!(
        "IUCN {}. IUCN Red List of Threatened Species. Version {} <www.iucnredlist.org>",
        year, version
    )
}
