//! Taxon lookups: by scientific name, SIS id, or higher rank

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::client::RedListClient;
use crate::error::{RedListError, Result};
use crate::parse::Parsed;
use crate::types::{AssessmentQuery, Query};
use crate::validation;

/// Higher taxonomic ranks the API can list assessments for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
}

impl Rank {
    pub const ALL: [Rank; 5] = [
        Rank::Kingdom,
        Rank::Phylum,
        Rank::Class,
        Rank::Order,
        Rank::Family,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kingdom => "kingdom",
            Self::Phylum => "phylum",
            Self::Class => "class",
            Self::Order => "order",
            Self::Family => "family",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = RedListError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| RedListError::Validation(format!("unknown rank '{}'", s)))
    }
}

/// Assessment id of the entry flagged `latest`, from a nested species document
fn latest_assessment_id(doc: &Value) -> Option<u64> {
    doc.get("assessments")?
        .as_array()?
        .iter()
        .find(|a| a.get("latest").and_then(Value::as_bool).unwrap_or(false))?
        .get("assessment_id")?
        .as_u64()
}

impl RedListClient {
    /// Taxon and assessment summary for a species name
    ///
    /// `taxa/scientific_name?genus_name=..&species_name=..`
    pub async fn species(
        &self,
        genus: &str,
        species: &str,
        infra: Option<&str>,
        subpopulation: Option<&str>,
        flatten: bool,
    ) -> Result<Parsed> {
        let query = Query::new()
            .param("genus_name", Some(validation::non_empty("genus", genus)?))
            .param("species_name", Some(validation::non_empty("species", species)?))
            .param("infra_name", validation::optional_non_empty("infra", infra)?)
            .param(
                "subpopulation_name",
                validation::optional_non_empty("subpopulation", subpopulation)?,
            );
        self.fetch("taxa/scientific_name", &query, flatten).await
    }

    /// The most recent assessment for a species
    pub async fn species_latest(
        &self,
        genus: &str,
        species: &str,
        infra: Option<&str>,
        subpopulation: Option<&str>,
        flatten: bool,
    ) -> Result<Parsed> {
        let doc = match self.species(genus, species, infra, subpopulation, false).await? {
            Parsed::Nested(v) => v,
            Parsed::Flat(_) => return Err(RedListError::NotFound),
        };
        let id = latest_assessment_id(&doc).ok_or(RedListError::NotFound)?;
        debug!(genus, species, assessment_id = id, "Latest assessment");
        self.assessment(id, flatten).await
    }

    /// Taxon by SIS id: `taxa/sis/{id}`
    pub async fn sis(&self, id: u64, flatten: bool) -> Result<Parsed> {
        let id = validation::positive("id", id)?;
        self.fetch(&format!("taxa/sis/{}", id), &Query::new(), flatten)
            .await
    }

    /// Assessments under a higher taxon: `taxa/{rank}/{name}`
    pub async fn taxa(&self, rank: Rank, name: &str, q: &AssessmentQuery) -> Result<Parsed> {
        let name = validation::non_empty(rank.as_str(), name)?;
        self.fetch_assessments(&format!("taxa/{}/{}", rank.as_str(), name), q)
            .await
    }

    pub async fn kingdom(&self, name: &str, q: &AssessmentQuery) -> Result<Parsed> {
        self.taxa(Rank::Kingdom, name, q).await
    }

    pub async fn phylum(&self, name: &str, q: &AssessmentQuery) -> Result<Parsed> {
        self.taxa(Rank::Phylum, name, q).await
    }

    pub async fn class(&self, name: &str, q: &AssessmentQuery) -> Result<Parsed> {
        self.taxa(Rank::Class, name, q).await
    }

    pub async fn order(&self, name: &str, q: &AssessmentQuery) -> Result<Parsed> {
        self.taxa(Rank::Order, name, q).await
    }

    pub async fn family(&self, name: &str, q: &AssessmentQuery) -> Result<Parsed> {
        self.taxa(Rank::Family, name, q).await
    }

    /// Assessments of taxa flagged possibly extinct
    pub async fn possibly_extinct(&self, q: &AssessmentQuery) -> Result<Parsed> {
        self.fetch_assessments("taxa/possibly_extinct", q).await
    }

    /// Assessments of taxa flagged possibly extinct in the wild
    pub async fn possibly_extinct_in_the_wild(&self, q: &AssessmentQuery) -> Result<Parsed> {
        self.fetch_assessments("taxa/possibly_extinct_in_the_wild", q)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rank_from_str() {
        assert_eq!("Family".parse::<Rank>().unwrap(), Rank::Family);
        assert!("genus".parse::<Rank>().is_err());
    }

    #[test]
    fn test_latest_assessment_id() {
        let doc = json!({
            "assessments": [
                {"assessment_id": 10, "latest": false},
                {"assessment_id": 42, "latest": true}
            ]
        });
        assert_eq!(latest_assessment_id(&doc), Some(42));
        assert_eq!(latest_assessment_id(&json!({"assessments": []})), None);
    }
}
