//! Classification-scheme endpoints (habitats, threats, countries, ...)
//!
//! Every scheme offers the same two calls: list its codes, or list the
//! assessments filed under one code.

use std::fmt;
use std::str::FromStr;

use crate::client::RedListClient;
use crate::error::{RedListError, Result};
use crate::parse::Parsed;
use crate::types::{AssessmentQuery, Query};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    Habitats,
    Threats,
    Countries,
    Research,
    ConservationActions,
    UseAndTrade,
    Stresses,
    Systems,
    Scopes,
    PopulationTrends,
    GrowthForms,
    Faos,
    BiogeographicalRealms,
    RedListCategories,
    ComprehensiveGroups,
}

impl Vocabulary {
    pub const ALL: [Vocabulary; 15] = [
        Vocabulary::Habitats,
        Vocabulary::Threats,
        Vocabulary::Countries,
        Vocabulary::Research,
        Vocabulary::ConservationActions,
        Vocabulary::UseAndTrade,
        Vocabulary::Stresses,
        Vocabulary::Systems,
        Vocabulary::Scopes,
        Vocabulary::PopulationTrends,
        Vocabulary::GrowthForms,
        Vocabulary::Faos,
        Vocabulary::BiogeographicalRealms,
        Vocabulary::RedListCategories,
        Vocabulary::ComprehensiveGroups,
    ];

    /// Endpoint path segment
    pub fn path(&self) -> &'static str {
        match self {
            Self::Habitats => "habitats",
            Self::Threats => "threats",
            Self::Countries => "countries",
            Self::Research => "research",
            Self::ConservationActions => "conservation_actions",
            Self::UseAndTrade => "use_and_trade",
            Self::Stresses => "stresses",
            Self::Systems => "systems",
            Self::Scopes => "scopes",
            Self::PopulationTrends => "population_trends",
            Self::GrowthForms => "growth_forms",
            Self::Faos => "faos",
            Self::BiogeographicalRealms => "biogeographical_realms",
            Self::RedListCategories => "red_list_categories",
            Self::ComprehensiveGroups => "comprehensive_groups",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Vocabulary {
    type Err = RedListError;

    /// Accepts the path segment, with `-` allowed in place of `_`
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|v| v.path() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|v| v.path()).collect();
                RedListError::Validation(format!(
                    "unknown vocabulary '{}'; valid names: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

/// Codes are written with dots (`1.1`) but the API wants underscores (`1_1`)
pub fn normalize_code(code: &str) -> String {
    code.trim().replace('.', "_")
}

impl RedListClient {
    /// All codes in a classification scheme: `{vocabulary}`
    pub async fn list_codes(&self, vocabulary: Vocabulary, flatten: bool) -> Result<Parsed> {
        self.fetch(vocabulary.path(), &Query::new(), flatten).await
    }

    /// Assessments filed under one code: `{vocabulary}/{code}`
    pub async fn assessments_for_code(
        &self,
        vocabulary: Vocabulary,
        code: &str,
        q: &AssessmentQuery,
    ) -> Result<Parsed> {
        let code = normalize_code(validation::non_empty("code", code)?);
        self.fetch_assessments(&format!("{}/{}", vocabulary.path(), code), q)
            .await
    }

    /// Codes when `code` is `None`, otherwise that code's assessments
    pub async fn codes(
        &self,
        vocabulary: Vocabulary,
        code: Option<&str>,
        q: &AssessmentQuery,
    ) -> Result<Parsed> {
        match code {
            None => self.list_codes(vocabulary, q.flatten).await,
            Some(code) => self.assessments_for_code(vocabulary, code, q).await,
        }
    }

    pub async fn habitats(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::Habitats, code, q).await
    }

    pub async fn threats(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::Threats, code, q).await
    }

    pub async fn countries(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::Countries, code, q).await
    }

    pub async fn research(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::Research, code, q).await
    }

    pub async fn conservation_actions(
        &self,
        code: Option<&str>,
        q: &AssessmentQuery,
    ) -> Result<Parsed> {
        self.codes(Vocabulary::ConservationActions, code, q).await
    }

    pub async fn use_and_trade(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::UseAndTrade, code, q).await
    }

    pub async fn stresses(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::Stresses, code, q).await
    }

    pub async fn systems(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::Systems, code, q).await
    }

    pub async fn scopes(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::Scopes, code, q).await
    }

    pub async fn population_trends(
        &self,
        code: Option<&str>,
        q: &AssessmentQuery,
    ) -> Result<Parsed> {
        self.codes(Vocabulary::PopulationTrends, code, q).await
    }

    pub async fn growth_forms(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::GrowthForms, code, q).await
    }

    pub async fn faos(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::Faos, code, q).await
    }

    pub async fn realms(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::BiogeographicalRealms, code, q).await
    }

    pub async fn categories(&self, code: Option<&str>, q: &AssessmentQuery) -> Result<Parsed> {
        self.codes(Vocabulary::RedListCategories, code, q).await
    }

    pub async fn comprehensive_groups(
        &self,
        group: Option<&str>,
        q: &AssessmentQuery,
    ) -> Result<Parsed> {
        self.codes(Vocabulary::ComprehensiveGroups, group, q).await
    }
}
