//! Shared request types

use std::fmt;

/// An IUCN Red List API token
///
/// Never empty. `Debug` output is redacted so tokens don't leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token as given, rejecting empty or whitespace-only values
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A single query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl QueryValue {
    /// Wire encoding of the value (booleans as `true`/`false`)
    pub fn encode(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for QueryValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Query parameters for one request
///
/// Unset entries are kept so callers can pass optional arguments straight
/// through; they are dropped by [`Query::pairs`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    params: Vec<(String, Option<QueryValue>)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter; `None` values are recorded but never transmitted
    pub fn param<V: Into<QueryValue>>(mut self, name: &str, value: Option<V>) -> Self {
        self.set(name, value.map(Into::into));
        self
    }

    /// Set a parameter, replacing any existing entry with the same name
    pub fn set(&mut self, name: &str, value: Option<QueryValue>) {
        if let Some(slot) = self.params.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.params.push((name.to_string(), value));
        }
    }

    /// Copy of this query with `page` set to the given number
    pub fn with_page(&self, page: u32) -> Self {
        let mut q = self.clone();
        q.set("page", Some(QueryValue::from(page)));
        q
    }

    /// Encoded name/value pairs, with unset entries omitted
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.clone(), v.encode())))
            .collect()
    }
}

/// Which pages of a paged endpoint to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSelection {
    /// Walk every page and combine the results
    #[default]
    All,
    /// Fetch exactly one page
    Page(u32),
}

/// Filters and paging shared by every endpoint that lists assessments
#[derive(Debug, Clone)]
pub struct AssessmentQuery {
    pub year_published: Option<u32>,
    pub latest: Option<bool>,
    pub scope_code: Option<String>,
    pub pages: PageSelection,
    /// Suppress the per-page progress markers
    pub quiet: bool,
    /// Decode arrays of records as tables
    pub flatten: bool,
}

impl Default for AssessmentQuery {
    fn default() -> Self {
        Self {
            year_published: None,
            latest: None,
            scope_code: None,
            pages: PageSelection::All,
            quiet: false,
            flatten: true,
        }
    }
}

impl AssessmentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year_published(mut self, year: u32) -> Self {
        self.year_published = Some(year);
        self
    }

    pub fn with_latest(mut self, latest: bool) -> Self {
        self.latest = Some(latest);
        self
    }

    pub fn with_scope_code(mut self, code: impl Into<String>) -> Self {
        self.scope_code = Some(code.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.pages = PageSelection::Page(page);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    /// Filter parameters as sent to the API
    pub(crate) fn to_query(&self) -> Query {
        Query::new()
            .param("year_published", self.year_published)
            .param("latest", self.latest)
            .param("scope_code", self.scope_code.clone())
    }
}
