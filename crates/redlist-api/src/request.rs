//! Request composition: URL, query and headers for one GET

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::types::{Credential, Query};

/// Base URL for the IUCN Red List API v4
pub const DEFAULT_BASE_URL: &str = "https://api.iucnredlist.org/api/v4";

/// Identifying User-Agent sent with every request
pub const USER_AGENT: &str = concat!(
    "redlist-api/",
    env!("CARGO_PKG_VERSION"),
    " (rust; reqwest)"
);

/// Transport-level settings handed to the HTTP layer without interpretation
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
    pub headers: Vec<(String, String)>,
}

/// A fully composed GET request
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Replace every whitespace character in an endpoint path with `%20`
pub fn encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_whitespace() {
            out.push_str("%20");
        } else {
            out.push(c);
        }
    }
    out
}

/// Compose the request for `path` under `base_url`
pub fn build(
    base_url: &str,
    path: &str,
    credential: &Credential,
    query: &Query,
    options: &TransportOptions,
) -> Result<Request> {
    let full = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        encode_path(path.trim_start_matches('/'))
    );
    let mut url = Url::parse(&full)?;

    let pairs = query.pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    let mut headers = vec![
        ("Authorization".to_string(), credential.as_str().to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ];
    headers.extend(options.headers.iter().cloned());

    Ok(Request {
        url,
        headers,
        timeout: options.timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cred() -> Credential {
        Credential::new("token-123").unwrap()
    }

    #[test]
    fn test_encode_path_spaces() {
        assert_eq!(
            encode_path("taxa/family/Felidae Cats"),
            "taxa/family/Felidae%20Cats"
        );
        assert_eq!(encode_path("a\tb c"), "a%20b%20c");
    }

    #[test]
    fn test_build_joins_base_and_path() {
        let req = build(
            DEFAULT_BASE_URL,
            "species/id/12392",
            &cred(),
            &Query::new(),
            &TransportOptions::default(),
        )
        .unwrap();
        assert_eq!(
            req.url.as_str(),
            "https://api.iucnredlist.org/api/v4/species/id/12392"
        );
    }

    #[test]
    fn test_build_drops_unset_query_values() {
        let query = Query::new()
            .param("latest", Some(false))
            .param::<u32>("year_published", None)
            .param("page", Some(2u32));
        let req = build(
            "http://localhost:1234/api/v4/",
            "/habitats/1_1",
            &cred(),
            &query,
            &TransportOptions::default(),
        )
        .unwrap();
        assert_eq!(
            req.url.as_str(),
            "http://localhost:1234/api/v4/habitats/1_1?latest=false&page=2"
        );
    }

    #[test]
    fn test_build_sets_auth_and_user_agent() {
        let options = TransportOptions {
            headers: vec![("X-Trace".to_string(), "abc".to_string())],
            ..Default::default()
        };
        let req = build(DEFAULT_BASE_URL, "information/api_version", &cred(), &Query::new(), &options)
            .unwrap();
        assert_eq!(req.header("authorization"), Some("token-123"));
        assert!(req.header("user-agent").unwrap().starts_with("redlist-api/"));
        assert_eq!(req.header("x-trace"), Some("abc"));
    }
}
