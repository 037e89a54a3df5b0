//! Rust client for the IUCN Red List API (v4)
//!
//! Every call goes through one pipeline: resolve the API key, build the
//! request, GET it, classify the response, and decode the JSON either as
//! nested values or with arrays of records flattened into tables. Endpoints
//! that list assessments are paged; by default all pages are fetched one at
//! a time and their `assessments` concatenated.
//!
//! # Example
//!
//! ```no_run
//! use redlist_api::{AssessmentQuery, RedListClient};
//!
//! # async fn example() -> Result<(), redlist_api::RedListError> {
//! // Key from IUCN_REDLIST_KEY or the options file
//! let client = RedListClient::new()?;
//!
//! let lion = client.species("Panthera", "leo", None, None, false).await?;
//! println!("{}", lion.to_json());
//!
//! // Every assessment for habitat 1.1 published in 2023, as a table
//! let forest = client
//!     .habitats(Some("1.1"), &AssessmentQuery::new().with_year_published(2023))
//!     .await?;
//! println!("{} assessments", forest.record_count("assessments"));
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - `GET /taxa/scientific_name`, `/taxa/sis/{id}`, `/taxa/{rank}/{name}`
//! - `GET /taxa/possibly_extinct`, `/taxa/possibly_extinct_in_the_wild`
//! - `GET /assessment/{id}`
//! - `GET /{scheme}` and `/{scheme}/{code}` for habitats, threats, countries
//!   and the other classification schemes
//! - `GET /information/red_list_version`, `/information/api_version`,
//!   `/statistics/count`

mod client;
pub mod credential;
pub mod endpoints;
mod error;
pub mod options;
pub mod paginate;
pub mod parse;
pub mod request;
pub mod response;
pub mod transport;
mod types;
pub mod validation;

pub use client::{ClientConfig, RedListClient};
pub use endpoints::{extract, normalize_code, Rank, Vocabulary};
pub use error::{RedListError, Result, KEY_ENV_VAR};
pub use paginate::{combine, RECORD_FIELD};
pub use parse::{FlatObject, FlatValue, Parsed, Table};
pub use request::{TransportOptions, DEFAULT_BASE_URL};
pub use types::{AssessmentQuery, Credential, PageSelection, Query, QueryValue};
