//! Named endpoint functions
//!
//! Each submodule adds methods to [`RedListClient`](crate::RedListClient)
//! that validate their arguments, pick the endpoint path and hand off to
//! the request pipeline.

pub mod assessment;
pub mod codes;
pub mod information;
pub mod taxa;

pub use assessment::extract;
pub use codes::{normalize_code, Vocabulary};
pub use taxa::Rank;
