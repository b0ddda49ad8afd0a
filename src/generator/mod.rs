//! Companion for the external problem-generation service: builds the
//! `specification` request URL and optionally fetches the result.

pub mod spec;

use std::time::Duration;

use crate::problem::loader::{LoadError, fetch_url};

pub use spec::{ConceptFlag, GeneratorSpec, pretty_body};

/// GET the generation URL and return the (pretty-printed when JSON) body.
pub fn fetch_generated(url: &str, timeout: Duration) -> Result<String, LoadError> {
    tracing::info!(%url, "requesting generated problems");
    let body = fetch_url(url, timeout)?;
    Ok(pretty_body(&body))
}
