//! URL handling module for Weir
//!
//! This module provides host extraction, fragment handling and query
//! parameter grouping used by the extractor and the admission filter.

mod domain;
mod normalize;
mod query;

pub use domain::extract_host;
pub use normalize::{is_self_fragment, parse_absolute, strip_fragment};
pub use query::QueryParams;
