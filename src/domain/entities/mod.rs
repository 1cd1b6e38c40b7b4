//! Core domain entities.
//!
//! [`UrlMapping`] is the only persisted entity; [`NewUrlMapping`] carries the
//! fields supplied on creation (the store assigns id and timestamps).

pub mod url_mapping;

pub use url_mapping::{NewUrlMapping, UrlMapping};
