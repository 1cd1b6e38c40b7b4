//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies and query strings are deserialized with Serde; URL rules are
//! applied by the shortening service rather than declared on the DTOs.

pub mod health;
pub mod pagination;
pub mod shorten;
pub mod stats;
pub mod stats_list;
