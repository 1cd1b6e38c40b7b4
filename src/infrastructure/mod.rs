//! Adapters behind the domain traits.
//!
//! - [`cache`] - redirect cache (Redis or disabled)
//! - [`persistence`] - mapping store (PostgreSQL or in-memory)

pub mod cache;
pub mod persistence;
