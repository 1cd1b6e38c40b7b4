//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation with collision retry
//! - [`url_validator`] - URL acceptance rules
//! - [`request_info`] - Client IP and public base URL from request headers
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod request_info;
pub mod url_validator;
