//! Classification of database errors raised by the mapping table.

use crate::domain::entities::NewUrlMapping;
use crate::error::AppError;

/// Unique constraint on `url_mappings.short_code`.
pub const SHORT_CODE_CONSTRAINT: &str = "url_mappings_short_code_key";

/// Unique index on `md5(url_mappings.original_url)`.
pub const ORIGINAL_URL_CONSTRAINT: &str = "url_mappings_original_url_key";

/// Returns the name of the violated unique constraint, if `e` is a unique violation.
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<&str> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    db_err.constraint()
}

/// Maps an insert failure to the matching duplicate error, or to an internal error.
pub fn map_insert_error(e: sqlx::Error, new_mapping: &NewUrlMapping) -> AppError {
    let constraint = unique_violation_constraint(&e).map(str::to_owned);

    match constraint.as_deref() {
        Some(SHORT_CODE_CONSTRAINT) => AppError::DuplicateCode {
            code: new_mapping.short_code.clone(),
        },
        Some(ORIGINAL_URL_CONSTRAINT) => AppError::DuplicateUrl {
            url: new_mapping.original_url.clone(),
        },
        _ => AppError::from(e),
    }
}
