use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::error::AppError;

lazy_static! {
    // Hyphenated UUID, the only identifier form the store hands out.
    static ref RECORD_ID_REGEX: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
}

/// Returns true when `raw` matches the store's identifier grammar.
pub fn is_valid_record_id(raw: &str) -> bool {
    RECORD_ID_REGEX.is_match(raw)
}

/// Parses a path segment into a record identifier.
///
/// Must be called before any store lookup: a string that fails the grammar is a
/// caller error (`AppError::MalformedId`), never a "not found".
pub fn parse_record_id(raw: &str) -> Result<Uuid, AppError> {
    if !is_valid_record_id(raw) {
        return Err(AppError::MalformedId(raw.to_string()));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId(raw.to_string()))
}
