use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("userId is required")]
    MissingUserId,
    #[error("invalid limit {0:?}: must be a non-negative integer")]
    InvalidLimit(String),
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
}

/// Presence check for the sync payload's `userId`. Whitespace-only values
/// count as missing.
pub fn require_user_id(user_id: Option<&str>) -> Result<&str, ValidationError> {
    match user_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ValidationError::MissingUserId),
    }
}

/// Parses a `limit` query parameter, falling back to `default` when absent.
pub fn parse_limit(raw: Option<&str>, default: i64) -> Result<i64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|limit| *limit >= 0)
        .ok_or_else(|| ValidationError::InvalidLimit(raw.to_owned()))
}
