// Handlers are grouped by the security tier of their routes:
// public (no token) → protected (X-Api-Token) → admin (token + admin flag).
pub mod admin;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id, rejecting anything that is not a UUID with 400.
pub(crate) fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::invalid_id())
}
