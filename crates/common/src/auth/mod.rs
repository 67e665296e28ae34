//! Actor extraction
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the acting user is carried in the `x-user-id` header.

use crate::errors::{AppError, Result};
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user performing a request, if one could be identified
#[derive(Debug, Clone, Default)]
pub struct Actor {
    /// Set only when the header holds a well-formed id
    pub user_id: Option<Uuid>,
}

/// Parse a raw header value into a user id; malformed values mean "no actor"
pub fn parse_user_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Axum extractor for Actor. Never rejects.
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_user_id);

        Ok(Actor { user_id })
    }
}
