use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::ops::Deref;

use crate::database::models::User;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "X-Api-Token";

/// The user resolved from a validated session token, injected as a request
/// extension and taken by handlers as `Extension<AuthUser>`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl Deref for AuthUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

/// Validate the session token, load its user and attach it to the request.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(request.headers())?;
    let claims = state.tokens.validate(token)?;

    let user = match state.store.users.select_id(claims.id).await {
        Ok(user) => user,
        Err(DatabaseError::NotFound(_)) => {
            tracing::warn!("Token for unknown user {}", claims.id);
            return Err(ApiError::unauthorized());
        }
        Err(e) => return Err(e.into()),
    };

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

/// Reject authenticated users without the admin flag. Must run after [`jwt_auth_middleware`].
pub async fn admin_auth_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let is_admin = request
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.is_admin)
        .ok_or_else(ApiError::unauthorized)?;

    if !is_admin {
        tracing::warn!("Non-admin user attempted admin route {}", request.uri().path());
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(request).await)
}

fn extract_token_from_headers(headers: &HeaderMap) -> Result<&str, ApiError> {
    let token = headers
        .get(TOKEN_HEADER)
        .ok_or_else(ApiError::unauthorized)?
        .to_str()
        .map_err(|_| ApiError::unauthorized())?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized());
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_or_empty_header_is_unauthorized() {
        let headers = HeaderMap::new();
        assert!(matches!(extract_token_from_headers(&headers), Err(ApiError::Unauthorized(_))));

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("  "));
        assert!(matches!(extract_token_from_headers(&headers), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-token", HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(extract_token_from_headers(&headers).unwrap(), "abc.def.ghi");
    }
}
