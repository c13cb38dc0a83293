//! Token authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::{BEARER_SCHEME, TOKEN_SCHEME};
use crate::domain::User;
use crate::errors::AppError;

/// Authenticated user resolved from the request token
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Token authentication middleware.
///
/// Reads `Authorization: Token <token>` (or `Bearer <token>`), resolves it to
/// an active user and injects `CurrentUser` into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers()).ok_or(AppError::Unauthorized)?;

    let user = state.auth_service.authenticate(token).await?;
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Pull the credential out of the Authorization header.
///
/// The scheme keyword is case-insensitive.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;

    let known = [TOKEN_SCHEME, BEARER_SCHEME]
        .iter()
        .any(|expected| scheme.eq_ignore_ascii_case(expected));
    if !known {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_token_scheme() {
        assert_eq!(extract_token(&headers("Token abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_bearer_scheme() {
        assert_eq!(extract_token(&headers("Bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(extract_token(&headers("token abc.def")), Some("abc.def"));
        assert_eq!(extract_token(&headers("BEARER abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_unknown_scheme_or_missing_header() {
        assert_eq!(extract_token(&headers("Basic Zm9vOmJhcg==")), None);
        assert_eq!(extract_token(&headers("Token ")), None);
        assert_eq!(extract_token(&headers("Token")), None);
        assert_eq!(extract_token(&headers("Tokenabc")), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
