//! Account handlers: registration, token issuance and the caller's profile.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::config::MAX_FIELD_LENGTH;
use crate::domain::{ProfileChanges, UserResponse};
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User email address
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = MAX_FIELD_LENGTH, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "reza@gmail.com")]
    pub email: String,
    /// User password (minimum 5 characters)
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    #[schema(example = "fajshdlfk", min_length = 5)]
    pub password: String,
    /// User display name
    #[validate(length(
        min = 1,
        max = MAX_FIELD_LENGTH,
        message = "Name must be 1 to 255 characters"
    ))]
    #[schema(example = "some name")]
    pub name: String,
}

/// Token request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TokenRequest {
    /// User email address
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "reza@gmail.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "fajshdlfk")]
    pub password: String,
}

/// Partial profile update; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(
        min = 1,
        max = MAX_FIELD_LENGTH,
        message = "Name must be 1 to 255 characters"
    ))]
    #[schema(example = "new name")]
    pub name: Option<String>,
    /// New password (minimum 5 characters)
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    #[schema(example = "newpassword123", min_length = 5)]
    pub password: Option<String>,
}

/// Strip surrounding whitespace before validation runs.
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Public account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_user))
        .route("/token", post(create_token))
}

/// Routes for the authenticated caller's own profile.
///
/// Authentication is a method-level route layer, so unsupported methods
/// answer 405 before credentials are checked.
pub fn profile_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        "/me",
        get(get_me)
            .patch(update_me)
            .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
    )
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/user/create",
    tag = "User",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .register(payload.email, payload.password, payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Obtain an authentication token
#[utoipa::path(
    post,
    path = "/user/token",
    tag = "User",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing fields or invalid credentials")
    )
)]
pub async fn create_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/user/me",
    tag = "User",
    security(("token_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn get_me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// Update the authenticated user's profile
#[utoipa::path(
    patch,
    path = "/user/me",
    tag = "User",
    security(("token_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let changes = ProfileChanges {
        name: payload.name,
        password: payload.password,
    };
    let user = state.user_service.update_profile(user.id, changes).await?;

    Ok(Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_short_password() {
        let request = CreateUserRequest {
            email: "reza@gmail.com".to_string(),
            password: "lfa".to_string(),
            name: "some name".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_invalid_email() {
        let request = CreateUserRequest {
            email: "not-an-email".to_string(),
            password: "fajshdlfk".to_string(),
            name: "some name".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_trims_email_before_validation() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "email": "  reza@gmail.com ",
            "password": "fajshdlfk",
            "name": "some name",
        }))
        .unwrap();

        assert_eq!(request.email, "reza@gmail.com");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_token_request_requires_password() {
        let request = TokenRequest {
            email: "reza@gmail.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_profile_update_is_valid() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }

    #[test]
    fn test_profile_update_checks_present_password() {
        let request = UpdateProfileRequest {
            name: None,
            password: Some("abc".to_string()),
        };
        assert!(request.validate().is_err());
    }
}
