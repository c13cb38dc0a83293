//! Authentication service - token issuance and verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{normalize_email, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Plain text behind the hash verified when the email is unknown.
const DUMMY_PASSWORD: &str = "account-service-timing-equalizer";

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Opaque credential to send as `Authorization: Token <token>`
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange email and password for a token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify token signature and expiry and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a token to the active user it was issued for
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

/// Generate a signed token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = Duration::try_hours(config.token_expiration_hours())
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AppError::internal("Token expiry is out of range"))?;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse { token })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
    dummy_password: OnceLock<Password>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self {
            uow,
            config,
            dummy_password: OnceLock::new(),
        }
    }

    fn dummy_password(&self) -> AppResult<&Password> {
        if let Some(password) = self.dummy_password.get() {
            return Ok(password);
        }
        let password = Password::from_plain(DUMMY_PASSWORD)?;
        Ok(self.dummy_password.get_or_init(|| password))
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = normalize_email(&email);
        let user = self.uow.users().find_by_email(&email).await?;

        // Unknown emails still pay for one hash verification
        let password_valid = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()).verify(&password),
            None => {
                self.dummy_password()?.verify(&password);
                false
            }
        };

        match user {
            Some(user) if password_valid && user.is_active => {
                tracing::info!(user_id = %user.id, "Token issued");
                generate_token(&user, &self.config)
            }
            _ => {
                tracing::warn!(email = %email, "Token request rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;

        match self.uow.users().find_by_id(claims.sub).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEV_JWT_SECRET, MAX_TOKEN_EXPIRATION_HOURS};
    use crate::infra::{MockUserRepository, TransactionContext, TxFuture, UserRepository};

    struct TestUnitOfWork {
        user_repo: Arc<MockUserRepository>,
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.user_repo.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    fn config() -> Config {
        Config::new("sqlite::memory:", DEV_JWT_SECRET).unwrap()
    }

    fn authenticator(repo: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        let uow = Arc::new(TestUnitOfWork {
            user_repo: Arc::new(repo),
        });
        Authenticator::new(uow, config())
    }

    fn stored_user(email: &str, password: &str, is_active: bool) -> User {
        let hash = Password::from_plain(password).unwrap().into_string();
        let mut user = User::new(Uuid::new_v4(), email.to_string(), hash, String::new());
        user.is_active = is_active;
        user
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let user = stored_user("reza@gmail.com", "lfa", true);
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = authenticator(repo);
        let response = auth
            .login("reza@gmail.com".to_string(), "lfa".to_string())
            .await
            .unwrap();

        let claims = auth.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "reza@gmail.com");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("reza@gamil.com", "somthing", true);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator(repo)
            .login("reza@gamil.com".to_string(), "l;kajsdf".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let result = authenticator(repo)
            .login("reza@gmail.com".to_string(), "l;kajsdf".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_inactive_user() {
        let user = stored_user("reza@gmail.com", "fajshdlfk", false);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator(repo)
            .login("reza@gmail.com".to_string(), "fajshdlfk".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_normalizes_email_domain() {
        let user = stored_user("reza@gmail.com", "fajshdlfk", true);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "reza@gmail.com")
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator(repo)
            .login("reza@Gmail.COM".to_string(), "fajshdlfk".to_string())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_login_with_longest_token_lifetime() {
        let user = stored_user("reza@gmail.com", "lfa", true);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let config = config()
            .with_token_expiration_hours(MAX_TOKEN_EXPIRATION_HOURS)
            .unwrap();
        let auth = Authenticator::new(
            Arc::new(TestUnitOfWork {
                user_repo: Arc::new(repo),
            }),
            config,
        );

        let response = auth
            .login("reza@gmail.com".to_string(), "lfa".to_string())
            .await
            .unwrap();
        let claims = auth.verify_token(&response.token).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_TOKEN_EXPIRATION_HOURS * 3600);
    }

    #[test]
    fn test_verify_rejects_garbage_token() {
        let auth = authenticator(MockUserRepository::new());
        assert!(matches!(
            auth.verify_token("not-a-token"),
            Err(AppError::Jwt(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_deleted_user() {
        let user = stored_user("reza@gmail.com", "fajshdlfk", true);
        let token = generate_token(&user, &config()).unwrap().token;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = authenticator(repo).authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_returns_active_user() {
        let user = stored_user("reza@gmail.com", "fajshdlfk", true);
        let token = generate_token(&user, &config()).unwrap().token;
        let expected_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let resolved = authenticator(repo).authenticate(&token).await.unwrap();
        assert_eq!(resolved.id, expected_id);
    }
}
