//! User service - account creation and profile management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{normalize_email, Password, ProfileChanges, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{UnitOfWork, UserChanges};
use crate::with_transaction;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Self-service registration: applies the password policy, then creates
    /// the account.
    async fn register(&self, email: String, password: String, name: String) -> AppResult<User>;

    /// Create an account without the password policy (CLI, fixtures).
    async fn create_user(&self, email: String, password: String, name: String) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Apply a partial profile update; a new password is re-hashed.
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    /// Activate or deactivate the account registered under `email`.
    async fn set_active(&self, email: String, active: bool) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(&self, email: String, password: String, name: String) -> AppResult<User> {
        Password::check_policy(&password)?;
        self.create_user(email, password, name).await
    }

    async fn create_user(&self, email: String, password: String, name: String) -> AppResult<User> {
        let email = normalize_email(&email);
        if email.is_empty() {
            return Err(AppError::validation("The given email must be set"));
        }

        let users = self.uow.users();
        // The unique index still catches a concurrent insert of the same email
        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate("email"));
        }

        let password_hash = Password::from_plain(&password)?.into_string();
        let user = users.create(email, password_hash, name).await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        if changes.is_empty() {
            return self.get_user(id).await;
        }

        let password_hash = match changes.password {
            Some(plain) => Some(Password::new(&plain)?.into_string()),
            None => None,
        };
        let password_changed = password_hash.is_some();
        let update = UserChanges {
            name: changes.name,
            password_hash,
            is_active: None,
        };

        let user: User = with_transaction!(self.uow, |ctx| ctx.users().update(id, update).await)?;

        tracing::info!(user_id = %user.id, password_changed, "Profile updated");
        Ok(user)
    }

    async fn set_active(&self, email: String, active: bool) -> AppResult<User> {
        let email = normalize_email(&email);

        let user: User = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            let user = users
                .find_by_email(&email)
                .await?
                .ok_or_not_found()?;
            users
                .update(
                    user.id,
                    UserChanges {
                        is_active: Some(active),
                        ..Default::default()
                    },
                )
                .await
        })?;

        tracing::info!(user_id = %user.id, active, "Account activation changed");
        Ok(user)
    }
}
