//! User repository - persistence of `User` records.
//!
//! Queries are written once against `ConnectionTrait` so the pooled store and
//! the transaction-scoped repository share them.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult, OptionExt};

/// Column changes for an existing user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by (already normalized) email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new active user
    async fn create(&self, email: String, password_hash: String, name: String) -> AppResult<User>;

    /// Apply changes to an existing user
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;
}

/// Connection-pool backed implementation of `UserRepository`.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        queries::find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        queries::find_by_email(&self.db, email).await
    }

    async fn create(&self, email: String, password_hash: String, name: String) -> AppResult<User> {
        queries::create(&self.db, email, password_hash, name).await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        queries::update(&self.db, id, changes).await
    }
}

/// Map write errors, turning a unique-index violation into a duplicate email.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::duplicate("email"),
        _ => AppError::from(err),
    }
}

pub(crate) mod queries {
    use super::*;

    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<User>> {
        let model = UserEntity::find_by_id(id).one(conn).await?;
        Ok(model.map(User::from))
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        conn: &C,
        email: &str,
    ) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await?;
        Ok(model.map(User::from))
    }

    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        email: String,
        password_hash: String,
        name: String,
    ) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            name: Set(name),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(conn).await.map_err(map_write_err)?;
        Ok(User::from(model))
    }

    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        changes: UserChanges,
    ) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(conn).await.map_err(map_write_err)?;
        Ok(User::from(model))
    }
}
