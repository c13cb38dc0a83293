//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    pub fn new(id: Uuid, email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            name,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial profile update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    /// New password in plain text; hashed by the service
    pub password: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserResponse {
    /// User email address
    #[schema(example = "reza@gmail.com")]
    pub email: String,
    /// User display name
    #[schema(example = "some name")]
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new(
            Uuid::new_v4(),
            "reza@gmail.com".to_string(),
            "hash".to_string(),
            "some name".to_string(),
        );
        assert!(user.is_active);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User::new(
            Uuid::new_v4(),
            "reza@gmail.com".to_string(),
            "$argon2id$secret".to_string(),
            "some name".to_string(),
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_response_has_only_email_and_name() {
        let user = User::new(
            Uuid::new_v4(),
            "reza@gmail.com".to_string(),
            "hash".to_string(),
            "some name".to_string(),
        );
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "reza@gmail.com", "name": "some name"})
        );
    }

    #[test]
    fn test_profile_changes_empty() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            name: Some("new".to_string()),
            password: None,
        };
        assert!(!changes.is_empty());
    }
}
