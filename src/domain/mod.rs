//! Domain layer - Core entities and value objects
//!
//! Independent of infrastructure concerns; only depends on error types.

pub mod email;
pub mod password;
pub mod user;

pub use email::normalize_email;
pub use password::Password;
pub use user::{ProfileChanges, User, UserResponse};
