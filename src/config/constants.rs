//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default token expiration in hours
pub const DEFAULT_TOKEN_EXPIRATION_HOURS: i64 = 24;

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_EXPIRATION_HOURS: i64 = 24 * 365;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header scheme issued to clients (matched case-insensitively)
pub const TOKEN_SCHEME: &str = "Token";

/// Alternative authorization header scheme, also accepted
pub const BEARER_SCHEME: &str = "Bearer";

/// Secret used in debug builds when JWT_SECRET is unset
pub const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (for development)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://account.db?mode=rwc";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length enforced on registration and profile updates
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Maximum length of the email and name columns
pub const MAX_FIELD_LENGTH: u64 = 255;
