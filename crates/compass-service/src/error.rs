use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] compass_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] compass_core::error::CoreError),

    #[error("Not authenticated")]
    NotAuthenticated,

    /// Wrong email, password, or role. Deliberately undifferentiated so
    /// callers cannot enumerate accounts.
    #[error("Invalid email, password, or role")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl ServiceError {
    /// Signup conflicts are user-facing validation errors, not faults.
    #[must_use]
    pub const fn is_signup_conflict(&self) -> bool {
        matches!(self, Self::DuplicateEmail | Self::DuplicateUsername)
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
