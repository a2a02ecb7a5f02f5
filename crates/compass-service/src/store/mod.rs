//! Storage seam for the auth core.
//!
//! ## Summary
//! The core needs exactly two relations: users and sessions. `AuthStore`
//! expresses every operation on them as an explicit `Result`-returning
//! call, so storage failures are visible in the type system and the domain
//! logic can run against any backing store. `PgAuthStore` is the production
//! implementation; `MemoryAuthStore` backs tests and database-less
//! development.

pub mod memory;
pub mod pg;

use salvo::async_trait;

use compass_db::db::enums::Role;
use compass_db::model::session::Session;
use compass_db::model::user::{NewUser, User};

use crate::error::ServiceResult;

pub use memory::MemoryAuthStore;
pub use pg::PgAuthStore;

/// Operations the auth core requires from its storage collaborator.
///
/// Implementations must tolerate concurrent use: session deletion is
/// idempotent and commutative, and duplicate user inserts surface as
/// `DuplicateEmail`/`DuplicateUsername`, never as a crash.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// ## Errors
    /// Returns an error if the lookup fails.
    async fn find_user_by_id(&self, id: i32) -> ServiceResult<Option<User>>;

    /// ## Errors
    /// Returns an error if the lookup fails.
    async fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    /// ## Errors
    /// Returns an error if the lookup fails.
    async fn find_user_by_username(&self, username: &str) -> ServiceResult<Option<User>>;

    /// ## Errors
    /// Returns an error if the lookup fails.
    async fn find_user_by_email_and_role(
        &self,
        email: &str,
        role: Role,
    ) -> ServiceResult<Option<User>>;

    /// ## Errors
    /// Returns `DuplicateEmail` or `DuplicateUsername` when a uniqueness
    /// constraint is violated, or another error if the insert fails.
    async fn insert_user(&self, new_user: NewUser) -> ServiceResult<User>;

    /// ## Errors
    /// Returns an error if the lookup fails.
    async fn find_session(&self, token: &str) -> ServiceResult<Option<Session>>;

    /// ## Errors
    /// Returns an error if the insert fails.
    async fn insert_session(&self, session: Session) -> ServiceResult<()>;

    /// Idempotent; deleting an absent token is not an error.
    ///
    /// ## Errors
    /// Returns an error if the delete fails.
    async fn delete_session(&self, token: &str) -> ServiceResult<()>;
}
