//! Postgres-backed `AuthStore` over the shared connection pool.

use salvo::async_trait;

use compass_db::db::connection::{DbConnection, DbPool};
use compass_db::db::enums::Role;
use compass_db::db::query;
use compass_db::error::DbError;
use compass_db::model::session::Session;
use compass_db::model::user::{NewUser, User};

use crate::error::{ServiceError, ServiceResult};

use super::AuthStore;

#[derive(Clone)]
pub struct PgAuthStore {
    pool: DbPool,
}

impl PgAuthStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> ServiceResult<DbConnection<'_>> {
        Ok(self.pool.get().await.map_err(DbError::from)?)
    }
}

#[async_trait]
impl AuthStore for PgAuthStore {
    async fn find_user_by_id(&self, id: i32) -> ServiceResult<Option<User>> {
        let mut conn = self.conn().await?;
        Ok(query::user::find_by_id(&mut conn, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let mut conn = self.conn().await?;
        Ok(query::user::find_by_email(&mut conn, email).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let mut conn = self.conn().await?;
        Ok(query::user::find_by_username(&mut conn, username).await?)
    }

    async fn find_user_by_email_and_role(
        &self,
        email: &str,
        role: Role,
    ) -> ServiceResult<Option<User>> {
        let mut conn = self.conn().await?;
        Ok(query::user::find_by_email_and_role(&mut conn, email, role).await?)
    }

    async fn insert_user(&self, new_user: NewUser) -> ServiceResult<User> {
        let mut conn = self.conn().await?;
        query::user::insert(&mut conn, &new_user)
            .await
            .map_err(map_unique_violation)
    }

    async fn find_session(&self, token: &str) -> ServiceResult<Option<Session>> {
        let mut conn = self.conn().await?;
        Ok(query::session::find_by_token(&mut conn, token).await?)
    }

    async fn insert_session(&self, session: Session) -> ServiceResult<()> {
        let mut conn = self.conn().await?;
        Ok(query::session::insert(&mut conn, &session).await?)
    }

    async fn delete_session(&self, token: &str) -> ServiceResult<()> {
        let mut conn = self.conn().await?;
        Ok(query::session::delete_by_token(&mut conn, token).await?)
    }
}

/// A concurrent signup can slip past the pre-insert uniqueness checks and
/// hit the database constraint instead; both paths must surface the same
/// signup-conflict errors.
fn map_unique_violation(err: DbError) -> ServiceError {
    if let DbError::DatabaseError(diesel::result::Error::DatabaseError(
        diesel::result::DatabaseErrorKind::UniqueViolation,
        ref info,
    )) = err
    {
        tracing::debug!(constraint = ?info.constraint_name(), "User insert hit unique constraint");
        return match info.constraint_name() {
            Some(name) if name.contains("username") => ServiceError::DuplicateUsername,
            _ => ServiceError::DuplicateEmail,
        };
    }

    err.into()
}
