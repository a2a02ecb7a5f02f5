use diesel::prelude::*;

use crate::db::schema;
use crate::model::user::User;

/// A session row. Every column is supplied at creation, so the same struct
/// serves both insert and query paths.
#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Insertable, Associations,
)]
#[diesel(table_name = schema::user_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(primary_key(token))]
#[diesel(belongs_to(User, foreign_key = user_id))]
pub struct Session {
    pub token: String,
    pub user_id: i32,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    /// A session past its expiry instant never resolves to an identity.
    #[must_use]
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.expires_at <= now
    }
}
