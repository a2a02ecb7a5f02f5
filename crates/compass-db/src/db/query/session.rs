//! Low-level queries against the `user_sessions` relation.

use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema;
use crate::error::DbResult;
use crate::model::session::Session;

/// ## Summary
/// Fetches a session row by token. Expiry is not evaluated here; the
/// service layer owns the lazy-expiry policy.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn find_by_token(
    conn: &mut DbConnection<'_>,
    token: &str,
) -> DbResult<Option<Session>> {
    Ok(schema::user_sessions::table
        .filter(schema::user_sessions::token.eq(token))
        .select(Session::as_select())
        .first::<Session>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Inserts a session row.
///
/// ## Errors
/// Returns an error if the insert fails.
pub async fn insert(conn: &mut DbConnection<'_>, session: &Session) -> DbResult<()> {
    let _row_count = diesel::insert_into(schema::user_sessions::table)
        .values(session)
        .execute(conn)
        .await?;
    Ok(())
}

/// ## Summary
/// Deletes a session row by token. Deleting a token that does not exist is
/// not an error, which makes logout and lazy-expiry cleanup idempotent.
///
/// ## Errors
/// Returns an error if the delete fails.
pub async fn delete_by_token(conn: &mut DbConnection<'_>, token: &str) -> DbResult<()> {
    let deleted = diesel::delete(
        schema::user_sessions::table.filter(schema::user_sessions::token.eq(token)),
    )
    .execute(conn)
    .await?;

    tracing::trace!(deleted, "Session delete executed");
    Ok(())
}
