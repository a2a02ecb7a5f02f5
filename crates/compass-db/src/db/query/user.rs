//! Low-level queries against the `users` relation.

use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::enums::Role;
use crate::db::schema;
use crate::error::DbResult;
use crate::model::user::{NewUser, User};

/// ## Summary
/// Fetches a user by numeric id.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: i32) -> DbResult<Option<User>> {
    Ok(schema::users::table
        .filter(schema::users::id.eq(id))
        .select(User::as_select())
        .first::<User>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Fetches a user by email, regardless of role.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn find_by_email(conn: &mut DbConnection<'_>, email: &str) -> DbResult<Option<User>> {
    Ok(schema::users::table
        .filter(schema::users::email.eq(email))
        .select(User::as_select())
        .first::<User>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Fetches a user by username.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn find_by_username(
    conn: &mut DbConnection<'_>,
    username: &str,
) -> DbResult<Option<User>> {
    Ok(schema::users::table
        .filter(schema::users::username.eq(username))
        .select(User::as_select())
        .first::<User>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Fetches a user by the email/role pair used at login. A matching email
/// under the wrong role yields `None`, like an unknown email.
///
/// ## Errors
/// Returns an error if the query fails.
pub async fn find_by_email_and_role(
    conn: &mut DbConnection<'_>,
    email: &str,
    role: Role,
) -> DbResult<Option<User>> {
    Ok(schema::users::table
        .filter(schema::users::email.eq(email))
        .filter(schema::users::role.eq(role))
        .select(User::as_select())
        .first::<User>(conn)
        .await
        .optional()?)
}

/// ## Summary
/// Inserts a user row and returns it with its assigned id.
///
/// ## Errors
/// Returns the raw diesel error; unique-violation mapping happens in the
/// service layer, which knows the constraint names.
pub async fn insert(conn: &mut DbConnection<'_>, new_user: &NewUser) -> DbResult<User> {
    Ok(diesel::insert_into(schema::users::table)
        .values(new_user)
        .returning(User::as_select())
        .get_result::<User>(conn)
        .await?)
}
