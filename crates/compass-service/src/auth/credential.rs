//! Credential store: user creation and password-based verification.

use compass_db::db::enums::Role;
use compass_db::model::user::{NewUser, User};

use crate::error::{ServiceError, ServiceResult};
use crate::store::AuthStore;

use super::password;

/// Everything a signup needs. The plaintext password only lives in this
/// struct on its way to the hasher.
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

/// ## Summary
/// Fetches a user by the email/role pair, hash included.
///
/// ## Errors
/// Returns an error if the lookup fails.
pub async fn find_by_email_and_role(
    store: &dyn AuthStore,
    email: &str,
    role: Role,
) -> ServiceResult<Option<User>> {
    store.find_user_by_email_and_role(email, role).await
}

/// ## Summary
/// Creates a user: uniqueness pre-checks, password hashing, insert.
///
/// A signup racing this one can still violate a constraint at the storage
/// layer; the store surfaces that as the same conflict errors the
/// pre-checks produce.
///
/// ## Side Effects
/// Persists a user row. Role and id are immutable afterwards.
///
/// ## Errors
/// Returns `DuplicateEmail` or `DuplicateUsername` on conflicts,
/// `ValidationError` on empty required fields, or a storage error.
#[tracing::instrument(skip(store, input), fields(email = %input.email, role = %input.role))]
pub async fn create_user(store: &dyn AuthStore, input: SignupInput) -> ServiceResult<User> {
    if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
        return Err(ServiceError::ValidationError(
            "Username, email, and password are required".to_string(),
        ));
    }

    if store.find_user_by_email(&input.email).await?.is_some() {
        return Err(ServiceError::DuplicateEmail);
    }
    if store
        .find_user_by_username(&input.username)
        .await?
        .is_some()
    {
        return Err(ServiceError::DuplicateUsername);
    }

    let password_hash = password::hash_password(&input.password)?;

    let user = store
        .insert_user(NewUser {
            username: input.username,
            email: input.email,
            password_hash,
            role: input.role,
            avatar_url: input.avatar_url,
        })
        .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User created");

    Ok(user)
}

/// ## Summary
/// Verifies an email/password/role triple against the stored hash.
///
/// Unknown email, wrong role, and wrong password all collapse into one
/// `InvalidCredentials` so the response never reveals which part failed.
///
/// ## Errors
/// Returns `InvalidCredentials` on any mismatch, or a storage error.
#[tracing::instrument(skip(store, password), fields(email = %email, role = %role))]
pub async fn login(
    store: &dyn AuthStore,
    email: &str,
    password: &str,
    role: Role,
) -> ServiceResult<User> {
    let Some(user) = store.find_user_by_email_and_role(email, role).await? else {
        tracing::debug!("Login attempt for unknown email/role pair");
        return Err(ServiceError::InvalidCredentials);
    };

    password::verify_password(password, &user.password_hash)?;

    tracing::debug!(user_id = user.id, "Login verified");

    Ok(user)
}
