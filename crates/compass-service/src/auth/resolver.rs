//! Session resolver: from a raw cookie value to an `Identity`, or nothing.

use crate::error::ServiceResult;
use crate::store::AuthStore;

use super::{Identity, session};

/// ## Summary
/// Resolves a request's session cookie to the authenticated identity.
///
/// Missing cookie, unknown token, expired token, and a session whose user
/// no longer exists all yield `Ok(None)`. Orphaned and expired sessions are
/// deleted when encountered; those are the only side effects, so this is
/// safe to call on every request.
///
/// Callers on the request path treat `Err` as "no identity" (fail closed).
///
/// ## Errors
/// Returns an error if a storage call fails.
#[tracing::instrument(skip(store, raw_cookie), fields(has_cookie = raw_cookie.is_some()))]
pub async fn resolve_session(
    store: &dyn AuthStore,
    raw_cookie: Option<&str>,
) -> ServiceResult<Option<Identity>> {
    let Some(token) = raw_cookie.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let Some(session) = session::resolve_token(store, token).await? else {
        return Ok(None);
    };

    let Some(user) = store.find_user_by_id(session.user_id).await? else {
        tracing::warn!(
            user_id = session.user_id,
            "Session references a missing user; deleting the orphaned session"
        );
        store.delete_session(token).await?;
        return Ok(None);
    };

    Ok(Some(Identity::from(user)))
}
