//! Session store: opaque tokens bound to a user id and an absolute expiry.

use chrono::{Duration, Utc};

use compass_db::model::session::Session;

use crate::error::ServiceResult;
use crate::store::AuthStore;

/// ## Summary
/// Mints a session: a v4 UUID token with `expires_at = now + ttl`.
/// The TTL is absolute; nothing in this layer renews it.
///
/// ## Side Effects
/// Persists the session row.
///
/// ## Errors
/// Returns an error if the insert fails.
#[tracing::instrument(skip(store))]
pub async fn create_session(
    store: &dyn AuthStore,
    user_id: i32,
    ttl: Duration,
) -> ServiceResult<String> {
    let token = uuid::Uuid::new_v4().to_string();
    let expires_at = Utc::now() + ttl;

    store
        .insert_session(Session {
            token: token.clone(),
            user_id,
            expires_at,
        })
        .await?;

    tracing::debug!(user_id, %expires_at, "Session created");

    Ok(token)
}

/// ## Summary
/// Looks up a session token. A row found past its expiry is deleted on the
/// spot and reported as absent (lazy expiry; there is no sweeper, so
/// storage may transiently hold expired rows nobody has looked at yet).
///
/// ## Errors
/// Returns an error if the lookup or the expiry cleanup fails.
pub async fn resolve_token(store: &dyn AuthStore, token: &str) -> ServiceResult<Option<Session>> {
    let Some(session) = store.find_session(token).await? else {
        return Ok(None);
    };

    if session.is_expired_at(Utc::now()) {
        tracing::debug!(user_id = session.user_id, "Expired session deleted on lookup");
        store.delete_session(token).await?;
        return Ok(None);
    }

    Ok(Some(session))
}

/// ## Summary
/// Deletes a session. Idempotent; an absent token is not an error.
///
/// ## Errors
/// Returns an error if the delete fails.
pub async fn delete_session(store: &dyn AuthStore, token: &str) -> ServiceResult<()> {
    store.delete_session(token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryAuthStore;

    #[tokio::test]
    async fn test_create_then_resolve() {
        let store = MemoryAuthStore::new();
        let token = create_session(&store, 7, Duration::days(1))
            .await
            .expect("create session");

        let session = resolve_token(&store, &token)
            .await
            .expect("resolve")
            .expect("session should be live");
        assert_eq!(session.user_id, 7);
        assert!(session.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_expired_session_resolves_to_none_and_is_deleted() {
        let store = MemoryAuthStore::new();

        // Plant a row that is already past its expiry.
        store
            .insert_session(Session {
                token: "stale".to_string(),
                user_id: 7,
                expires_at: Utc::now() - Duration::seconds(1),
            })
            .await
            .expect("insert");

        assert!(
            resolve_token(&store, "stale")
                .await
                .expect("resolve")
                .is_none()
        );

        // Lazy expiry removed the row itself.
        assert!(
            store
                .find_session("stale")
                .await
                .expect("find")
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_deleted_token_never_resolves_again() {
        let store = MemoryAuthStore::new();
        let token = create_session(&store, 7, Duration::days(1))
            .await
            .expect("create session");

        delete_session(&store, &token).await.expect("delete");
        assert!(
            resolve_token(&store, &token)
                .await
                .expect("resolve")
                .is_none()
        );

        // Deleting again is a no-op.
        delete_session(&store, &token).await.expect("second delete");
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let store = MemoryAuthStore::new();
        assert!(
            resolve_token(&store, "no-such-token")
                .await
                .expect("resolve")
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_concurrent_sessions_are_distinct() {
        let store = MemoryAuthStore::new();

        let (a, b, c) = tokio::join!(
            create_session(&store, 1, Duration::days(1)),
            create_session(&store, 1, Duration::days(1)),
            create_session(&store, 2, Duration::days(1)),
        );
        let (a, b, c) = (a.expect("a"), b.expect("b"), c.expect("c"));

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);

        // Deleting one session leaves the others alone.
        delete_session(&store, &a).await.expect("delete a");
        assert!(resolve_token(&store, &b).await.expect("b").is_some());
        assert!(resolve_token(&store, &c).await.expect("c").is_some());
    }
}
