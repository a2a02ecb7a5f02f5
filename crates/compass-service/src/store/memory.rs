//! In-memory `AuthStore` for tests and database-less development.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use salvo::async_trait;

use compass_db::db::enums::Role;
use compass_db::model::session::Session;
use compass_db::model::user::{NewUser, User};

use crate::error::{ServiceError, ServiceResult};

use super::AuthStore;

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<i32, User>,
    sessions: HashMap<String, Session>,
    next_user_id: i32,
}

/// Mutex-guarded maps. Uniqueness checks happen under the lock, so a pair
/// of racing signups observes the same one-wins outcome the database
/// constraints would give.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryAuthStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn find_user_by_id(&self, id: i32) -> ServiceResult<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email_and_role(
        &self,
        email: &str,
        role: Role,
    ) -> ServiceResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email && u.role == role)
            .cloned())
    }

    async fn insert_user(&self, new_user: NewUser) -> ServiceResult<User> {
        let mut state = self.lock();

        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(ServiceError::DuplicateEmail);
        }
        if state.users.values().any(|u| u.username == new_user.username) {
            return Err(ServiceError::DuplicateUsername);
        }

        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            avatar_url: new_user.avatar_url,
            created_at: chrono::Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_session(&self, token: &str) -> ServiceResult<Option<Session>> {
        Ok(self.lock().sessions.get(token).cloned())
    }

    async fn insert_session(&self, session: Session) -> ServiceResult<()> {
        self.lock().sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn delete_session(&self, token: &str) -> ServiceResult<()> {
        self.lock().sessions.remove(token);
        Ok(())
    }
}
