pub mod credential;
pub mod depot;
pub mod gatekeeper;
pub mod password;
pub mod resolver;
pub mod session;


use compass_core::util::idcodec::IdCodec;
use compass_db::db::enums::Role;
use compass_db::model::user::User;

/// The resolved identity for a request: who the session cookie says the
/// caller is. The password hash never crosses into this type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Identity {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

impl Identity {
    /// The opaque form of this identity's id, as it appears in URLs.
    #[must_use]
    pub fn encoded_id(&self, codec: &IdCodec) -> String {
        // Serial ids are always positive; unsigned_abs keeps this total.
        codec.encode(u64::from(self.id.unsigned_abs()))
    }
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            avatar_url: user.avatar_url,
        }
    }
}
