//! Session cookie construction.
//!
//! The cookie is HttpOnly and SameSite=Lax, scoped to the whole site. Its
//! max-age matches the session TTL, so browser expiry and server expiry
//! line up (the server remains the authority either way).

use compass_core::config::AuthConfig;
use salvo::http::cookie::{Cookie, SameSite, time::Duration};

/// Builds the session cookie carrying `token`.
#[must_use]
pub fn session_cookie(auth: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(auth.cookie_secure)
        .max_age(Duration::seconds(auth.session_ttl_secs))
        .build()
}

/// Builds an expired, empty-valued cookie that instructs the browser to
/// drop the session cookie.
#[must_use]
pub fn removal_cookie(auth: &AuthConfig) -> Cookie<'static> {
    Cookie::build((auth.cookie_name.clone(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(auth.cookie_secure)
        .max_age(Duration::ZERO)
        .build()
}
