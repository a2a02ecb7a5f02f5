//! Route gatekeeper decision logic.
//!
//! ## Summary
//! Classifies request paths with an ordered first-match-wins rule table and
//! decides, per request, whether to let it through or redirect it. The
//! decision is a plain value; applying it (responses, cookies) is the HTTP
//! layer's job. Redirect targets are always computed from the *resolved*
//! identity, never from whatever the requested path claims.

use compass_core::constants::{
    AI_ROUTE_PREFIX, API_ROUTE_PREFIX, DASHBOARD_SEGMENT, HOME_PATH, LOGIN_ROUTE_COMPONENT,
    PROFILE_SEGMENT, SIGNUP_ROUTE_COMPONENT,
};
use compass_core::util::idcodec::IdCodec;
use compass_db::db::enums::Role;

use super::Identity;

/// What a path is, before any identity is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Internal AI-flow endpoints and static assets; no session check at all.
    Bypass,
    /// Login/signup screens; bounced to the caller's dashboard when a live
    /// session already exists.
    AuthEntry,
    /// Open to everyone.
    Public,
    /// Everything else; requires a resolved identity.
    Protected,
}

#[derive(Debug, Clone, Copy)]
enum Matcher {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Matcher {
    fn matches(self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == p,
            Self::Prefix(p) => path.starts_with(p),
        }
    }
}

const STUDENT_SEGMENT: &str = Role::Student.as_str();
const INSTRUCTOR_SEGMENT: &str = Role::Instructor.as_str();

/// Ordered rule table built from the shared route constants, so the table
/// cannot drift from the routes it guards. First match wins; anything
/// unmatched is protected.
const ROUTE_RULES: &[(Matcher, RouteClass)] = &[
    (
        Matcher::Prefix(const_str::concat!(AI_ROUTE_PREFIX, "/")),
        RouteClass::Bypass,
    ),
    (Matcher::Prefix("/static/"), RouteClass::Bypass),
    (Matcher::Prefix("/assets/"), RouteClass::Bypass),
    (Matcher::Exact("/favicon.ico"), RouteClass::Bypass),
    (
        Matcher::Exact(const_str::concat!(
            "/",
            LOGIN_ROUTE_COMPONENT,
            "/",
            STUDENT_SEGMENT
        )),
        RouteClass::AuthEntry,
    ),
    (
        Matcher::Exact(const_str::concat!(
            "/",
            LOGIN_ROUTE_COMPONENT,
            "/",
            INSTRUCTOR_SEGMENT
        )),
        RouteClass::AuthEntry,
    ),
    (
        Matcher::Exact(const_str::concat!(
            "/",
            SIGNUP_ROUTE_COMPONENT,
            "/",
            STUDENT_SEGMENT
        )),
        RouteClass::AuthEntry,
    ),
    (
        Matcher::Exact(const_str::concat!(
            "/",
            SIGNUP_ROUTE_COMPONENT,
            "/",
            INSTRUCTOR_SEGMENT
        )),
        RouteClass::AuthEntry,
    ),
    (Matcher::Exact(HOME_PATH), RouteClass::Public),
    (
        Matcher::Prefix(const_str::concat!(API_ROUTE_PREFIX, "/")),
        RouteClass::Public,
    ),
];

/// ## Summary
/// Classifies a request path against the rule table.
#[must_use]
pub fn classify(path: &str) -> RouteClass {
    for (matcher, class) in ROUTE_RULES {
        if matcher.matches(path) {
            return *class;
        }
    }
    RouteClass::Protected
}

/// The gatekeeper's verdict for one request, ready for the HTTP layer to
/// apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Let the request through.
    Allow,
    /// Redirect to `location`.
    Redirect { location: String },
    /// Redirect to `location` and clear the session cookie, which is
    /// present but useless.
    RedirectClearCookie { location: String },
}

/// ## Summary
/// Decides what happens to a request, given the (already resolved)
/// identity. `has_cookie` distinguishes "never logged in" from "stale
/// cookie" on protected paths; only the latter warrants cookie cleanup.
#[must_use]
pub fn decide(
    path: &str,
    has_cookie: bool,
    identity: Option<&Identity>,
    codec: &IdCodec,
) -> RouteDecision {
    match classify(path) {
        RouteClass::Bypass | RouteClass::Public => RouteDecision::Allow,

        RouteClass::AuthEntry => match identity {
            // Already logged in: bounce off the login/signup screen to the
            // caller's own dashboard.
            Some(identity) => RouteDecision::Redirect {
                location: dashboard_url(identity, codec),
            },
            None => RouteDecision::Allow,
        },

        RouteClass::Protected => match identity {
            Some(identity) => {
                if owner_scope_violated(path, identity, codec) {
                    // Wrong id, wrong role, or an undecodable token: all
                    // collapse into the same redirect so the response never
                    // says which check failed.
                    RouteDecision::Redirect {
                        location: dashboard_url(identity, codec),
                    }
                } else {
                    RouteDecision::Allow
                }
            }
            None if has_cookie => RouteDecision::RedirectClearCookie {
                location: HOME_PATH.to_string(),
            },
            None => RouteDecision::Redirect {
                location: HOME_PATH.to_string(),
            },
        },
    }
}

/// ## Summary
/// The canonical dashboard URL for an identity.
#[must_use]
pub fn dashboard_url(identity: &Identity, codec: &IdCodec) -> String {
    format!(
        "/{}/{}/{DASHBOARD_SEGMENT}",
        identity.role,
        identity.encoded_id(codec)
    )
}

/// Ownership check for `/{role}/{token}/{dashboard|profile}` shaped paths.
///
/// Paths of any other shape are not owner-scoped at this layer; ownership
/// of e.g. course detail pages is checked downstream by their own handlers.
fn owner_scope_violated(path: &str, identity: &Identity, codec: &IdCodec) -> bool {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let [role_segment, token_segment, page_segment] = segments.as_slice() else {
        return false;
    };

    let Ok(role) = role_segment.parse::<Role>() else {
        return false;
    };
    if *page_segment != DASHBOARD_SEGMENT && *page_segment != PROFILE_SEGMENT {
        return false;
    }

    match codec.decode(token_segment) {
        Ok(id) => id != u64::from(identity.id.unsigned_abs()) || role != identity.role,
        Err(_) => true,
    }
}
