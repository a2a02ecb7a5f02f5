/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const AI_ROUTE_COMPONENT: &str = "ai";
pub const AI_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", AI_ROUTE_COMPONENT);

pub const AUTH_ROUTE_COMPONENT: &str = "auth";

pub const LOGIN_ROUTE_COMPONENT: &str = "login";
pub const SIGNUP_ROUTE_COMPONENT: &str = "signup";

/// Terminal segments of owner-scoped page paths.
pub const DASHBOARD_SEGMENT: &str = "dashboard";
pub const PROFILE_SEGMENT: &str = "profile";

pub const HOME_PATH: &str = "/";

/// Default name of the session cookie. Overridable via `auth.cookie_name`.
pub const DEFAULT_COOKIE_NAME: &str = "compass_session";
