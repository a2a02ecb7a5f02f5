use chrono::Duration;
use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use compass_core::constants::AUTH_ROUTE_COMPONENT;
use compass_db::db::enums::Role;
use compass_service::auth::credential::{self, SignupInput};
use compass_service::auth::{Identity, session};
use compass_service::error::ServiceError;

use crate::config::get_config_from_depot;
use crate::cookie::{removal_cookie, session_cookie};
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// ## Summary
/// Signup request payload
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar_url: Option<String>,
}

/// ## Summary
/// Auth response payload, shared by login, signup, and logout.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    fn ok(user: Identity) -> Self {
        Self {
            success: true,
            user: Some(user),
            message: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            message: Some(message.into()),
        }
    }
}

fn role_from_path(req: &Request, res: &mut Response) -> Option<Role> {
    match req.param::<String>("role").as_deref().map(str::parse) {
        Some(Ok(role)) => Some(role),
        _ => {
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(AuthResponse::err("Unknown role")));
            None
        }
    }
}

/// ## Summary
/// POST /api/auth/login/{role} - Verify credentials and open a session.
///
/// ## Side Effects
/// - Creates a session row on success
/// - Sets the session cookie on success
///
/// ## Errors
/// Returns HTTP 401 if the email, password, or role does not match
/// Returns HTTP 500 if storage operations fail
#[handler]
async fn login_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing login request");

    let Some(role) = role_from_path(req, res) else {
        return;
    };

    let login_req: LoginRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse login request");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(AuthResponse::err("Invalid request body")));
            return;
        }
    };

    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err("Internal server error")));
            return;
        }
    };

    let store = match get_store_from_depot(depot) {
        Ok(s) => s,
        Err(e) => {
            error!(error = ?e, "Failed to get auth store from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err("Internal server error")));
            return;
        }
    };

    let user = match credential::login(store.as_ref(), &login_req.email, &login_req.password, role)
        .await
    {
        Ok(user) => user,
        Err(ServiceError::InvalidCredentials) => {
            res.status_code(StatusCode::UNAUTHORIZED);
            res.render(Json(AuthResponse::err(
                ServiceError::InvalidCredentials.to_string(),
            )));
            return;
        }
        Err(e) => {
            error!(error = ?e, "Login failed with error");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err(
                "An error occurred during login. Please try again.",
            )));
            return;
        }
    };

    let token = match session::create_session(
        store.as_ref(),
        user.id,
        Duration::seconds(config.auth.session_ttl_secs),
    )
    .await
    {
        Ok(token) => token,
        Err(e) => {
            error!(error = ?e, "Failed to create session");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err(
                "An error occurred during login. Please try again.",
            )));
            return;
        }
    };

    tracing::info!(user_id = user.id, "User logged in successfully");

    res.add_cookie(session_cookie(&config.auth, token));
    res.render(Json(AuthResponse::ok(Identity::from(user))));
}

/// ## Summary
/// POST /api/auth/signup/{role} - Create an account and open a session.
///
/// ## Side Effects
/// - Creates a user row with a hashed password
/// - Creates a session row
/// - Sets the session cookie on success
///
/// ## Errors
/// Returns HTTP 400 if the email or username is already taken, or a field
/// fails validation
/// Returns HTTP 500 if storage operations fail
#[handler]
async fn signup_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing signup request");

    let Some(role) = role_from_path(req, res) else {
        return;
    };

    let signup_req: SignupRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse signup request");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(AuthResponse::err("Invalid request body")));
            return;
        }
    };

    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err("Internal server error")));
            return;
        }
    };

    let store = match get_store_from_depot(depot) {
        Ok(s) => s,
        Err(e) => {
            error!(error = ?e, "Failed to get auth store from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err("Internal server error")));
            return;
        }
    };

    let input = SignupInput {
        username: signup_req.username,
        email: signup_req.email,
        password: signup_req.password,
        role,
        avatar_url: signup_req.avatar_url,
    };

    let user = match credential::create_user(store.as_ref(), input).await {
        Ok(user) => user,
        Err(e) if e.is_signup_conflict() => {
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(AuthResponse::err(e.to_string())));
            return;
        }
        Err(e @ ServiceError::ValidationError(_)) => {
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(AuthResponse::err(e.to_string())));
            return;
        }
        Err(e) => {
            error!(error = ?e, "Signup failed with error");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err(
                "An error occurred during signup. Please try again.",
            )));
            return;
        }
    };

    let token = match session::create_session(
        store.as_ref(),
        user.id,
        Duration::seconds(config.auth.session_ttl_secs),
    )
    .await
    {
        Ok(token) => token,
        Err(e) => {
            error!(error = ?e, "Failed to create session after signup");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err(
                "An error occurred during signup. Please try again.",
            )));
            return;
        }
    };

    tracing::info!(user_id = user.id, "User registered successfully");

    res.status_code(StatusCode::CREATED);
    res.add_cookie(session_cookie(&config.auth, token));
    res.render(Json(AuthResponse::ok(Identity::from(user))));
}

/// ## Summary
/// POST /api/auth/logout - Delete the caller's session and clear the cookie.
///
/// The cookie is cleared even when the session row is already gone or the
/// delete fails; logout never strands the browser with a dead cookie.
#[handler]
async fn logout_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing logout request");

    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(AuthResponse::err("Internal server error")));
            return;
        }
    };

    if let Some(cookie) = req.cookie(&config.auth.cookie_name) {
        let token = cookie.value().to_string();
        match get_store_from_depot(depot) {
            Ok(store) => {
                if let Err(e) = session::delete_session(store.as_ref(), &token).await {
                    tracing::warn!(error = ?e, "Failed to delete session during logout");
                }
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to get auth store during logout");
            }
        }
    }

    res.add_cookie(removal_cookie(&config.auth));
    res.render(Json(AuthResponse {
        success: true,
        user: None,
        message: None,
    }));
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTH_ROUTE_COMPONENT)
        .push(Router::with_path("login/{role}").post(login_handler))
        .push(Router::with_path("signup/{role}").post(signup_handler))
        .push(Router::with_path("logout").post(logout_handler))
}
