use salvo::prelude::Json;
use salvo::{Depot, Request, Router, handler};
use serde_json::json;

use compass_service::auth::resolver::resolve_session;

use crate::config::get_config_from_depot;
use crate::store_handler::get_store_from_depot;

/// ## Summary
/// Returns the authenticated caller's identity as JSON.
///
/// `/api/` paths are public, so the gatekeeper does not resolve sessions
/// for them; this endpoint resolves its own cookie. Anonymous callers and
/// resolution failures both get `{"status":"anonymous"}`.
#[handler]
async fn me(req: &mut Request, depot: &Depot) -> Json<serde_json::Value> {
    let Ok(config) = get_config_from_depot(depot) else {
        return Json(json!({"error":"Configuration not found in depot"}));
    };
    let Ok(store) = get_store_from_depot(depot) else {
        return Json(json!({"error":"Auth store not found in depot"}));
    };

    let cookie_value = req
        .cookie(&config.auth.cookie_name)
        .map(|c| c.value().to_string());

    match resolve_session(store.as_ref(), cookie_value.as_deref()).await {
        Ok(Some(identity)) => match serde_json::to_value(&identity) {
            Ok(value) => Json(value),
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to serialize identity for /api/me");
                Json(json!({"status":"anonymous"}))
            }
        },
        Ok(None) => Json(json!({"status":"anonymous"})),
        Err(e) => {
            tracing::warn!(error = ?e, "Session resolution failed for /api/me");
            Json(json!({"status":"anonymous"}))
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("me").get(me)
}
