//! Page routes. The real UI is rendered client-side; these handlers return
//! the JSON each page hydrates from. The gatekeeper has already run, so a
//! handler here can trust the depot's `CurrentUser`.

use salvo::prelude::Json;
use salvo::{Depot, Request, Response, Router, handler, http::StatusCode};
use serde_json::json;

use compass_service::auth::depot::get_identity_from_depot;

use crate::codec_handler::get_codec_from_depot;

#[handler]
async fn home() -> Json<serde_json::Value> {
    Json(json!({"page":"home"}))
}

/// Login and signup screens. Reachable only for the student/instructor
/// role segments; the gatekeeper bounces already-authenticated callers
/// before this runs.
#[handler]
async fn auth_screen(req: &mut Request) -> Json<serde_json::Value> {
    let role = req.param::<String>("role").unwrap_or_default();
    Json(json!({"page":"auth","role": role}))
}

/// ## Summary
/// Owner-scoped dashboard page. The gatekeeper guarantees the path's role
/// and token segments match the resolved identity.
#[handler]
async fn dashboard(depot: &Depot) -> Json<serde_json::Value> {
    match get_identity_from_depot(depot) {
        Ok(identity) => Json(json!({"page":"dashboard","user": identity})),
        Err(_) => Json(json!({"error":"Not authenticated"})),
    }
}

/// ## Summary
/// Owner-scoped profile page.
#[handler]
async fn profile(depot: &Depot) -> Json<serde_json::Value> {
    match get_identity_from_depot(depot) {
        Ok(identity) => Json(json!({"page":"profile","user": identity})),
        Err(_) => Json(json!({"error":"Not authenticated"})),
    }
}

/// ## Summary
/// Course detail page. Protected, but not owner-scoped: any authenticated
/// caller may view a course. The course token still has to decode.
#[handler]
async fn course_detail(req: &mut Request, depot: &Depot, res: &mut Response) {
    let Ok(identity) = get_identity_from_depot(depot) else {
        res.status_code(StatusCode::UNAUTHORIZED);
        res.render(Json(json!({"error":"Not authenticated"})));
        return;
    };

    let Ok(codec) = get_codec_from_depot(depot) else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        res.render(Json(json!({"error":"Internal server error"})));
        return;
    };

    let token = req.param::<String>("token").unwrap_or_default();
    match codec.decode(&token) {
        Ok(course_id) => {
            res.render(Json(
                json!({"page":"course","course_id": course_id,"viewer": identity.username}),
            ));
        }
        Err(_) => {
            res.status_code(StatusCode::NOT_FOUND);
            res.render(Json(json!({"error":"Course not found"})));
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::new()
        .get(home)
        .push(Router::with_path("login/{role}").get(auth_screen))
        .push(Router::with_path("signup/{role}").get(auth_screen))
        .push(Router::with_path("courses/{token}").get(course_detail))
        .push(Router::with_path("{role}/{token}/dashboard").get(dashboard))
        .push(Router::with_path("{role}/{token}/profile").get(profile))
}
