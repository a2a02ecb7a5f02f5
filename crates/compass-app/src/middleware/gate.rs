use salvo::Depot;
use salvo::writing::Redirect;
use tracing::error;

use crate::codec_handler::get_codec_from_depot;
use crate::config::get_config_from_depot;
use crate::cookie::removal_cookie;
use crate::store_handler::get_store_from_depot;
use compass_service::auth::depot::{CurrentUser, depot_keys};
use compass_service::auth::gatekeeper::{self, RouteClass, RouteDecision};
use compass_service::auth::resolver::resolve_session;

/// ## Summary
/// Route gatekeeper middleware. Classifies the request path, resolves the
/// session cookie, and either lets the request through (inserting the
/// resolved identity into the depot) or redirects it.
///
/// ## Side Effects
/// Inserts a `CurrentUser` into the depot for downstream handlers. On a
/// stale-cookie redirect, adds a removal cookie to the response.
///
/// ## Errors
/// Responds with a redirect when the gatekeeper says so, and HTTP 500 when
/// request-scoped state is missing from the depot.
#[salvo::async_trait]
impl salvo::Handler for GateMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Gatekeeping request");

        let path = req.uri().path().to_string();

        // Bypass and public paths never touch session state, so skip the
        // depot and cookie work entirely.
        if matches!(
            gatekeeper::classify(&path),
            RouteClass::Bypass | RouteClass::Public
        ) {
            depot.insert(depot_keys::CURRENT_USER, CurrentUser::Public);
            return;
        }

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let store = match get_store_from_depot(depot) {
            Ok(s) => s,
            Err(e) => {
                error!(error = ?e, "Failed to get auth store from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let codec = match get_codec_from_depot(depot) {
            Ok(c) => c,
            Err(e) => {
                error!(error = ?e, "Failed to get identifier codec from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let cookie_value = req
            .cookie(&config.auth.cookie_name)
            .map(|c| c.value().to_string());

        // Fail closed: a storage failure during resolution is treated as
        // "no identity", never as a pass.
        let identity = match resolve_session(store.as_ref(), cookie_value.as_deref()).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = ?e, "Session resolution failed, treating request as unauthenticated");
                None
            }
        };

        match gatekeeper::decide(&path, cookie_value.is_some(), identity.as_ref(), &codec) {
            RouteDecision::Allow => {
                let current = identity.map_or(CurrentUser::Public, CurrentUser::User);
                depot.insert(depot_keys::CURRENT_USER, current);
            }
            RouteDecision::Redirect { location } => {
                tracing::debug!(location = %location, "Redirecting request");
                res.render(Redirect::found(location));
                ctrl.skip_rest();
            }
            RouteDecision::RedirectClearCookie { location } => {
                tracing::debug!(location = %location, "Clearing stale session cookie and redirecting");
                res.add_cookie(removal_cookie(&config.auth));
                res.render(Redirect::found(location));
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Middleware handler for the route gatekeeper.
/// Hoop this at the router root so every request passes through it.
pub struct GateMiddleware;
