mod auth;
mod healthcheck;
mod me;
mod pages;

use salvo::Router;

use crate::middleware::gate::GateMiddleware;
use compass_core::constants::API_ROUTE_COMPONENT;

/// ## Summary
/// Constructs the main router. The gatekeeper hoops the root, so every
/// request is classified and resolved before any handler runs.
#[must_use]
pub fn routes() -> Router {
    Router::new()
        .hoop(GateMiddleware)
        .push(
            Router::with_path(API_ROUTE_COMPONENT)
                .push(auth::routes())
                .push(healthcheck::routes())
                .push(me::routes()),
        )
        .push(pages::routes())
}
