mod helpers;

mod auth_flow;
mod gatekeeper_flow;
