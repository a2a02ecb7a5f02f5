//! Depot helpers for passing the resolved identity to downstream handlers.

use crate::error::{ServiceError, ServiceResult};

use super::Identity;

pub mod depot_keys {
    pub const CURRENT_USER: &str = "__current_user";
}

/// What the gatekeeper resolved for this request.
#[derive(Debug, Clone)]
pub enum CurrentUser {
    /// Authenticated caller
    User(Identity),
    /// Unauthenticated/public access
    Public,
}

/// Get the authenticated identity from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if no identity is present or the request is public.
pub fn get_identity_from_depot(depot: &salvo::Depot) -> ServiceResult<&Identity> {
    let current = depot
        .get::<CurrentUser>(depot_keys::CURRENT_USER)
        .map_err(|_e| ServiceError::NotAuthenticated)?;

    match current {
        CurrentUser::User(identity) => Ok(identity),
        CurrentUser::Public => Err(ServiceError::NotAuthenticated),
    }
}

/// Check if the request carries an authenticated identity.
#[must_use]
pub fn is_authenticated(depot: &salvo::Depot) -> bool {
    depot
        .get::<CurrentUser>(depot_keys::CURRENT_USER)
        .is_ok_and(|u| matches!(u, CurrentUser::User(_)))
}
