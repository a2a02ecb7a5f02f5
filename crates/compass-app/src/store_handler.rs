use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use compass_core::error::CoreError;
use compass_service::store::AuthStore;

pub struct StoreHandler {
    store: Arc<dyn AuthStore>,
}

impl StoreHandler {
    pub fn new(store: impl AuthStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[async_trait]
impl salvo::Handler for StoreHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        // Insert a reference to the store into the depot
        let store: Arc<dyn AuthStore> = self.store.clone();
        depot.inject(store);
    }
}

/// ## Summary
/// Retrieves the auth store from the depot.
///
/// ## Errors
/// Returns an error if the auth store is not found in the depot.
pub fn get_store_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn AuthStore>> {
    depot
        .obtain::<Arc<dyn AuthStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Auth store not found in depot").into())
}
