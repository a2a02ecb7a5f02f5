use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use compass_core::error::CoreError;
use compass_core::util::idcodec::IdCodec;

pub struct CodecHandler {
    pub codec: Arc<IdCodec>,
}

impl CodecHandler {
    #[must_use]
    pub fn new(codec: IdCodec) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }
}

#[async_trait]
impl salvo::Handler for CodecHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.codec.clone());
    }
}

/// ## Summary
/// Retrieves the identifier codec from the depot.
///
/// ## Errors
/// Returns an error if the codec is not found in the depot.
pub fn get_codec_from_depot(depot: &salvo::Depot) -> AppResult<Arc<IdCodec>> {
    depot
        .obtain::<Arc<IdCodec>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Identifier codec not found in depot").into())
}
