use async_trait::async_trait;

use crate::ceremony::{AuthenticateRequest, RegisterRequest};

use super::errors::TransportError;

/// The two exchanges with the remote verifier.
///
/// Success carries no payload; any non-2xx response is a
/// [`TransportError::Status`].
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait WireClient {
    async fn submit_registration(&self, request: &RegisterRequest) -> Result<(), TransportError>;

    async fn submit_authentication(
        &self,
        request: &AuthenticateRequest,
    ) -> Result<(), TransportError>;
}
