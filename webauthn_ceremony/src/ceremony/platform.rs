use async_trait::async_trait;

use super::errors::PlatformError;
use super::types::{
    AssertionCredential, AuthenticateOptions, RegisterOptions, RegistrationCredential,
};

/// Host-provided public-key credential ceremonies.
///
/// Both calls suspend until the user completes, cancels or times out the
/// hardware interaction. Cancellation and timeouts are owned by the
/// implementation and surface as [`PlatformError`] rejections.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PlatformAuthenticator {
    /// `navigator.credentials.create({ publicKey: options })`
    async fn create_credential(
        &self,
        options: &RegisterOptions,
    ) -> Result<RegistrationCredential, PlatformError>;

    /// `navigator.credentials.get({ publicKey: options })`
    async fn get_assertion(
        &self,
        options: &AuthenticateOptions,
    ) -> Result<AssertionCredential, PlatformError>;
}
