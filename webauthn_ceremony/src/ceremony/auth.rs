use crate::client::WireClient;
use crate::storage::KeyValueStore;
use crate::utils::gen_random_bytes;

use super::errors::CeremonyError;
use super::normalize::{encode_assertion_credential, normalize_authenticate_options};
use super::orchestrator::{CHALLENGE_LEN, Ceremony, CeremonyStage};
use super::platform::PlatformAuthenticator;
use super::register::USER_VERIFICATION_PREFERENCE;
use super::types::{AuthenticateOptions, CeremonyRequest, CredentialDescriptor};
use super::user::derive_user_handle;

impl<P, S, W> Ceremony<P, S, W>
where
    P: PlatformAuthenticator,
    S: KeyValueStore,
    W: WireClient,
{
    /// Requests an assertion scoped to every credential known to this profile
    /// and submits it to the verifier.
    ///
    /// The allow list is not filtered by `username`; an empty list lets the
    /// platform offer any discoverable credential. When the authenticator
    /// returns no user handle, one is derived from `username`.
    pub async fn authenticate(&mut self, username: &str) -> Result<(), CeremonyError> {
        self.enter(CeremonyStage::Idle);
        self.require_username(username)?;

        let options = match self.create_authentication_options() {
            Ok(options) => options,
            Err(e) => return Err(self.fail(e)),
        };
        tracing::debug!("Authentication options: {:?}", options);

        self.enter(CeremonyStage::AwaitingPlatformCeremony);
        let credential = match self.platform.get_assertion(&options).await {
            Ok(credential) => credential,
            Err(e) => return Err(self.platform_failed(e)),
        };
        self.enter(CeremonyStage::Obtained);

        self.enter(CeremonyStage::Encoding);
        let request = CeremonyRequest {
            options: normalize_authenticate_options(&options),
            credential: encode_assertion_credential(&credential, &derive_user_handle(username)),
        };

        self.enter(CeremonyStage::Submitting);
        if let Err(e) = self.wire.submit_authentication(&request).await {
            return Err(self.fail(e));
        }

        self.enter(CeremonyStage::Succeeded);
        tracing::info!("Authenticated with credential {}", credential.id);
        Ok(())
    }

    fn create_authentication_options(&self) -> Result<AuthenticateOptions, CeremonyError> {
        let allow_credentials = self
            .known_credentials
            .get_known_credentials()
            .into_iter()
            .map(CredentialDescriptor::public_key)
            .collect();

        Ok(AuthenticateOptions {
            challenge: gen_random_bytes(CHALLENGE_LEN)?,
            allow_credentials: Some(allow_credentials),
            extensions: None,
            rp_id: Some(self.config.rp_id.clone()),
            timeout: None,
            user_verification: Some(USER_VERIFICATION_PREFERENCE.to_string()),
        })
    }
}
