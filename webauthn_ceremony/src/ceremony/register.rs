use crate::client::WireClient;
use crate::storage::KeyValueStore;
use crate::utils::gen_random_bytes;

use super::errors::CeremonyError;
use super::normalize::{encode_registration_credential, normalize_register_options};
use super::orchestrator::{CHALLENGE_LEN, Ceremony, CeremonyStage};
use super::platform::PlatformAuthenticator;
use super::types::{
    AuthenticatorSelection, CeremonyRequest, PREFERRED_ALGORITHMS, PubKeyCredParam,
    RegisterOptions, RelyingParty, UserEntity,
};
use super::user::derive_user_handle;

const RESIDENT_KEY_PREFERENCE: &str = "preferred";
pub(super) const USER_VERIFICATION_PREFERENCE: &str = "preferred";

/// Maps an attestation selection to the conveyance preference to send.
///
/// No selection, an empty selection and `"none"` all mean the member is left
/// out of the options.
pub fn attestation_preference(selection: Option<&str>) -> Result<Option<String>, CeremonyError> {
    let Some(value) = selection else {
        return Ok(None);
    };
    match value.to_lowercase().as_str() {
        "" | "none" => Ok(None),
        v @ ("indirect" | "direct" | "enterprise") => Ok(Some(v.to_string())),
        invalid => Err(CeremonyError::InvalidInput(format!(
            "Invalid attestation type: {invalid}"
        ))),
    }
}

/// Maps an authenticator-type selection to the attachment to request.
///
/// No selection, an empty selection and `"unspecified"` leave the member out.
pub fn authenticator_attachment(
    selection: Option<&str>,
) -> Result<Option<String>, CeremonyError> {
    let Some(value) = selection else {
        return Ok(None);
    };
    match value.to_lowercase().as_str() {
        "" | "unspecified" => Ok(None),
        v @ ("platform" | "cross-platform") => Ok(Some(v.to_string())),
        invalid => Err(CeremonyError::InvalidInput(format!(
            "Invalid authenticator attachment: {invalid}"
        ))),
    }
}

impl<P, S, W> Ceremony<P, S, W>
where
    P: PlatformAuthenticator,
    S: KeyValueStore,
    W: WireClient,
{
    /// Enrolls a new credential for `username` and submits it to the verifier.
    ///
    /// The new credential id is recorded locally as soon as the platform
    /// returns it, before submission, so a verifier rejection still leaves it
    /// known.
    pub async fn register(
        &mut self,
        username: &str,
        attestation_type: Option<&str>,
        authenticator_attachment: Option<&str>,
    ) -> Result<(), CeremonyError> {
        self.enter(CeremonyStage::Idle);
        self.require_username(username)?;

        let options = match self.create_registration_options(
            username,
            attestation_type,
            authenticator_attachment,
        ) {
            Ok(options) => options,
            Err(e) => return Err(self.fail(e)),
        };
        tracing::debug!("Registration options: {:?}", options);

        self.enter(CeremonyStage::AwaitingPlatformCeremony);
        let credential = match self.platform.create_credential(&options).await {
            Ok(credential) => credential,
            Err(e) => return Err(self.platform_failed(e)),
        };
        self.enter(CeremonyStage::Obtained);

        if let Err(e) = self
            .known_credentials
            .add_known_credential(&credential.raw_id)
        {
            return Err(self.fail(e));
        }

        self.enter(CeremonyStage::Encoding);
        let request = CeremonyRequest {
            options: normalize_register_options(&options),
            credential: encode_registration_credential(&credential),
        };

        self.enter(CeremonyStage::Submitting);
        if let Err(e) = self.wire.submit_registration(&request).await {
            return Err(self.fail(e));
        }

        self.enter(CeremonyStage::Succeeded);
        tracing::info!("Registered credential {}", credential.id);
        Ok(())
    }

    fn create_registration_options(
        &self,
        username: &str,
        attestation_type: Option<&str>,
        attachment: Option<&str>,
    ) -> Result<RegisterOptions, CeremonyError> {
        let attestation = attestation_preference(attestation_type)?;
        let attachment = authenticator_attachment(attachment)?;
        let challenge = gen_random_bytes(CHALLENGE_LEN)?;

        Ok(RegisterOptions {
            challenge,
            rp: RelyingParty {
                id: self.config.rp_id.clone(),
                name: self.config.rp_name.clone(),
            },
            user: UserEntity {
                id: derive_user_handle(username),
                name: username.to_string(),
                display_name: username.to_string(),
            },
            pub_key_cred_params: PREFERRED_ALGORITHMS
                .iter()
                .map(|alg| PubKeyCredParam::public_key(*alg))
                .collect(),
            attestation,
            authenticator_selection: Some(AuthenticatorSelection {
                authenticator_attachment: attachment,
                require_resident_key: None,
                resident_key: Some(RESIDENT_KEY_PREFERENCE.to_string()),
                user_verification: Some(USER_VERIFICATION_PREFERENCE.to_string()),
            }),
            exclude_credentials: None,
            extensions: None,
            timeout: None,
        })
    }
}
