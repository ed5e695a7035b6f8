//! webauthn_ceremony - Client-side WebAuthn ceremony adapter
//!
//! Builds registration and authentication options, drives the platform's
//! public-key credential ceremony, encodes the results for the wire and
//! keeps a per-profile record of enrolled credential ids so later
//! authentications can be scoped to them.
//!
//! Signature verification, the relying-party server, sessions and any UI
//! rendering are out of scope.

mod ceremony;
mod client;
mod config;
mod storage;
mod utils;
mod verify_info;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod browser;

pub use ceremony::{
    ActionResult, AssertionCredential, AssertionResponse, AttestationResponse,
    AuthenticateOptions, AuthenticateRequest, AuthenticatorSelection, Ceremony, CeremonyError,
    CeremonyRequest, CeremonyStage, CredentialDescriptor, PREFERRED_ALGORITHMS,
    PUBLIC_KEY_CREDENTIAL_TYPE, PlatformAuthenticator, PlatformError, PubKeyCredParam,
    PublicKeyCredential, RegisterOptions, RegisterRequest, RegistrationCredential, RelyingParty,
    Severity, UserEntity, WireAssertionResponse, WireAttestationResponse, WireAuthenticateOptions,
    WireAuthenticatorSelection, WireCredential, WireCredentialDescriptor, WireRegisterOptions,
    WireUserEntity, attestation_preference, authenticator_attachment, derive_user_handle,
    encode_assertion_credential, encode_registration_credential, normalize_authenticate_options,
    normalize_register_options,
};

pub use client::{
    AUTHENTICATE_PATH, HttpWireClient, REGISTER_PATH, TransportError, VERIFY_INFO_PATH, WireClient,
};

pub use config::{
    CeremonyConfig, WEBAUTHN_API_BASE_URL, WEBAUTHN_HTTP_TIMEOUT, WEBAUTHN_KNOWN_CREDENTIALS_PATH,
    WEBAUTHN_ORIGIN, WEBAUTHN_RP_NAME,
};

pub use storage::{
    FileKeyValueStore, InMemoryKeyValueStore, KNOWN_CREDENTIALS_KEY, KeyValueStore,
    KnownCredentials, StorageError,
};

pub use utils::{UtilError, base64url_decode, base64url_encode};

pub use verify_info::{Audience, VerifyInfo, VerifyInfoIdentity, VerifyInfoRequest};

/// Native ceremony wiring from the `WEBAUTHN_*` environment: a file-backed
/// known-credential store and an HTTP wire client.
pub fn from_env<P: PlatformAuthenticator>(
    platform: P,
) -> Result<Ceremony<P, FileKeyValueStore, HttpWireClient>, CeremonyError> {
    let config = CeremonyConfig::from_env().map_err(CeremonyError::Config)?;
    let wire = HttpWireClient::from_config(&config);
    Ok(Ceremony::new(
        config,
        platform,
        FileKeyValueStore::from_env(),
        wire,
    ))
}
