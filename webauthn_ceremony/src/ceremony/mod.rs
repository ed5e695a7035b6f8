mod action;
mod auth;
mod errors;
mod normalize;
mod orchestrator;
mod platform;
mod register;
mod types;
mod user;

pub use action::{ActionResult, Severity};
pub use errors::{CeremonyError, PlatformError};
pub use normalize::{
    encode_assertion_credential, encode_registration_credential, normalize_authenticate_options,
    normalize_register_options,
};
pub use orchestrator::{Ceremony, CeremonyStage};
pub use platform::PlatformAuthenticator;
pub use register::{attestation_preference, authenticator_attachment};
pub use types::{
    AssertionCredential, AssertionResponse, AttestationResponse, AuthenticateOptions,
    AuthenticateRequest, AuthenticatorSelection, CeremonyRequest, CredentialDescriptor,
    PREFERRED_ALGORITHMS, PUBLIC_KEY_CREDENTIAL_TYPE, PubKeyCredParam, PublicKeyCredential,
    RegisterOptions, RegisterRequest, RegistrationCredential, RelyingParty, UserEntity,
    WireAssertionResponse, WireAttestationResponse, WireAuthenticateOptions,
    WireAuthenticatorSelection, WireCredential, WireCredentialDescriptor, WireRegisterOptions,
    WireUserEntity,
};
pub use user::derive_user_handle;
