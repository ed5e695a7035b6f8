use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";

/// COSE algorithm identifiers offered at registration, most preferred first:
/// RS1, RS256, ES256.
pub const PREFERRED_ALGORITHMS: [i32; 3] = [-65535, -257, -7];

/// Identifies a credential to allow or exclude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDescriptor {
    pub type_: String,
    pub id: Vec<u8>,
}

impl CredentialDescriptor {
    pub fn public_key(id: Vec<u8>) -> Self {
        Self {
            type_: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelyingParty {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntity {
    pub id: Vec<u8>,
    pub name: String,
    pub display_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PubKeyCredParam {
    pub alg: i32,
    #[serde(rename = "type")]
    pub type_: String,
}

impl PubKeyCredParam {
    pub fn public_key(alg: i32) -> Self {
        Self {
            alg,
            type_: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
        }
    }
}

/// `None` means the member was never set; it is then omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticatorSelection {
    pub authenticator_attachment: Option<String>,
    pub require_resident_key: Option<bool>,
    pub resident_key: Option<String>,
    pub user_verification: Option<String>,
}

/// Options for `navigator.credentials.create()`, with binary fields as raw bytes.
///
/// Every `Option` field records presence: `Some` is copied to the wire even
/// when it holds an empty string, `false` or `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterOptions {
    pub challenge: Vec<u8>,
    pub rp: RelyingParty,
    pub user: UserEntity,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub attestation: Option<String>,
    pub authenticator_selection: Option<AuthenticatorSelection>,
    pub exclude_credentials: Option<Vec<CredentialDescriptor>>,
    pub extensions: Option<Map<String, Value>>,
    pub timeout: Option<u32>,
}

/// Options for `navigator.credentials.get()`, with binary fields as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticateOptions {
    pub challenge: Vec<u8>,
    pub allow_credentials: Option<Vec<CredentialDescriptor>>,
    pub extensions: Option<Map<String, Value>>,
    pub rp_id: Option<String>,
    pub timeout: Option<u32>,
    pub user_verification: Option<String>,
}

impl AuthenticateOptions {
    /// Options carrying only the mandatory challenge.
    pub fn with_challenge(challenge: Vec<u8>) -> Self {
        Self {
            challenge,
            allow_credentials: None,
            extensions: None,
            rp_id: None,
            timeout: None,
            user_verification: None,
        }
    }
}

/// Result of a platform ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyCredential<R> {
    pub id: String,
    pub type_: String,
    pub raw_id: Vec<u8>,
    pub response: R,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationResponse {
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResponse {
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

pub type RegistrationCredential = PublicKeyCredential<AttestationResponse>;
pub type AssertionCredential = PublicKeyCredential<AssertionResponse>;

// Wire representations. Binary values are unpadded base64url strings and
// optional members are skipped entirely when absent, never sent as null.

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WireCredentialDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireUserEntity {
    pub id: String,
    pub display_name: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireAuthenticatorSelection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_resident_key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireRegisterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attestation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<WireAuthenticatorSelection>,
    pub challenge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_credentials: Option<Vec<WireCredentialDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub rp: RelyingParty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    pub user: WireUserEntity,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireAuthenticateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<Vec<WireCredentialDescriptor>>,
    pub challenge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireCredential<R> {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub raw_id: String,
    pub response: R,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireAttestationResponse {
    pub attestation_object: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireAssertionResponse {
    pub authenticator_data: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub signature: String,
    pub user_handle: String,
}

/// The `{options, credential}` body posted to the remote verifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CeremonyRequest<O, C> {
    pub options: O,
    pub credential: C,
}

pub type RegisterRequest =
    CeremonyRequest<WireRegisterOptions, WireCredential<WireAttestationResponse>>;
pub type AuthenticateRequest =
    CeremonyRequest<WireAuthenticateOptions, WireCredential<WireAssertionResponse>>;
