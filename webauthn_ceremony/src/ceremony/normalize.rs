//! Conversion of native ceremony data into its wire form.
//!
//! An optional member appears in the output if and only if it was set on
//! the input, whatever its value. Relying parties treat an absent member and
//! an explicit default differently.

use crate::utils::base64url_encode;

use super::types::{
    AssertionCredential, AuthenticateOptions, AuthenticatorSelection, CredentialDescriptor,
    RegisterOptions, RegistrationCredential, WireAssertionResponse, WireAttestationResponse,
    WireAuthenticateOptions, WireAuthenticatorSelection, WireCredential,
    WireCredentialDescriptor, WireRegisterOptions, WireUserEntity,
};

pub fn normalize_register_options(options: &RegisterOptions) -> WireRegisterOptions {
    WireRegisterOptions {
        attestation: options.attestation.clone(),
        authenticator_selection: options
            .authenticator_selection
            .as_ref()
            .map(normalize_authenticator_selection),
        challenge: base64url_encode(&options.challenge),
        exclude_credentials: options
            .exclude_credentials
            .as_deref()
            .map(normalize_descriptors),
        extensions: options.extensions.clone(),
        pub_key_cred_params: options.pub_key_cred_params.clone(),
        rp: options.rp.clone(),
        timeout: options.timeout,
        user: WireUserEntity {
            id: base64url_encode(&options.user.id),
            display_name: options.user.display_name.clone(),
            name: options.user.name.clone(),
        },
    }
}

pub fn normalize_authenticate_options(options: &AuthenticateOptions) -> WireAuthenticateOptions {
    WireAuthenticateOptions {
        allow_credentials: options
            .allow_credentials
            .as_deref()
            .map(normalize_descriptors),
        challenge: base64url_encode(&options.challenge),
        extensions: options.extensions.clone(),
        rp_id: options.rp_id.clone(),
        timeout: options.timeout,
        user_verification: options.user_verification.clone(),
    }
}

fn normalize_authenticator_selection(
    selection: &AuthenticatorSelection,
) -> WireAuthenticatorSelection {
    WireAuthenticatorSelection {
        authenticator_attachment: selection.authenticator_attachment.clone(),
        require_resident_key: selection.require_resident_key,
        resident_key: selection.resident_key.clone(),
        user_verification: selection.user_verification.clone(),
    }
}

fn normalize_descriptors(descriptors: &[CredentialDescriptor]) -> Vec<WireCredentialDescriptor> {
    descriptors
        .iter()
        .map(|c| WireCredentialDescriptor {
            id: base64url_encode(&c.id),
            type_: c.type_.clone(),
        })
        .collect()
}

pub fn encode_registration_credential(
    credential: &RegistrationCredential,
) -> WireCredential<WireAttestationResponse> {
    WireCredential {
        id: credential.id.clone(),
        type_: credential.type_.clone(),
        raw_id: base64url_encode(&credential.raw_id),
        response: WireAttestationResponse {
            attestation_object: base64url_encode(&credential.response.attestation_object),
            client_data_json: base64url_encode(&credential.response.client_data_json),
        },
    }
}

/// Encodes an assertion, substituting `fallback_user_handle` when the
/// authenticator returned no (or an empty) user handle.
pub fn encode_assertion_credential(
    credential: &AssertionCredential,
    fallback_user_handle: &[u8],
) -> WireCredential<WireAssertionResponse> {
    let user_handle = match credential.response.user_handle.as_deref() {
        Some(handle) if !handle.is_empty() => handle,
        _ => {
            tracing::debug!("Authenticator returned no user handle, using derived handle");
            fallback_user_handle
        }
    };

    WireCredential {
        id: credential.id.clone(),
        type_: credential.type_.clone(),
        raw_id: base64url_encode(&credential.raw_id),
        response: WireAssertionResponse {
            authenticator_data: base64url_encode(&credential.response.authenticator_data),
            client_data_json: base64url_encode(&credential.response.client_data_json),
            signature: base64url_encode(&credential.response.signature),
            user_handle: base64url_encode(user_handle),
        },
    }
}
