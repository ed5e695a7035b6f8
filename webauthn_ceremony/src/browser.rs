//! Browser bindings for `wasm32-unknown-unknown`.
//!
//! [`NavigatorCredentials`] drives `navigator.credentials`, [`LocalStorageStore`]
//! keeps the known-credential record in the profile's `localStorage` and
//! [`config_from_location`] derives the relying party from the page URL.

use async_trait::async_trait;
use js_sys::{Array, Object, Reflect, Uint8Array};
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::ceremony::{
    AssertionCredential, AssertionResponse, AttestationResponse, AuthenticateOptions, Ceremony,
    CeremonyError, CredentialDescriptor, PUBLIC_KEY_CREDENTIAL_TYPE, PlatformAuthenticator,
    PlatformError, PublicKeyCredential, RegisterOptions, RegistrationCredential,
};
use crate::client::HttpWireClient;
use crate::config::{CeremonyConfig, WEBAUTHN_RP_NAME};
use crate::storage::{KeyValueStore, StorageError};

/// [`PlatformAuthenticator`] backed by the browser's Web Authentication API.
#[derive(Debug, Default, Clone, Copy)]
pub struct NavigatorCredentials;

impl NavigatorCredentials {
    pub fn new() -> Self {
        Self
    }

    async fn call(&self, method: &str, public_key: Object) -> Result<JsValue, PlatformError> {
        let options = Object::new();
        js_set(&options, "publicKey", &public_key)?;

        let credentials = get_credentials_container()?;
        let function: js_sys::Function = js_get(&credentials, method)?
            .dyn_into()
            .map_err(|_| PlatformError::NotSupported(format!("credentials.{method} missing")))?;
        let promise: js_sys::Promise = function
            .call1(&credentials, &options)
            .map_err(platform_error)?
            .unchecked_into();

        let credential = JsFuture::from(promise).await.map_err(platform_error)?;
        if credential.is_null() || credential.is_undefined() {
            return Err(PlatformError::Other(format!(
                "credentials.{method} returned no credential"
            )));
        }
        Ok(credential)
    }
}

#[async_trait(?Send)]
impl PlatformAuthenticator for NavigatorCredentials {
    async fn create_credential(
        &self,
        options: &RegisterOptions,
    ) -> Result<RegistrationCredential, PlatformError> {
        let credential = self.call("create", register_options_object(options)?).await?;
        let response = js_get(&credential, "response")?;

        Ok(PublicKeyCredential {
            id: credential_id(&credential)?,
            type_: credential_type(&credential)?,
            raw_id: buffer_field(&credential, "rawId")?,
            response: AttestationResponse {
                attestation_object: buffer_field(&response, "attestationObject")?,
                client_data_json: buffer_field(&response, "clientDataJSON")?,
            },
        })
    }

    async fn get_assertion(
        &self,
        options: &AuthenticateOptions,
    ) -> Result<AssertionCredential, PlatformError> {
        let credential = self
            .call("get", authenticate_options_object(options)?)
            .await?;
        let response = js_get(&credential, "response")?;

        let user_handle = js_get(&response, "userHandle")?;
        let user_handle = if user_handle.is_null() || user_handle.is_undefined() {
            None
        } else {
            Some(array_buffer_to_vec(&user_handle))
        };

        Ok(PublicKeyCredential {
            id: credential_id(&credential)?,
            type_: credential_type(&credential)?,
            raw_id: buffer_field(&credential, "rawId")?,
            response: AssertionResponse {
                authenticator_data: buffer_field(&response, "authenticatorData")?,
                client_data_json: buffer_field(&response, "clientDataJSON")?,
                signature: buffer_field(&response, "signature")?,
                user_handle,
            },
        })
    }
}

/// [`KeyValueStore`] over `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    pub fn new() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Storage("window is not available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Storage(format!("localStorage denied: {e:?}")))?
            .ok_or_else(|| StorageError::Storage("localStorage is not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Storage(format!("localStorage.getItem failed: {e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Storage(format!("localStorage.setItem failed: {e:?}")))
    }
}

/// The relying party id is the page's host name and submissions go back to
/// the page's origin.
pub fn config_from_location() -> Result<CeremonyConfig, String> {
    let window = web_sys::window().ok_or("window is not available")?;
    let location = window.location();
    let hostname = location
        .hostname()
        .map_err(|e| format!("location.hostname unavailable: {e:?}"))?;
    let origin = location
        .origin()
        .map_err(|e| format!("location.origin unavailable: {e:?}"))?;
    Ok(CeremonyConfig::new(
        hostname,
        WEBAUTHN_RP_NAME.as_str(),
        origin,
    ))
}

/// Ceremony wiring for the verification page: the page's own navigator and
/// profile storage, submitting to the page origin.
pub fn ceremony()
-> Result<Ceremony<NavigatorCredentials, LocalStorageStore, HttpWireClient>, CeremonyError> {
    let config = config_from_location().map_err(CeremonyError::Config)?;
    let wire = HttpWireClient::from_config(&config);
    Ok(Ceremony::new(
        config,
        NavigatorCredentials::new(),
        LocalStorageStore::new()?,
        wire,
    ))
}

fn register_options_object(options: &RegisterOptions) -> Result<Object, PlatformError> {
    let public_key = Object::new();
    js_set(&public_key, "challenge", &bytes(&options.challenge))?;

    let rp = Object::new();
    js_set(&rp, "id", &JsValue::from_str(&options.rp.id))?;
    js_set(&rp, "name", &JsValue::from_str(&options.rp.name))?;
    js_set(&public_key, "rp", &rp)?;

    let user = Object::new();
    js_set(&user, "id", &bytes(&options.user.id))?;
    js_set(&user, "name", &JsValue::from_str(&options.user.name))?;
    js_set(
        &user,
        "displayName",
        &JsValue::from_str(&options.user.display_name),
    )?;
    js_set(&public_key, "user", &user)?;

    let params = Array::new();
    for param in &options.pub_key_cred_params {
        let entry = Object::new();
        js_set(&entry, "type", &JsValue::from_str(&param.type_))?;
        js_set(&entry, "alg", &JsValue::from_f64(f64::from(param.alg)))?;
        params.push(&entry);
    }
    js_set(&public_key, "pubKeyCredParams", &params)?;

    if let Some(attestation) = &options.attestation {
        js_set(&public_key, "attestation", &JsValue::from_str(attestation))?;
    }
    if let Some(selection) = &options.authenticator_selection {
        let entry = Object::new();
        if let Some(attachment) = &selection.authenticator_attachment {
            js_set(
                &entry,
                "authenticatorAttachment",
                &JsValue::from_str(attachment),
            )?;
        }
        if let Some(required) = selection.require_resident_key {
            js_set(&entry, "requireResidentKey", &JsValue::from_bool(required))?;
        }
        if let Some(resident_key) = &selection.resident_key {
            js_set(&entry, "residentKey", &JsValue::from_str(resident_key))?;
        }
        if let Some(verification) = &selection.user_verification {
            js_set(&entry, "userVerification", &JsValue::from_str(verification))?;
        }
        js_set(&public_key, "authenticatorSelection", &entry)?;
    }
    if let Some(exclude) = &options.exclude_credentials {
        js_set(&public_key, "excludeCredentials", &descriptors(exclude)?)?;
    }
    if let Some(extensions) = &options.extensions {
        js_set(&public_key, "extensions", &extensions_object(extensions)?)?;
    }
    if let Some(timeout) = options.timeout {
        js_set(&public_key, "timeout", &JsValue::from_f64(f64::from(timeout)))?;
    }
    Ok(public_key)
}

fn authenticate_options_object(options: &AuthenticateOptions) -> Result<Object, PlatformError> {
    let public_key = Object::new();
    js_set(&public_key, "challenge", &bytes(&options.challenge))?;

    if let Some(allow) = &options.allow_credentials {
        js_set(&public_key, "allowCredentials", &descriptors(allow)?)?;
    }
    if let Some(extensions) = &options.extensions {
        js_set(&public_key, "extensions", &extensions_object(extensions)?)?;
    }
    if let Some(rp_id) = &options.rp_id {
        js_set(&public_key, "rpId", &JsValue::from_str(rp_id))?;
    }
    if let Some(timeout) = options.timeout {
        js_set(&public_key, "timeout", &JsValue::from_f64(f64::from(timeout)))?;
    }
    if let Some(verification) = &options.user_verification {
        js_set(
            &public_key,
            "userVerification",
            &JsValue::from_str(verification),
        )?;
    }
    Ok(public_key)
}

fn descriptors(list: &[CredentialDescriptor]) -> Result<Array, PlatformError> {
    let array = Array::new();
    for descriptor in list {
        let entry = Object::new();
        js_set(&entry, "type", &JsValue::from_str(&descriptor.type_))?;
        js_set(&entry, "id", &bytes(&descriptor.id))?;
        array.push(&entry);
    }
    Ok(array)
}

fn extensions_object(extensions: &Map<String, Value>) -> Result<JsValue, PlatformError> {
    let json = serde_json::to_string(extensions)
        .map_err(|e| PlatformError::Other(format!("extensions: {e}")))?;
    js_sys::JSON::parse(&json).map_err(platform_error)
}

/// Maps a rejected credentials promise to a [`PlatformError`] by `DOMException` name.
fn platform_error(error: JsValue) -> PlatformError {
    let Some(exception) = error.dyn_ref::<web_sys::DomException>() else {
        return PlatformError::Other(format!("{error:?}"));
    };
    let message = format!("{}: {}", exception.name(), exception.message());
    match exception.name().as_str() {
        "NotAllowedError" | "AbortError" => PlatformError::Cancelled(message),
        "TimeoutError" => PlatformError::TimedOut(message),
        "NotSupportedError" => PlatformError::NotSupported(message),
        _ => PlatformError::Other(message),
    }
}

fn get_credentials_container() -> Result<JsValue, PlatformError> {
    let global = js_sys::global();
    let navigator = Reflect::get(&global, &"navigator".into())
        .map_err(|_| PlatformError::NotSupported("navigator not found".into()))?;
    if navigator.is_undefined() {
        return Err(PlatformError::NotSupported(
            "navigator is undefined".into(),
        ));
    }
    let credentials = Reflect::get(&navigator, &"credentials".into())
        .map_err(|_| PlatformError::NotSupported("credentials not found".into()))?;
    if credentials.is_undefined() {
        return Err(PlatformError::NotSupported(
            "navigator.credentials is undefined".into(),
        ));
    }
    Ok(credentials)
}

fn credential_id(credential: &JsValue) -> Result<String, PlatformError> {
    js_get(credential, "id")?
        .as_string()
        .ok_or_else(|| PlatformError::Other("credential id is not a string".into()))
}

fn credential_type(credential: &JsValue) -> Result<String, PlatformError> {
    Ok(js_get(credential, "type")?
        .as_string()
        .unwrap_or_else(|| PUBLIC_KEY_CREDENTIAL_TYPE.to_string()))
}

fn bytes(value: &[u8]) -> Uint8Array {
    Uint8Array::from(value)
}

fn js_get(obj: &JsValue, key: &str) -> Result<JsValue, PlatformError> {
    Reflect::get(obj, &JsValue::from_str(key))
        .map_err(|e| PlatformError::Other(format!("failed to get '{key}': {e:?}")))
}

fn js_set(obj: &Object, key: &str, value: &JsValue) -> Result<(), PlatformError> {
    Reflect::set(obj, &JsValue::from_str(key), value)
        .map_err(|e| PlatformError::Other(format!("failed to set '{key}': {e:?}")))?;
    Ok(())
}

fn buffer_field(obj: &JsValue, key: &str) -> Result<Vec<u8>, PlatformError> {
    let buffer = js_get(obj, key)?;
    if buffer.is_null() || buffer.is_undefined() {
        return Err(PlatformError::Other(format!("credential is missing '{key}'")));
    }
    Ok(array_buffer_to_vec(&buffer))
}

/// Convert a JS `ArrayBuffer` (or typed-array view) to `Vec<u8>`.
fn array_buffer_to_vec(value: &JsValue) -> Vec<u8> {
    let array = Uint8Array::new(value);
    let mut bytes = vec![0u8; array.length() as usize];
    array.copy_to(&mut bytes);
    bytes
}
