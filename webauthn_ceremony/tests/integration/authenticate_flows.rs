use httpmock::prelude::*;
use serde_json::json;
use webauthn_ceremony::{
    AUTHENTICATE_PATH, CeremonyError, CeremonyStage, InMemoryKeyValueStore, KNOWN_CREDENTIALS_KEY,
    PlatformError, REGISTER_PATH, Severity, base64url_encode, normalize_authenticate_options,
};

use crate::common::{
    TEST_RP_ID, TEST_USERNAME, TestSetup, assertion_credential, registration_credential,
};

#[tokio::test]
async fn test_authenticate_with_empty_store_sends_empty_allow_list() {
    // Given a profile that has never registered
    let mut setup = TestSetup::new().await;
    let mock = setup
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path(AUTHENTICATE_PATH)
                .header("content-type", "application/json")
                .json_body_partial(
                    r#"{"options": {"rpId": "verify.example.com", "userVerification": "preferred"}}"#,
                );
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_assertion(Ok(assertion_credential(&[7, 7], Some(vec![1]))));

    // When authenticating
    let result = setup.ceremony.authenticate(TEST_USERNAME).await;

    // Then the platform was asked with an empty, present allow list
    assert!(result.is_ok(), "authentication failed: {result:?}");
    mock.assert_async().await;
    let options = setup.platform.last_authenticate_options();
    assert_eq!(options.allow_credentials, Some(Vec::new()));
    assert_eq!(options.rp_id.as_deref(), Some(TEST_RP_ID));

    let wire = serde_json::to_value(normalize_authenticate_options(&options)).unwrap();
    assert_eq!(wire["allowCredentials"], json!([]));
    assert_eq!(wire["userVerification"], "preferred");
    assert!(wire.get("timeout").is_none());
    assert!(wire.get("extensions").is_none());
    assert_eq!(setup.ceremony.stage(), CeremonyStage::Succeeded);
}

#[tokio::test]
async fn test_registered_credential_is_offered_on_authentication() {
    // Given a verifier accepting both ceremonies
    let mut setup = TestSetup::new().await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(REGISTER_PATH);
            then.status(200);
        })
        .await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(AUTHENTICATE_PATH);
            then.status(200);
        })
        .await;
    let raw_id = [0x10, 0x20, 0x30, 0x40];

    // When registering and then authenticating
    assert!(!setup.ceremony.can_authenticate(TEST_USERNAME));
    setup
        .platform
        .push_registration(Ok(registration_credential(&raw_id)));
    setup
        .ceremony
        .register(TEST_USERNAME, None, None)
        .await
        .unwrap();
    assert!(setup.ceremony.can_authenticate(TEST_USERNAME));

    setup
        .platform
        .push_assertion(Ok(assertion_credential(&raw_id, None)));
    let result = setup.ceremony.run_authenticate(TEST_USERNAME).await;

    // Then exactly the registered id is in the allow list
    assert_eq!(result.severity, Severity::Success);
    assert_eq!(result.message, "Authentication Successful!");
    let wire = serde_json::to_value(normalize_authenticate_options(
        &setup.platform.last_authenticate_options(),
    ))
    .unwrap();
    assert_eq!(
        wire["allowCredentials"],
        json!([{"id": base64url_encode(&raw_id), "type": "public-key"}])
    );
}

#[tokio::test]
async fn test_authenticate_verifier_rejection() {
    // Given a verifier that rejects the assertion
    let mut setup = TestSetup::new().await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(AUTHENTICATE_PATH);
            then.status(400).body("bad challenge");
        })
        .await;
    setup
        .platform
        .push_assertion(Ok(assertion_credential(&[1], None)));

    // When authenticating
    let result = setup.ceremony.run_authenticate(TEST_USERNAME).await;

    // Then the status and body surface in the message
    assert_eq!(result.severity, Severity::Error);
    assert!(result.message.contains("400"), "{}", result.message);
    assert!(result.message.contains("bad challenge"), "{}", result.message);
    assert_eq!(setup.ceremony.stage(), CeremonyStage::Failed);
}

#[tokio::test]
async fn test_missing_user_handle_falls_back_to_username() {
    // Given an authenticator that returns no user handle
    let mut setup = TestSetup::new().await;
    let mock = setup
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path(AUTHENTICATE_PATH)
                .json_body_partial(r#"{"credential": {"response": {"userHandle": "YWxpY2U"}}}"#);
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_assertion(Ok(assertion_credential(&[5], None)));

    // When authenticating as alice
    let result = setup.ceremony.authenticate(TEST_USERNAME).await;

    // Then the handle derived from the username is sent
    assert!(result.is_ok(), "authentication failed: {result:?}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_returned_user_handle_is_sent() {
    let mut setup = TestSetup::new().await;
    let mock = setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(AUTHENTICATE_PATH).json_body_partial(
                r#"{"credential": {"response": {
                    "authenticatorData": "SZYN5Q",
                    "signature": "MEQCIA",
                    "userHandle": "dXNlci0x"
                }}}"#,
            );
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_assertion(Ok(assertion_credential(&[5], Some(b"user-1".to_vec()))));

    let result = setup.ceremony.authenticate(TEST_USERNAME).await;

    assert!(result.is_ok(), "authentication failed: {result:?}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_authenticate_cancelled() {
    // Given a user who aborts the prompt
    let mut setup = TestSetup::new().await;
    let mock = setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(AUTHENTICATE_PATH);
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_assertion(Err(PlatformError::Cancelled("AbortError: aborted".to_string())));

    // When authenticating
    let result = setup.ceremony.authenticate(TEST_USERNAME).await;

    // Then nothing is submitted
    assert!(matches!(
        result,
        Err(CeremonyError::Platform(PlatformError::Cancelled(_)))
    ));
    assert_eq!(setup.ceremony.stage(), CeremonyStage::Cancelled);
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_authenticate_not_supported_is_failure() {
    let mut setup = TestSetup::new().await;
    setup
        .platform
        .push_assertion(Err(PlatformError::NotSupported(
            "NotSupportedError: no authenticator".to_string(),
        )));

    let result = setup.ceremony.run_authenticate(TEST_USERNAME).await;

    assert_eq!(result.message, "NotSupportedError: no authenticator");
    assert_eq!(setup.ceremony.stage(), CeremonyStage::Failed);
}

#[tokio::test]
async fn test_malformed_store_reads_as_no_credentials() {
    // Given a profile whose stored value is not a JSON array
    let store = InMemoryKeyValueStore::with_entry(KNOWN_CREDENTIALS_KEY, "{not json");
    let mut setup = TestSetup::with_store(store).await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(AUTHENTICATE_PATH);
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_assertion(Ok(assertion_credential(&[3], None)));

    // When authenticating
    let result = setup.ceremony.authenticate(TEST_USERNAME).await;

    // Then the ceremony proceeds with an empty allow list
    assert!(result.is_ok(), "authentication failed: {result:?}");
    assert_eq!(
        setup.platform.last_authenticate_options().allow_credentials,
        Some(Vec::new())
    );
}
