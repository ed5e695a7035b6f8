use httpmock::prelude::*;
use serde_json::json;
use webauthn_ceremony::{
    CeremonyError, CeremonyStage, PlatformError, REGISTER_PATH, Severity, base64url_encode,
    normalize_register_options,
};

use crate::common::{TEST_RP_ID, TEST_RP_NAME, TEST_USERNAME, TestSetup, registration_credential};

#[tokio::test]
async fn test_register_direct_attestation_without_attachment() {
    // Given a verifier accepting registrations and an authenticator that enrolls a credential
    let mut setup = TestSetup::new().await;
    let mock = setup
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path(REGISTER_PATH)
                .header("content-type", "application/json")
                .json_body_partial(r#"{"options": {"attestation": "direct"}}"#);
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_registration(Ok(registration_credential(&[1, 2, 3])));

    // When registering with direct attestation and no attachment preference
    let result = setup
        .ceremony
        .register(TEST_USERNAME, Some("direct"), None)
        .await;

    // Then the ceremony succeeds and the verifier saw the envelope once
    assert!(result.is_ok(), "registration failed: {result:?}");
    assert_eq!(setup.ceremony.stage(), CeremonyStage::Succeeded);
    mock.assert_async().await;

    // And the options carry the attestation but no authenticatorAttachment
    let options = setup.platform.last_register_options();
    assert_eq!(options.attestation.as_deref(), Some("direct"));
    let wire = serde_json::to_value(normalize_register_options(&options)).unwrap();
    assert_eq!(wire["attestation"], "direct");
    assert_eq!(
        wire["authenticatorSelection"],
        json!({"residentKey": "preferred", "userVerification": "preferred"})
    );
    assert_eq!(
        wire["pubKeyCredParams"],
        json!([
            {"alg": -65535, "type": "public-key"},
            {"alg": -257, "type": "public-key"},
            {"alg": -7, "type": "public-key"}
        ])
    );
    assert_eq!(wire["rp"], json!({"id": TEST_RP_ID, "name": TEST_RP_NAME}));
    assert_eq!(
        wire["user"],
        json!({"id": "YWxpY2U", "displayName": "alice", "name": "alice"})
    );
    assert!(wire.get("excludeCredentials").is_none());
    assert!(wire.get("timeout").is_none());

    // And the new credential is now known
    assert_eq!(
        setup.ceremony.known_credentials().get_known_credentials(),
        vec![vec![1, 2, 3]]
    );
}

#[tokio::test]
async fn test_register_posts_encoded_credential() {
    let mut setup = TestSetup::new().await;
    let raw_id = [0xfb, 0xff, 0x01];
    let encoded_id = base64url_encode(&raw_id);
    let mock = setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(REGISTER_PATH).json_body_partial(
                json!({
                    "credential": {
                        "id": encoded_id,
                        "type": "public-key",
                        "rawId": encoded_id,
                        "response": {"attestationObject": "o2NmbXQ"}
                    }
                })
                .to_string(),
            );
            then.status(201);
        })
        .await;
    setup
        .platform
        .push_registration(Ok(registration_credential(&raw_id)));

    let result = setup
        .ceremony
        .register(TEST_USERNAME, None, Some("cross-platform"))
        .await;

    assert!(result.is_ok(), "registration failed: {result:?}");
    mock.assert_async().await;
    let options = setup.platform.last_register_options();
    assert_eq!(options.attestation, None);
    assert_eq!(
        options
            .authenticator_selection
            .unwrap()
            .authenticator_attachment
            .as_deref(),
        Some("cross-platform")
    );
}

#[tokio::test]
async fn test_register_verifier_rejection_keeps_credential() {
    // Given a verifier that rejects the registration
    let mut setup = TestSetup::new().await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(REGISTER_PATH);
            then.status(400).body("bad challenge");
        })
        .await;
    setup
        .platform
        .push_registration(Ok(registration_credential(&[9, 9])));

    // When registering
    let result = setup
        .ceremony
        .run_register(TEST_USERNAME, None, None)
        .await;

    // Then the status and body surface as the error message
    assert_eq!(result.severity, Severity::Error);
    assert!(result.message.contains("400"), "{}", result.message);
    assert!(result.message.contains("bad challenge"), "{}", result.message);
    assert_eq!(setup.ceremony.stage(), CeremonyStage::Failed);

    // And the id was recorded before submission
    assert_eq!(
        setup.ceremony.known_credentials().get_known_credentials(),
        vec![vec![9, 9]]
    );
}

#[tokio::test]
async fn test_register_cancelled_writes_nothing() {
    // Given a user who dismisses the platform prompt
    let mut setup = TestSetup::new().await;
    let mock = setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(REGISTER_PATH);
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_registration(Err(PlatformError::Cancelled(
            "NotAllowedError: The operation either timed out or was not allowed.".to_string(),
        )));

    // When registering
    let result = setup
        .ceremony
        .run_register(TEST_USERNAME, Some("none"), Some("platform"))
        .await;

    // Then the platform's message is reported and the ceremony stops there
    assert_eq!(result.severity, Severity::Error);
    assert_eq!(
        result.message,
        "NotAllowedError: The operation either timed out or was not allowed."
    );
    assert_eq!(setup.ceremony.stage(), CeremonyStage::Cancelled);
    mock.assert_hits_async(0).await;
    assert!(
        setup
            .ceremony
            .known_credentials()
            .get_known_credentials()
            .is_empty()
    );
}

#[tokio::test]
async fn test_register_platform_timeout() {
    let mut setup = TestSetup::new().await;
    setup
        .platform
        .push_registration(Err(PlatformError::TimedOut("TimeoutError".to_string())));

    let result = setup.ceremony.register(TEST_USERNAME, None, None).await;

    assert!(matches!(
        result,
        Err(CeremonyError::Platform(PlatformError::TimedOut(_)))
    ));
    assert_eq!(setup.ceremony.stage(), CeremonyStage::TimedOut);
}

#[tokio::test]
async fn test_register_rejects_invalid_selection_before_platform() {
    let mut setup = TestSetup::new().await;

    let result = setup
        .ceremony
        .register(TEST_USERNAME, Some("self"), None)
        .await;

    assert!(matches!(result, Err(CeremonyError::InvalidInput(_))));
    assert_eq!(setup.ceremony.stage(), CeremonyStage::Failed);
    assert!(setup.platform.register_calls().is_empty());
}

#[tokio::test]
async fn test_register_requires_username() {
    let mut setup = TestSetup::new().await;

    assert!(!setup.ceremony.can_register(""));
    let result = setup.ceremony.register("", None, None).await;

    assert!(matches!(result, Err(CeremonyError::InvalidInput(_))));
    assert!(setup.platform.register_calls().is_empty());
}

#[tokio::test]
async fn test_run_register_success_message() {
    let mut setup = TestSetup::new().await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(REGISTER_PATH);
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_registration(Ok(registration_credential(&[4])));

    let result = setup
        .ceremony
        .run_register(TEST_USERNAME, Some("indirect"), Some("unspecified"))
        .await;

    assert_eq!(result.severity, Severity::Success);
    assert_eq!(result.message, "Registration Successful! Now try Login.");
}

#[tokio::test]
async fn test_each_registration_uses_a_fresh_challenge() {
    // Given a verifier accepting every registration
    let mut setup = TestSetup::new().await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(REGISTER_PATH);
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_registration(Ok(registration_credential(&[1])));
    setup
        .platform
        .push_registration(Ok(registration_credential(&[1])));

    // When registering the same credential twice
    for _ in 0..2 {
        setup
            .ceremony
            .register(TEST_USERNAME, None, None)
            .await
            .unwrap();
    }

    // Then each ceremony carried its own 32-byte challenge
    let calls = setup.platform.register_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].challenge.len(), 32);
    assert_eq!(calls[1].challenge.len(), 32);
    assert_ne!(calls[0].challenge, calls[1].challenge);

    // And the known set holds the id only once
    assert_eq!(
        setup.ceremony.known_credentials().get_known_credentials(),
        vec![vec![1]]
    );
}
