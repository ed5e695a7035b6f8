use httpmock::prelude::*;
use serde_json::Value;
use webauthn_ceremony::{
    AUTHENTICATE_PATH, FileKeyValueStore, KNOWN_CREDENTIALS_KEY, REGISTER_PATH,
};

use crate::common::{TEST_USERNAME, TestSetup, assertion_credential, registration_credential};

#[tokio::test]
async fn test_known_credentials_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile").join("known-credentials.json");
    let raw_id = [0xaa, 0xbb, 0xcc];

    // Given a registration recorded by one ceremony instance
    {
        let mut setup = TestSetup::with_store(FileKeyValueStore::new(&path)).await;
        setup
            .server
            .mock_async(|when, then| {
                when.method(POST).path(REGISTER_PATH);
                then.status(200);
            })
            .await;
        setup
            .platform
            .push_registration(Ok(registration_credential(&raw_id)));
        setup
            .ceremony
            .register(TEST_USERNAME, None, None)
            .await
            .unwrap();
    }

    // Then the file holds the id under the well-known key
    let content: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let stored: Value = serde_json::from_str(content[KNOWN_CREDENTIALS_KEY].as_str().unwrap())
        .unwrap();
    assert_eq!(stored, serde_json::json!(["qrvM"]));

    // When a new instance authenticates from the same profile
    let mut setup = TestSetup::with_store(FileKeyValueStore::new(&path)).await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(AUTHENTICATE_PATH);
            then.status(200);
        })
        .await;
    setup
        .platform
        .push_assertion(Ok(assertion_credential(&raw_id, None)));
    let result = setup.ceremony.authenticate(TEST_USERNAME).await;

    // Then the earlier registration is offered
    assert!(result.is_ok(), "authentication failed: {result:?}");
    let allow = setup
        .platform
        .last_authenticate_options()
        .allow_credentials
        .unwrap();
    assert_eq!(allow.len(), 1);
    assert_eq!(allow[0].id, raw_id.to_vec());
}

#[tokio::test]
async fn test_registrations_accumulate_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("known-credentials.json");
    let mut setup = TestSetup::with_store(FileKeyValueStore::new(&path)).await;
    setup
        .server
        .mock_async(|when, then| {
            when.method(POST).path(REGISTER_PATH);
            then.status(200);
        })
        .await;

    for raw_id in [[3u8], [1u8], [2u8]] {
        setup
            .platform
            .push_registration(Ok(registration_credential(&raw_id)));
        setup
            .ceremony
            .register(TEST_USERNAME, None, None)
            .await
            .unwrap();
    }

    assert_eq!(
        setup.ceremony.known_credentials().get_known_credentials(),
        vec![vec![3], vec![1], vec![2]]
    );
}
