use crate::client::WireClient;
use crate::config::CeremonyConfig;
use crate::storage::{KeyValueStore, KnownCredentials};

use super::action::ActionResult;
use super::errors::{CeremonyError, PlatformError};
use super::platform::PlatformAuthenticator;

/// Length of the random challenge generated for every ceremony.
pub(super) const CHALLENGE_LEN: usize = 32;

/// Where a ceremony invocation currently stands.
///
/// `AwaitingPlatformCeremony` is the only stage that suspends on user or
/// hardware interaction; `Submitting` suspends on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyStage {
    Idle,
    AwaitingPlatformCeremony,
    Cancelled,
    TimedOut,
    Obtained,
    Encoding,
    Submitting,
    Succeeded,
    Failed,
}

/// Drives WebAuthn registration and authentication ceremonies.
///
/// One `Ceremony` serves one browser profile: it owns the platform
/// capability, the profile's known-credential record and the wire client.
/// Invocations take `&mut self`, so a single instance never runs two
/// ceremonies at once. Callers sharing the underlying store between several
/// instances must serialize invocations themselves (the UI disables its
/// triggers while a ceremony is outstanding); the store is last-writer-wins.
///
/// There is no retry and no independent timeout: a platform cancellation or
/// timeout ends the invocation like any other failure.
pub struct Ceremony<P, S, W> {
    pub(super) config: CeremonyConfig,
    pub(super) platform: P,
    pub(super) known_credentials: KnownCredentials<S>,
    pub(super) wire: W,
    pub(super) stage: CeremonyStage,
}

impl<P, S, W> Ceremony<P, S, W>
where
    P: PlatformAuthenticator,
    S: KeyValueStore,
    W: WireClient,
{
    pub fn new(config: CeremonyConfig, platform: P, store: S, wire: W) -> Self {
        Self {
            config,
            platform,
            known_credentials: KnownCredentials::new(store),
            wire,
            stage: CeremonyStage::Idle,
        }
    }

    pub fn config(&self) -> &CeremonyConfig {
        &self.config
    }

    /// The last stage reached by the most recent invocation.
    pub fn stage(&self) -> CeremonyStage {
        self.stage
    }

    pub fn known_credentials(&self) -> &KnownCredentials<S> {
        &self.known_credentials
    }

    pub fn can_register(&self, username: &str) -> bool {
        !username.is_empty()
    }

    /// Authentication needs a username and at least one enrolled credential.
    pub fn can_authenticate(&self, username: &str) -> bool {
        !username.is_empty() && !self.known_credentials.get_known_credentials().is_empty()
    }

    /// Runs [`Ceremony::register`] and folds the outcome into a displayable result.
    pub async fn run_register(
        &mut self,
        username: &str,
        attestation_type: Option<&str>,
        authenticator_attachment: Option<&str>,
    ) -> ActionResult {
        match self
            .register(username, attestation_type, authenticator_attachment)
            .await
        {
            Ok(()) => ActionResult::registered(),
            Err(e) => ActionResult::from_error(&e),
        }
    }

    /// Runs [`Ceremony::authenticate`] and folds the outcome into a displayable result.
    pub async fn run_authenticate(&mut self, username: &str) -> ActionResult {
        match self.authenticate(username).await {
            Ok(()) => ActionResult::authenticated(),
            Err(e) => ActionResult::from_error(&e),
        }
    }

    pub(super) fn enter(&mut self, stage: CeremonyStage) {
        tracing::debug!("Ceremony stage: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    pub(super) fn fail(&mut self, error: impl Into<CeremonyError>) -> CeremonyError {
        let error = error.into();
        tracing::error!("Ceremony failed at {:?}: {}", self.stage, error);
        self.enter(CeremonyStage::Failed);
        error
    }

    pub(super) fn platform_failed(&mut self, error: PlatformError) -> CeremonyError {
        let stage = match error {
            PlatformError::Cancelled(_) => CeremonyStage::Cancelled,
            PlatformError::TimedOut(_) => CeremonyStage::TimedOut,
            PlatformError::NotSupported(_) | PlatformError::Other(_) => CeremonyStage::Failed,
        };
        tracing::warn!("Platform ceremony rejected: {}", error);
        self.enter(stage);
        error.into()
    }

    pub(super) fn require_username(&mut self, username: &str) -> Result<(), CeremonyError> {
        if username.is_empty() {
            return Err(self.fail(CeremonyError::InvalidInput(
                "username is required".to_string(),
            )));
        }
        Ok(())
    }
}
