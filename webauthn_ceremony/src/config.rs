//! Central configuration for the webauthn_ceremony crate
//!
//! Values are read once from the environment (after loading `.env` when
//! present). Browser builds construct a [`CeremonyConfig`] from the page
//! location instead, see `browser::config_from_location`.

use std::{env, sync::LazyLock, time::Duration};

/// Origin of the verification page, e.g. `https://verify.example.com`.
///
/// Default: "http://localhost:8000"
pub static WEBAUTHN_ORIGIN: LazyLock<String> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    origin_or_default(env::var("WEBAUTHN_ORIGIN").ok().as_deref())
});

/// Relying party display name presented by the authenticator.
///
/// Default: "Pomerium"
pub static WEBAUTHN_RP_NAME: LazyLock<String> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    rp_name_or_default(env::var("WEBAUTHN_RP_NAME").ok().as_deref())
});

/// Base URL the ceremony envelopes are posted to. Defaults to the origin.
pub static WEBAUTHN_API_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    api_base_url_or_default(
        env::var("WEBAUTHN_API_BASE_URL").ok().as_deref(),
        &WEBAUTHN_ORIGIN,
    )
});

/// Transport timeout for the wire client, in seconds.
pub static WEBAUTHN_HTTP_TIMEOUT: LazyLock<u64> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    parse_timeout(env::var("WEBAUTHN_HTTP_TIMEOUT").ok().as_deref())
});

/// Location of the file-backed known-credential store on native targets.
///
/// Default: "known-credentials.json"
pub static WEBAUTHN_KNOWN_CREDENTIALS_PATH: LazyLock<String> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    known_credentials_path_or_default(
        env::var("WEBAUTHN_KNOWN_CREDENTIALS_PATH")
            .ok()
            .as_deref(),
    )
});

const DEFAULT_ORIGIN: &str = "http://localhost:8000";
const DEFAULT_RP_NAME: &str = "Pomerium";
const DEFAULT_KNOWN_CREDENTIALS_PATH: &str = "known-credentials.json";

fn origin_or_default(raw: Option<&str>) -> String {
    raw.unwrap_or(DEFAULT_ORIGIN).to_string()
}

fn rp_name_or_default(raw: Option<&str>) -> String {
    raw.unwrap_or(DEFAULT_RP_NAME).to_string()
}

fn api_base_url_or_default(raw: Option<&str>, origin: &str) -> String {
    raw.unwrap_or(origin).to_string()
}

fn known_credentials_path_or_default(raw: Option<&str>) -> String {
    raw.unwrap_or(DEFAULT_KNOWN_CREDENTIALS_PATH).to_string()
}

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

fn parse_timeout(raw: Option<&str>) -> u64 {
    match raw {
        None => DEFAULT_HTTP_TIMEOUT_SECS,
        Some(v) => match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                tracing::warn!(
                    "Invalid WEBAUTHN_HTTP_TIMEOUT: {}. Using default {}",
                    v,
                    DEFAULT_HTTP_TIMEOUT_SECS
                );
                DEFAULT_HTTP_TIMEOUT_SECS
            }
        },
    }
}

/// Extracts the relying party id (the bare host name) from an origin.
pub(crate) fn rp_id_from_origin(origin: &str) -> Option<String> {
    url::Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// Everything the orchestrator needs to know about its surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeremonyConfig {
    /// Relying party id; the browser's `location.hostname`.
    pub rp_id: String,
    /// Relying party display name.
    pub rp_name: String,
    /// Base URL of the remote verifier, without trailing slash.
    pub api_base_url: String,
    /// Transport timeout for wire submissions.
    pub http_timeout: Duration,
}

impl CeremonyConfig {
    pub fn new(
        rp_id: impl Into<String>,
        rp_name: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            rp_id: rp_id.into(),
            rp_name: rp_name.into(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Builds the configuration from the `WEBAUTHN_*` environment variables.
    pub fn from_env() -> Result<Self, String> {
        let config = Self::from_origin(
            &WEBAUTHN_ORIGIN,
            WEBAUTHN_RP_NAME.as_str(),
            WEBAUTHN_API_BASE_URL.as_str(),
            *WEBAUTHN_HTTP_TIMEOUT,
        )?;
        tracing::debug!("Ceremony config: {:?}", config);
        Ok(config)
    }

    /// Derives the relying party id from `origin`; fails when it has no host.
    fn from_origin(
        origin: &str,
        rp_name: &str,
        api_base_url: &str,
        http_timeout_secs: u64,
    ) -> Result<Self, String> {
        let rp_id = rp_id_from_origin(origin)
            .ok_or_else(|| format!("Could not extract RP ID from {origin}"))?;
        Ok(Self::new(rp_id, rp_name, api_base_url)
            .with_http_timeout(Duration::from_secs(http_timeout_secs)))
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}
