//! Identity and request details the proxy attached to the current request,
//! as served read-only by `GET /api/verify-info`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerifyInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<VerifyInfoIdentity>,
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,
    pub request: VerifyInfoRequest,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyInfoRequest {
    pub host: String,
    pub hostname: String,
    pub method: String,
    pub origin: String,
    pub url: String,
    pub tls_valid: bool,
}

/// Claims of the identity token the proxy forwarded.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyInfoIdentity {
    pub iss: Option<String>,
    pub sub: Option<String>,
    pub aud: Option<Audience>,
    pub exp: Option<i64>,
    pub nbf: Option<i64>,
    pub iat: Option<i64>,
    pub jti: Option<String>,
    pub groups: Option<Vec<String>>,
    pub user: Option<String>,
    pub email: Option<String>,
    pub raw_jwt: Option<String>,
    pub public_key: Option<String>,
}

/// The `aud` claim is either a single string or a list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(a) => a == audience,
            Audience::Multiple(list) => list.iter().any(|a| a == audience),
        }
    }
}

impl VerifyInfoIdentity {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|t| DateTime::from_timestamp(t, 0))
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|t| DateTime::from_timestamp(t, 0))
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.nbf.and_then(|t| DateTime::from_timestamp(t, 0))
    }

    /// Whether `now` lies outside the `nbf`..`exp` window. Missing bounds are open.
    pub fn is_outside_validity(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| now >= exp)
            || self.not_before().is_some_and(|nbf| now < nbf)
    }
}
