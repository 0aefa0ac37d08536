use crate::model::Credentials;
use sha2::{Digest, Sha512};

pub const TIMESTAMP: &str = "timestamp";
pub const SIGN: &str = "sign";
pub const APP_ID: &str = "appId";
/* Same header as `timestamp` once case-folded; the API expects both spellings */
pub const TIME_STAMP: &str = "timeStamp";

/// Authentication headers for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub timestamp: String,
    pub sign: String,
    pub app_id: String,
}

impl SignedHeaders {
    /// Sign for the current second. Never reuse the result for another call.
    pub fn now(credentials: &Credentials) -> Self {
        Self::at(credentials, chrono::Utc::now().timestamp())
    }

    pub fn at(credentials: &Credentials, timestamp: i64) -> Self {
        let timestamp = timestamp.to_string();
        Self {
            sign: sign(credentials, &timestamp),
            app_id: credentials.app_id.to_owned(),
            timestamp,
        }
    }

    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (TIMESTAMP, &self.timestamp),
            (SIGN, &self.sign),
            (APP_ID, &self.app_id),
            (TIME_STAMP, &self.timestamp),
        ]
    }
}

/// Lowercase hex of `SHA-512(app_id + app_secret + timestamp)`.
pub fn sign(credentials: &Credentials, timestamp: &str) -> String {
    let digest = Sha512::new()
        .chain_update(&credentials.app_id)
        .chain_update(&credentials.app_secret)
        .chain_update(timestamp)
        .finalize();
    format!("{:x}", digest)
}
