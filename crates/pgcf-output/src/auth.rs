//! Credentials for the Cloud Storage sink.
//!
//! A deployment either hands over a ready OAuth2 access token or a service
//! account key. Keys are exchanged for a token with the JWT bearer grant:
//! an RS256-signed assertion is posted to the key's `token_uri`.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UploadError;

/// OAuth2 scope for reading and writing objects.
pub const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";

/// Token endpoint used when a key does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// How the storage sink authenticates.
#[derive(Debug, Clone)]
pub enum GcsCredential {
    /// A bearer token obtained elsewhere.
    AccessToken(String),
    /// A key exchanged for a bearer token on each upload.
    ServiceAccount(ServiceAccountKey),
}

/// The fields of a service account JSON key used for the token exchange.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccountKey {
    /// Parses a service account JSON key and checks its private key.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidCredentials`] if the JSON is malformed,
    /// a required field is empty, or the private key is not an RSA PEM key.
    pub fn from_json(json: &str) -> Result<Self, UploadError> {
        let key: Self = serde_json::from_str(json).map_err(|e| UploadError::InvalidCredentials {
            reason: e.to_string(),
        })?;
        if key.client_email.trim().is_empty() {
            return Err(UploadError::InvalidCredentials {
                reason: "client_email is empty".to_string(),
            });
        }
        key.encoding_key()?;
        Ok(key)
    }

    fn encoding_key(&self) -> Result<EncodingKey, UploadError> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            UploadError::InvalidCredentials {
                reason: format!("private_key: {e}"),
            }
        })
    }

    /// Signed JWT bearer assertion issued at `issued_at` (Unix seconds).
    pub fn assertion(&self, issued_at: u64) -> Result<String, UploadError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: STORAGE_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key()?).map_err(|e| {
            UploadError::InvalidCredentials {
                reason: format!("cannot sign assertion: {e}"),
            }
        })
    }

    /// Exchanges a fresh assertion for an access token.
    pub fn fetch_access_token(&self, client: &Client) -> Result<String, UploadError> {
        let issued_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        let body = format!(
            "grant_type={JWT_BEARER_GRANT}&assertion={}",
            self.assertion(issued_at)?
        );
        debug!(client_email = %self.client_email, token_uri = %self.token_uri, "requesting access token");

        let response = client
            .post(&self.token_uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .map_err(|source| UploadError::Network { source })?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|source| UploadError::Network { source })?;
        if !status.is_success() {
            return Err(UploadError::TokenRejected {
                status: status.as_u16(),
                message: text,
            });
        }
        let token: TokenResponse =
            serde_json::from_str(&text).map_err(|e| UploadError::TokenRejected {
                status: status.as_u16(),
                message: format!("malformed token response: {e}"),
            })?;
        Ok(token.access_token)
    }
}

impl GcsCredential {
    /// Bearer token for one request.
    pub fn bearer_token(&self, client: &Client) -> Result<String, UploadError> {
        match self {
            Self::AccessToken(token) => Ok(token.clone()),
            Self::ServiceAccount(key) => key.fetch_access_token(client),
        }
    }
}
