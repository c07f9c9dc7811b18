use std::path::Path;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use thiserror::Error;
use tracing::{debug, error};

use crate::services::auth::claims::Claims;
use crate::services::auth::keys::{self, KeyError};
use crate::services::auth::user::User;

#[derive(Debug, Error)]
#[error("failed to sign access token: {0}")]
pub struct SignError(#[source] jsonwebtoken::errors::Error);

/// RS256 access-token issuer.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct Signer {
    issuer: String,
    expiry_seconds: i64,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("issuer", &self.issuer)
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl Signer {
    /// Load the RSA private key at `private_key_path` (PEM).
    pub fn new(
        issuer: impl Into<String>,
        expiry_seconds: i64,
        private_key_path: impl AsRef<Path>,
    ) -> Result<Self, KeyError> {
        let pem = keys::read_pem(private_key_path.as_ref())?;
        Self::from_pem(issuer, expiry_seconds, &pem)
    }

    pub fn from_pem(
        issuer: impl Into<String>,
        expiry_seconds: i64,
        private_key_pem: &[u8],
    ) -> Result<Self, KeyError> {
        let encoding_key = keys::rsa_encoding_key(private_key_pem)?;

        Ok(Self {
            issuer: issuer.into(),
            expiry_seconds,
            encoding_key,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_seconds
    }

    /// Claims envelope for `user` as of now.
    pub fn claims_for(&self, user: &User) -> Claims {
        let iat = chrono::Utc::now().timestamp();

        Claims {
            user: user.clone(),
            iss: self.issuer.clone(),
            iat,
            exp: iat + self.expiry_seconds,
        }
    }

    pub fn sign(&self, user: &User) -> Result<String, SignError> {
        let claims = self.claims_for(user);

        let mut header = Header::new(Algorithm::RS256);
        header.typ = Some("JWT".to_string());

        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(user_id = claims.user.user_id, error = %e, "failed to sign JWT");
            SignError(e)
        })?;

        debug!(
            user_id = claims.user.user_id,
            iss = %claims.iss,
            exp = claims.exp,
            "signed access token"
        );

        Ok(token)
    }
}
