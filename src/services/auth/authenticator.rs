use std::path::Path;

use axum::http::HeaderMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;
use tracing::debug;

use crate::services::auth::bearer;
use crate::services::auth::claims::Claims;
use crate::services::auth::keys::{self, KeyError};
use crate::services::auth::user::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is not of the form: Bearer <token>")]
    MissingBearer,

    /// Signature was valid but the token is past `exp`; callers may refresh.
    #[error("expired jwt needs refresh")]
    Expired,

    #[error("jwt verification failed: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl AuthError {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Outcome of verifying a single token.
#[derive(Debug)]
pub enum Verification {
    Valid(User),
    Expired,
    /// Malformed structure, bad signature, or a claim check other than `exp`.
    Invalid(jsonwebtoken::errors::Error),
}

impl Verification {
    pub fn into_result(self) -> Result<User, AuthError> {
        match self {
            Self::Valid(user) => Ok(user),
            Self::Expired => Err(AuthError::Expired),
            Self::Invalid(e) => Err(AuthError::Invalid(e)),
        }
    }
}

/// RS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
/// - `exp` is required; leeway defaults to zero.
#[derive(Clone)]
pub struct Authenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl Authenticator {
    /// Load the RSA public key at `public_key_path` (PEM).
    pub fn new(public_key_path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let pem = keys::read_pem(public_key_path.as_ref())?;
        Self::from_pem(&pem)
    }

    pub fn from_pem(public_key_pem: &[u8]) -> Result<Self, KeyError> {
        let decoding_key = keys::rsa_decoding_key(public_key_pem)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Allow `seconds` of clock skew when checking `exp`.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.validation.leeway = seconds;
        self
    }

    /// Only accept tokens whose `iss` equals `issuer`.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn verify(&self, token: &str) -> Verification {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                debug!(
                    user_id = data.claims.user.user_id,
                    iss = %data.claims.iss,
                    exp = data.claims.exp,
                    "verified access token"
                );
                Verification::Valid(data.claims.user)
            }
            // `exp` is checked before `iss`; only report Expired when nothing else fails.
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                match self.check_ignoring_expiry(token) {
                    Ok(()) => {
                        debug!("access token expired");
                        Verification::Expired
                    }
                    Err(e) => {
                        debug!(error = %e, "expired access token also failed other checks");
                        Verification::Invalid(e)
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "access token verification failed");
                Verification::Invalid(e)
            }
        }
    }

    fn check_ignoring_expiry(&self, token: &str) -> Result<(), jsonwebtoken::errors::Error> {
        let mut validation = self.validation.clone();
        validation.validate_exp = false;
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation).map(|_| ())
    }

    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        self.verify(token).into_result()
    }

    /// Authenticate using the request's `Authorization: Bearer <token>` header.
    pub fn authenticate_request(&self, headers: &HeaderMap) -> Result<User, AuthError> {
        let token = bearer::token_from_headers(headers).ok_or(AuthError::MissingBearer)?;
        self.authenticate(token)
    }
}
