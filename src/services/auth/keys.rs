//! PEM key material loading.
//!
//! Keys are read once when a `Signer` / `Authenticator` is built. Any failure
//! here is a construction error; nothing is retried or degraded.

use std::path::{Path, PathBuf};

use jsonwebtoken::{DecodingKey, EncodingKey};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read key file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid RSA key pem: {0}")]
    Parse(#[source] jsonwebtoken::errors::Error),
}

pub(crate) fn read_pem(path: &Path) -> Result<Vec<u8>, KeyError> {
    std::fs::read(path).map_err(|source| {
        warn!(path = %path.display(), error = %source, "failed to read key file");
        KeyError::Read {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// `pem` must be an RSA private key (PKCS#1 or PKCS#8).
pub(crate) fn rsa_encoding_key(pem: &[u8]) -> Result<EncodingKey, KeyError> {
    EncodingKey::from_rsa_pem(pem).map_err(|e| {
        warn!(error = %e, "failed to parse RSA private key PEM");
        KeyError::Parse(e)
    })
}

/// `pem` must be an RSA public key (PKCS#1 or SPKI).
pub(crate) fn rsa_decoding_key(pem: &[u8]) -> Result<DecodingKey, KeyError> {
    DecodingKey::from_rsa_pem(pem).map_err(|e| {
        warn!(error = %e, "failed to parse RSA public key PEM");
        KeyError::Parse(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_pem(Path::new("/definitely/not/here.pem")).unwrap_err();

        assert!(matches!(err, KeyError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.pem"));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            rsa_encoding_key(b"not a key"),
            Err(KeyError::Parse(_))
        ));
        assert!(matches!(
            rsa_decoding_key(b"not a key"),
            Err(KeyError::Parse(_))
        ));
    }
}
