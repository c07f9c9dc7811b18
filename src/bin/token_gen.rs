use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use token_auth::services::auth::{Signer, User};

/// Mint an RS256 access token for a user described in a JSON file.
///
/// The JSON must match the token's `user` claim:
/// `{"user_id": 1, "first_name": "...", "last_name": "...", "email": "...",
///   "username": "...", "permissions": {"billing": ["read"]}}`
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Path to the RSA private key in PEM (PKCS#1 or PKCS#8)
    #[arg(long, value_name = "FILE", env = "JWT_PRIVATE_KEY_PATH")]
    private_key: PathBuf,

    /// Value of the `iss` claim
    #[arg(long, env = "AUTH_ISSUER")]
    issuer: String,

    /// Seconds until the token expires (`exp` = `iat` + expiry)
    #[arg(
        long,
        default_value_t = 600,
        env = "ACCESS_TOKEN_TTL_SECONDS",
        allow_negative_numbers = true
    )]
    expiry: i64,

    /// Path to the user JSON file
    #[arg(long, value_name = "FILE")]
    user: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let token = mint(&args)?;

    println!("{token}");
    Ok(())
}

fn mint(args: &Args) -> Result<String> {
    let raw = fs::read_to_string(&args.user)
        .with_context(|| format!("failed to read {}", args.user.display()))?;
    let user: User = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid user document", args.user.display()))?;

    let signer = Signer::new(args.issuer.as_str(), args.expiry, &args.private_key)?;
    Ok(signer.sign(&user)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use token_auth::services::auth::{AuthError, Authenticator};

    use super::*;

    const PRIVATE_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/private.pem");
    const PUBLIC_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/public.pem");

    fn user_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn args(user: &tempfile::NamedTempFile, expiry: &str) -> Args {
        Args::try_parse_from([
            "token-gen",
            "--private-key",
            PRIVATE_KEY,
            "--issuer",
            "accounts.test",
            "--expiry",
            expiry,
            "--user",
            user.path().to_str().unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn minted_token_authenticates_as_file_user() {
        let file = user_file(
            r#"{"user_id":9,"first_name":"Ada","last_name":"Lovelace","email":"ada@example.com","username":"ada","permissions":{"billing":["read"]}}"#,
        );

        let token = mint(&args(&file, "600")).unwrap();
        let user = Authenticator::new(PUBLIC_KEY)
            .unwrap()
            .with_issuer("accounts.test")
            .authenticate(&token)
            .unwrap();

        assert_eq!(user.user_id, 9);
        assert_eq!(user.username, "ada");
        assert_eq!(user.is_authorized("billing", &["read"]), Ok(()));
    }

    #[test]
    fn negative_expiry_mints_an_expired_token() {
        let file = user_file(r#"{"user_id":1}"#);

        let token = mint(&args(&file, "-30")).unwrap();

        assert!(matches!(
            Authenticator::new(PUBLIC_KEY).unwrap().authenticate(&token),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn invalid_user_document_is_rejected() {
        let file = user_file("not json");

        let err = mint(&args(&file, "600")).unwrap_err();

        assert!(err.to_string().contains("is not a valid user document"));
    }
}
