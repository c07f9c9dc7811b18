/*
 * Responsibility
 * - 環境変数の読み込み (PORT, APP_ENV, JWT 公開鍵パス, issuer, leeway)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Resource server verifies access tokens with this public key
    pub jwt_public_key_path: PathBuf,
    // When set, tokens must carry exactly this `iss`
    pub auth_issuer: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_or("PORT", get("PORT"), 3000)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(&get("APP_ENV").unwrap_or_default());

        let jwt_public_key_path = get("JWT_PUBLIC_KEY_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("JWT_PUBLIC_KEY_PATH"))?;

        let auth_issuer = get("AUTH_ISSUER").filter(|s| !s.trim().is_empty());

        let access_token_leeway_seconds = parse_or(
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            get("ACCESS_TOKEN_LEEWAY_SECONDS"),
            0,
        )?;

        let request_timeout_seconds = parse_or(
            "REQUEST_TIMEOUT_SECONDS",
            get("REQUEST_TIMEOUT_SECONDS"),
            30,
        )?;

        Ok(Self {
            addr,
            app_env,
            jwt_public_key_path,
            auth_issuer,
            access_token_leeway_seconds,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}
