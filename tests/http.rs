use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use tower::ServiceExt;

use token_auth::app::build_router;
use token_auth::config::{AppEnv, Config};
use token_auth::services::auth::{Authenticator, Permissions, Signer, User};
use token_auth::state::AppState;

const PRIVATE_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/private.pem");
const PUBLIC_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/public.pem");

fn config() -> Config {
    Config {
        addr: ([127, 0, 0, 1], 0).into(),
        app_env: AppEnv::Development,
        jwt_public_key_path: PathBuf::from(PUBLIC_KEY),
        auth_issuer: None,
        access_token_leeway_seconds: 0,
        request_timeout: Duration::from_secs(5),
    }
}

fn app() -> Router {
    let auth = Authenticator::new(PUBLIC_KEY).expect("load public key");
    build_router(AppState::new(Arc::new(auth)), &config())
}

fn user() -> User {
    User {
        user_id: 7,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        username: "ada".to_string(),
        permissions: Permissions::new()
            .grant("fake_service", ["c1"])
            .grant("all", ["audit"]),
    }
}

fn token(expiry_seconds: i64) -> String {
    Signer::new("accounts.test", expiry_seconds, PRIVATE_KEY)
        .expect("load private key")
        .sign(&user())
        .expect("sign")
}

async fn get(uri: &str, authorization: Option<String>) -> Response {
    let mut req = Request::builder().uri(uri);
    if let Some(value) = authorization {
        req = req.header(header::AUTHORIZATION, value);
    }

    app()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json(res: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_needs_no_token() {
    let res = get("/health", None).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn me_returns_embedded_user() {
    let res = get("/api/v1/me", Some(format!("Bearer {}", token(600)))).await;

    assert_eq!(res.status(), StatusCode::OK);
    let got: User = serde_json::from_value(json(res).await).unwrap();
    assert_eq!(got, user());
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let res = get("/api/v1/me", None).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(res).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_header_is_unauthorized() {
    let res = get("/api/v1/me", Some(token(600))).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(res).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn expired_token_asks_for_refresh() {
    let res = get("/api/v1/me", Some(format!("Bearer {}", token(-5)))).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = json(res).await;
    assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
    assert_eq!(body["error"]["message"], "expired jwt needs refresh");
}

#[tokio::test]
async fn authorize_allows_granted_capabilities() {
    let uri = "/api/v1/services/Fake_Service/authorize?capabilities=c1,audit";
    let res = get(uri, Some(format!("Bearer {}", token(600)))).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn authorize_reports_missing_capabilities() {
    let uri = "/api/v1/services/fake_service/authorize?capabilities=c1,c2,c3";
    let res = get(uri, Some(format!("Bearer {}", token(600)))).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json(res).await["error"]["message"],
        "user is not authorized to use capabilities [c2 c3]"
    );
}

#[tokio::test]
async fn authorize_rejects_ungranted_service() {
    let uri = "/api/v1/services/billing/authorize?capabilities=audit";
    let res = get(uri, Some(format!("Bearer {}", token(600)))).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json(res).await["error"]["message"],
        "user is not authorized to use service billing"
    );
}

#[tokio::test]
async fn authorize_requires_a_token() {
    let res = get("/api/v1/services/fake_service/authorize", None).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
