//! access token (RS256 JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を Authenticator で検証する
//! - 期限切れは 401 TOKEN_EXPIRED、それ以外の失敗は 401 UNAUTHORIZED
//! - 認可 (service/capability) は handler 側で `User::is_authorized` を使う

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Require a valid access token on every route of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = state
        .auth
        .authenticate_request(req.headers())
        .map_err(|err| {
            tracing::warn!(error = %err, path = %req.uri().path(), "access token rejected");
            AppError::from(err)
        })?;

    tracing::debug!(user_id = user.user_id, "request authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(user));

    Ok(next.run(req).await)
}
