/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 全 route に access token 検証 (middleware::auth::access) を掛ける
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{authorize::authorize, me::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/me", get(me))
        .route("/services/{service}/authorize", get(authorize));

    middleware::auth::access::apply(router, state)
}
