/*
 * Responsibility
 * - GET /me: token に埋め込まれた User をそのまま返す
 */
use axum::Json;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::services::auth::User;

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<User> {
    Json(ctx.user)
}
