/*
 * Responsibility
 * - GET /services/{service}/authorize?capabilities=a,b
 * - 認証済み User の grants で service + capabilities を判定する (204 / 403)
 */
use axum::{
    extract::{Path, Query},
    http::StatusCode,
};
use tracing::info;

use crate::api::v1::dto::authorize::AuthorizeQuery;
use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;

pub async fn authorize(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(service): Path<String>,
    Query(query): Query<AuthorizeQuery>,
) -> Result<StatusCode, AppError> {
    let capabilities = query.capabilities();

    ctx.user
        .is_authorized(&service, &capabilities)
        .inspect_err(|e| {
            info!(user_id = ctx.user.user_id, service = %service, reason = %e, "authorization denied");
        })?;

    Ok(StatusCode::NO_CONTENT)
}
