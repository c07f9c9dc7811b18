/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が token を検証して request extensions に格納し、handler はこの型だけを受け取る
 */
use crate::services::auth::User;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user` は token に埋め込まれていた User そのもの (再取得・補完はしない)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user: User,
}

impl AuthCtx {
    pub fn new(user: User) -> Self {
        Self { user }
    }
}
