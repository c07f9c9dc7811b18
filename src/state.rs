/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (Authenticator は Arc で共有、内部は immutable)
 */
use std::sync::Arc;

use crate::services::auth::Authenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(auth: Arc<Authenticator>) -> Self {
        Self { auth }
    }
}
