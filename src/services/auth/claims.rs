use serde::{Deserialize, Serialize};

use crate::services::auth::user::User;

/// Access token payload: the embedded user plus registered temporal claims.
///
/// `exp` is always `iat` + the issuing `Signer`'s expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user: User,
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}
