pub mod authenticator;
pub mod bearer;
pub mod claims;
pub mod keys;
pub mod signer;
pub mod user;

pub use authenticator::{AuthError, Authenticator, Verification};
pub use claims::Claims;
pub use keys::KeyError;
pub use signer::{SignError, Signer};
pub use user::{AuthzError, Permissions, User};
