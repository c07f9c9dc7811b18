//! Signed identity tokens (RS256 JWT) and capability-based authorization.
//!
//! - [`services::auth::Signer`] mints a token embedding a [`services::auth::User`]
//! - [`services::auth::Authenticator`] verifies it and distinguishes expiry
//! - [`services::auth::User::is_authorized`] checks service + capability grants
//!
//! `app` wires the verifier into an axum resource server.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
