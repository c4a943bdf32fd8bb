//! Session authentication for Todo-Cast.
//!
//! This crate provides:
//! - JWT session tokens keyed by feed identity
//! - Single-use sign-in nonces

mod error;
mod jwt;
mod nonce;

pub use error::*;
pub use jwt::*;
pub use nonce::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 24;

/// Longest accepted session lifetime in hours (one year).
pub const MAX_JWT_EXPIRATION_HOURS: u64 = 24 * 365;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "todocast";

/// Default lifetime of a sign-in nonce in seconds.
pub const DEFAULT_NONCE_TTL_SECS: i64 = 600;
