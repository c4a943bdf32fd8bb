//! Sign-in nonce storage
//!
//! Nonces are issued before a sign-in and consumed by it. A nonce can be
//! taken at most once, which keeps a captured sign-in message from being
//! replayed.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;

use crate::{AuthError, AuthResult, DEFAULT_NONCE_TTL_SECS};

/// Generates a random URL-safe nonce.
pub fn generate_nonce() -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..24).map(|_| rng.random::<u8>()).collect();
    URL_SAFE_NO_PAD.encode(&bytes)
}

/// Trait for nonce storage
#[async_trait]
pub trait NonceStore: Send + Sync {
    /// Issue and remember a fresh nonce
    async fn issue(&self) -> AuthResult<String>;

    /// Consume a nonce
    ///
    /// Fails with [`AuthError::InvalidNonce`] if the nonce is unknown, was
    /// already taken, or has expired.
    async fn take(&self, nonce: &str) -> AuthResult<()>;

    /// Remove expired nonces
    ///
    /// Returns the number of nonces removed.
    async fn cleanup_expired(&self) -> AuthResult<usize>;
}

/// In-memory nonce store (single-process deployments and tests)
#[derive(Debug)]
pub struct MemoryNonceStore {
    ttl_secs: i64,
    nonces: RwLock<HashMap<String, i64>>,
}

impl Default for MemoryNonceStore {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_TTL_SECS)
    }
}

impl MemoryNonceStore {
    /// Create a store whose nonces live for `ttl_secs` seconds
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl_secs,
            nonces: RwLock::new(HashMap::new()),
        }
    }

    fn is_expired(&self, issued_at: i64, now: i64) -> bool {
        now - issued_at > self.ttl_secs
    }
}

#[async_trait]
impl NonceStore for MemoryNonceStore {
    async fn issue(&self) -> AuthResult<String> {
        let nonce = generate_nonce();
        let mut nonces = self
            .nonces
            .write()
            .map_err(|e| AuthError::NonceStore(format!("Lock poisoned: {}", e)))?;
        nonces.insert(nonce.clone(), chrono::Utc::now().timestamp());
        Ok(nonce)
    }

    async fn take(&self, nonce: &str) -> AuthResult<()> {
        let issued_at = {
            let mut nonces = self
                .nonces
                .write()
                .map_err(|e| AuthError::NonceStore(format!("Lock poisoned: {}", e)))?;
            nonces.remove(nonce)
        };

        match issued_at {
            Some(issued_at) if !self.is_expired(issued_at, chrono::Utc::now().timestamp()) => {
                Ok(())
            }
            _ => Err(AuthError::InvalidNonce),
        }
    }

    async fn cleanup_expired(&self) -> AuthResult<usize> {
        let now = chrono::Utc::now().timestamp();
        let mut nonces = self
            .nonces
            .write()
            .map_err(|e| AuthError::NonceStore(format!("Lock poisoned: {}", e)))?;
        let before_count = nonces.len();
        nonces.retain(|_, issued_at| !self.is_expired(*issued_at, now));
        let removed = before_count - nonces.len();
        if removed > 0 {
            tracing::debug!(removed, "Removed expired sign-in nonces");
        }
        Ok(removed)
    }
}
