//! JWT session token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AuthError, AuthResult, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_JWT_ISSUER,
    MAX_JWT_EXPIRATION_HOURS,
};

/// JWT claims for companion session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (feed identity).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// JWT ID.
    pub jti: String,
}

impl Claims {
    /// Creates new claims for a feed user.
    pub fn new(fid: u64, issuer: &str, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let hours = expiration_hours.min(MAX_JWT_EXPIRATION_HOURS) as i64;
        let exp = now + Duration::hours(hours);

        Self {
            sub: fid.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Returns the feed identity.
    pub fn fid(&self) -> AuthResult<u64> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiration in hours.
    pub expiration_hours: u64,
    /// Token issuer.
    pub issuer: String,
}

impl JwtConfig {
    /// Creates a new JWT configuration.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            issuer: DEFAULT_JWT_ISSUER.to_string(),
        }
    }

    /// Sets the expiration time in hours, capped at [`MAX_JWT_EXPIRATION_HOURS`].
    pub fn with_expiration_hours(mut self, hours: u64) -> Self {
        self.expiration_hours = hours.min(MAX_JWT_EXPIRATION_HOURS);
        self
    }
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.config.issuer)
            .field("expiration_hours", &self.config.expiration_hours)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Creates a new JWT manager.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates a session token for a feed user.
    pub fn generate_token(&self, fid: u64) -> AuthResult<String> {
        let claims = Claims::new(fid, &self.config.issuer, self.config.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::JwtEncoding(e.to_string()))
    }

    /// Validates and decodes a token.
    pub fn validate_token(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Returns the expiration time in seconds.
    pub fn expiration_seconds(&self) -> u64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_generation_and_validation() {
        let config = JwtConfig::new("test-secret-key-must-be-long-enough-for-security");
        let manager = JwtManager::new(config);

        let token = manager.generate_token(4821).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.fid().unwrap(), 4821);
        assert_eq!(claims.iss, DEFAULT_JWT_ISSUER);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_invalid_token() {
        let config = JwtConfig::new("test-secret-key-must-be-long-enough-for-security");
        let manager = JwtManager::new(config);

        let result = manager.validate_token("invalid-token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let manager1 = JwtManager::new(JwtConfig::new("secret-one-must-be-long-enough"));
        let manager2 = JwtManager::new(JwtConfig::new("secret-two-must-be-long-enough"));

        let token = manager1.generate_token(1).unwrap();

        let result = manager2.validate_token(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let secret = "shared-secret-must-be-long-enough";
        let issuer_a = JwtManager::new(JwtConfig {
            issuer: "a".to_string(),
            ..JwtConfig::new(secret)
        });
        let issuer_b = JwtManager::new(JwtConfig {
            issuer: "b".to_string(),
            ..JwtConfig::new(secret)
        });

        let token = issuer_a.generate_token(1).unwrap();
        assert!(issuer_b.validate_token(&token).is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let mut claims = Claims::new(1, DEFAULT_JWT_ISSUER, 1);
        claims.sub = "alice".to_string();
        assert!(matches!(claims.fid(), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expiration_seconds() {
        let manager = JwtManager::new(JwtConfig::new("s").with_expiration_hours(2));
        assert_eq!(manager.expiration_seconds(), 7200);
    }

    #[test]
    fn test_expiration_is_capped() {
        let manager = JwtManager::new(JwtConfig::new("s").with_expiration_hours(u64::MAX));
        assert_eq!(manager.expiration_seconds(), MAX_JWT_EXPIRATION_HOURS * 3600);

        let claims = Claims::new(1, DEFAULT_JWT_ISSUER, u64::MAX);
        assert_eq!(
            claims.exp - claims.iat,
            (MAX_JWT_EXPIRATION_HOURS * 3600) as i64
        );
    }
}
