use anyhow::Result;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SupabaseConfig;

/// Audience and database role every backend token carries.
pub const AUTHENTICATED: &str = "authenticated";

/// JWT Claims - data stored in the backend token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub aud: String,      // Audience
    pub role: String,     // Database role PostgREST switches to
    pub app_role: String, // Row-level-security tag for this service
    pub exp: i64,         // Expiration timestamp
    pub iat: i64,         // Issued at timestamp
    pub jti: String,      // JWT ID (unique token identifier)
}

/// Mints the short-lived tokens presented to the backend.
///
/// A fresh token is minted for every backend call, so no token outlives
/// the request that needed it.
#[derive(Clone)]
pub struct BackendTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    app_role: String,
    lifetime_secs: i64,
}

impl BackendTokenService {
    /// Create new token service with the backend's signing secret
    pub fn new(secret: &str, app_role: String, lifetime_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            app_role,
            lifetime_secs,
        }
    }

    pub fn from_config(config: &SupabaseConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.app_role.clone(),
            config.jwt_lifetime_secs,
        )
    }

    /// Mint a new HS256 token
    pub fn mint_token(&self) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            aud: AUTHENTICATED.to_string(),
            role: AUTHENTICATED.to_string(),
            app_role: self.app_role.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a token
    ///
    /// Returns claims if token is valid, addressed to the backend and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUTHENTICATED]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_verify_token() {
        let service = BackendTokenService::new("test_secret_key", "aws_lambda".to_string(), 60);

        let token = service.mint_token().unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.aud, "authenticated");
        assert_eq!(claims.role, "authenticated");
        assert_eq!(claims.app_role, "aws_lambda");
    }

    #[test]
    fn test_invalid_token() {
        let service = BackendTokenService::new("test_secret_key", "aws_lambda".to_string(), 60);
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = BackendTokenService::new("secret1", "aws_lambda".to_string(), 60);
        let service2 = BackendTokenService::new("secret2", "aws_lambda".to_string(), 60);

        let token = service1.mint_token().unwrap();

        // Token minted with secret1 should not verify with secret2
        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_token_lifetime() {
        let service = BackendTokenService::new("test_secret_key", "aws_lambda".to_string(), 300);

        let claims = service.verify_token(&service.mint_token().unwrap()).unwrap();

        let expires_in = claims.exp - claims.iat;
        assert_eq!(expires_in, 300);
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_each_token_is_unique() {
        let service = BackendTokenService::new("test_secret_key", "aws_lambda".to_string(), 60);
        let first = service.verify_token(&service.mint_token().unwrap()).unwrap();
        let second = service.verify_token(&service.mint_token().unwrap()).unwrap();
        assert_ne!(first.jti, second.jti);
    }
}
