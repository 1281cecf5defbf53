//! JWT verification with pre-computed keys

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// "access" or "refresh"; tokens without a type are treated as access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Verifies bearer tokens against the shared secret
///
/// Keys are derived once at startup and shared through `Arc`.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding: Arc<DecodingKey>,
    encoding: Arc<EncodingKey>,
    validation: Arc<Validation>,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(Validation::new(Algorithm::HS256)),
        }
    }

    /// Validate an access token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?
            .claims;

        match claims.token_type.as_deref() {
            None | Some("access") => Ok(claims),
            Some(other) => Err(anyhow::anyhow!("Not an access token: {}", other)),
        }
    }

    /// Issue an access token signed with the same secret
    ///
    /// Production tokens come from the accounts service; this is for local
    /// tooling and tests.
    pub fn issue(&self, user_id: Uuid, ttl_secs: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            token_type: Some("access".to_string()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }
}
