//! Token Service
//!
//! Signs and verifies customer bearer tokens (HS256). Tokens embed the
//! customer's id, email, name and phone. Expiry is optional: with no
//! configured lifetime the token carries no `exp` claim and stays valid
//! until the signing secret changes.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::customer::entity::Customer;
use crate::shared::error::{PlatformError, Result};

/// Claims carried by a customer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerClaims {
    /// Customer id
    pub sub: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp); absent for non-expiring tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC signing secret; must not be empty
    pub signing_secret: String,
    pub issuer: String,
    pub expiry_secs: Option<u64>,
}

impl TokenConfig {
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            issuer: "bankcore".to_string(),
            expiry_secs: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_expiry_secs(mut self, expiry_secs: Option<u64>) -> Self {
        self.expiry_secs = expiry_secs;
        self
    }
}

/// Token issuer
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Result<Self> {
        if config.signing_secret.is_empty() {
            return Err(PlatformError::configuration("Token signing secret must not be empty"));
        }

        let encoding_key = EncodingKey::from_secret(config.signing_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.signing_secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// Issue a signed token for a customer
    pub fn issue(&self, customer: &Customer) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = CustomerClaims {
            sub: customer.id.clone(),
            email: customer.email.clone(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: self
                .config
                .expiry_secs
                .map(|secs| now.saturating_add(i64::try_from(secs).unwrap_or(i64::MAX))),
        };

        self.sign(&claims)
    }

    pub fn sign(&self, claims: &CustomerClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| PlatformError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature, issuer and (when configured) expiry.
    pub fn verify(&self, token: &str) -> Result<CustomerClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        if self.config.expiry_secs.is_none() {
            validation.required_spec_claims.remove("exp");
        }

        decode::<CustomerClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => PlatformError::TokenExpired,
                _ => PlatformError::invalid_token(e.to_string()),
            })
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn customer() -> Customer {
        Customer::new(
            "Ada Obi",
            "ada@example.com",
            "+2348000000000",
            "1 Marina Road",
            NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            "NIN-0001",
            "$argon2id$stub",
        )
    }

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(TokenConfig::new("test-secret")).unwrap();
        let customer = customer();

        let token = service.issue(&customer).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, customer.id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.name, "Ada Obi");
        assert_eq!(claims.phone, "+2348000000000");
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_expiry_is_set_when_configured() {
        let config = TokenConfig::new("test-secret").with_expiry_secs(Some(3600));
        let service = TokenService::new(config).unwrap();

        let claims = service.verify(&service.issue(&customer()).unwrap()).unwrap();
        let exp = claims.exp.unwrap();
        assert!(exp - claims.iat == 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = TokenConfig::new("test-secret").with_expiry_secs(Some(60));
        let service = TokenService::new(config).unwrap();

        let now = Utc::now().timestamp();
        let claims = CustomerClaims {
            sub: "c1".to_string(),
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            phone: "1".to_string(),
            iss: "bankcore".to_string(),
            iat: now - 7200,
            exp: Some(now - 3600),
        };
        let token = service.sign(&claims).unwrap();

        assert!(matches!(service.verify(&token), Err(PlatformError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new(TokenConfig::new("secret-a")).unwrap();
        let verifier = TokenService::new(TokenConfig::new("secret-b")).unwrap();

        let token = issuer.issue(&customer()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(PlatformError::InvalidToken { .. })));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let issuer = TokenService::new(TokenConfig::new("s").with_issuer("other")).unwrap();
        let verifier = TokenService::new(TokenConfig::new("s")).unwrap();

        let token = issuer.issue(&customer()).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            TokenService::new(TokenConfig::new("")),
            Err(PlatformError::Configuration { .. })
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), None);
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
