use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::api::error;

/// Claims of a session access token issued by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub iat: u64,
    pub exp: u64,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    pub fn new(sub: &uuid::Uuid, aud: &str, exp: u64) -> Self {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        Claims { sub: *sub, iat: now, exp: now + exp, aud: aud.to_string(), email: None, role: None }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn encode(&self, secret: &[u8]) -> Result<String, error::SystemError> {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, self, &EncodingKey::from_secret(secret))?;
        Ok(token)
    }

    pub fn decode(token: &str, secret: &[u8], aud: &str) -> Result<Self, error::SystemError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.set_audience(&[aud]);
        let token_data = decode::<Self>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_subject() {
        let sub = uuid::Uuid::now_v7();
        let token = Claims::new(&sub, "authenticated", 60)
            .with_email("owner@example.com")
            .encode(b"secret")
            .unwrap();

        let claims = Claims::decode(&token, b"secret", "authenticated").unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn rejects_wrong_secret_and_audience() {
        let token = Claims::new(&uuid::Uuid::now_v7(), "authenticated", 60)
            .encode(b"secret")
            .unwrap();

        assert!(Claims::decode(&token, b"other", "authenticated").is_err());
        assert!(Claims::decode(&token, b"secret", "service_role").is_err());
    }
}
