use uuid::Uuid;

use crate::utils::Claims;

/// Source of the caller's identity. `None` means "not signed in" and every
/// operation that needs an owner stops before touching a remote store.
pub trait SessionProvider: Send + Sync {
    fn current_identity(&self) -> Option<Uuid>;

    fn sign_out(&mut self);
}

/// Session backed by an HS256 access token.
pub struct TokenSession {
    token: Option<String>,
    secret: Vec<u8>,
    audience: String,
}

impl TokenSession {
    pub fn new(secret: impl Into<Vec<u8>>, audience: impl Into<String>) -> Self {
        Self { token: None, secret: secret.into(), audience: audience.into() }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }
}

impl SessionProvider for TokenSession {
    /// Decodes the token on every call; an expired token yields `None`.
    fn current_identity(&self) -> Option<Uuid> {
        let token = self.token.as_deref()?;
        match Claims::decode(token, &self.secret, &self.audience) {
            Ok(claims) => Some(claims.sub),
            Err(err) => {
                tracing::debug!(error = %err, "Session token rejected");
                None
            }
        }
    }

    fn sign_out(&mut self) {
        self.token = None;
    }
}

/// Fixed identity, e.g. one already verified by the hosting application.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    identity: Option<Uuid>,
}

impl StaticSession {
    pub fn signed_in(owner_id: Uuid) -> Self {
        Self { identity: Some(owner_id) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionProvider for StaticSession {
    fn current_identity(&self) -> Option<Uuid> {
        self.identity
    }

    fn sign_out(&mut self) {
        self.identity = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn token_session_yields_subject() {
        let owner = Uuid::now_v7();
        let token = Claims::new(&owner, "authenticated", 300).encode(SECRET).unwrap();
        let mut session = TokenSession::new(SECRET, "authenticated").with_token(token);

        assert_eq!(session.current_identity(), Some(owner));
        session.sign_out();
        assert_eq!(session.current_identity(), None);
    }

    #[test]
    fn invalid_or_expired_token_means_no_identity() {
        let session = TokenSession::new(SECRET, "authenticated").with_token("not-a-jwt");
        assert_eq!(session.current_identity(), None);

        let mut claims = Claims::new(&Uuid::now_v7(), "authenticated", 0);
        claims.exp = claims.iat.saturating_sub(3600);
        let expired = claims.encode(SECRET).unwrap();
        let session = TokenSession::new(SECRET, "authenticated").with_token(expired);
        assert_eq!(session.current_identity(), None);

        assert_eq!(TokenSession::new(SECRET, "authenticated").current_identity(), None);
    }

    #[test]
    fn static_session_signs_out() {
        let owner = Uuid::now_v7();
        let mut session = StaticSession::signed_in(owner);
        assert_eq!(session.current_identity(), Some(owner));
        session.sign_out();
        assert_eq!(session.current_identity(), None);
        assert_eq!(StaticSession::anonymous().current_identity(), None);
    }
}
