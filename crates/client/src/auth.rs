//! Login/logout and bearer-token claim decoding.
//!
//! The backend issues a JWT access token; the client decodes its payload
//! segment (no signature check -- the claims are only used for display
//! and local authorization gating, the server remains the authority) to
//! learn the user id and role, then publishes the identity through the
//! process-wide [`SessionContext`].

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ddw_api::VideoService;
use ddw_core::error::{ClientError, ClientResult};
use ddw_core::session::{Identity, Role, SessionContext};
use ddw_core::types::DbId;
use serde::Deserialize;

/// Drives the session lifecycle. The only writer of [`SessionContext`].
pub struct AuthFlow<S> {
    service: Arc<S>,
    session: SessionContext,
}

impl<S> Clone for AuthFlow<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            session: self.session.clone(),
        }
    }
}

impl<S: VideoService> AuthFlow<S> {
    pub fn new(service: Arc<S>, session: SessionContext) -> Self {
        Self { service, session }
    }

    /// Exchange credentials for a bearer token and install the identity.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Identity> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation("enter a username and password"));
        }

        let response = self.service.login(username, password).await?;
        let identity = identity_from_token(&response.access_token)?;

        tracing::info!(user_id = identity.user_id, "Signed in");
        self.session.set(identity.clone());
        Ok(identity)
    }

    /// Install an identity from an existing token (e.g. one supplied via
    /// the environment) without a login round trip.
    pub fn resume(&self, token: &str) -> ClientResult<Identity> {
        let identity = identity_from_token(token)?;
        self.session.set(identity.clone());
        Ok(identity)
    }

    /// Clear the process-wide identity.
    pub fn logout(&self) {
        tracing::info!("Signed out");
        self.session.clear();
    }
}

/// Claims the client reads from the access token payload.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    /// Subject -- the user id. Some issuers encode it as a string.
    sub: serde_json::Value,
    role: Role,
}

/// Decode the payload segment of a JWT-shaped bearer token.
pub fn identity_from_token(token: &str) -> ClientResult<Identity> {
    let malformed = || ClientError::validation("the session token is malformed");

    let mut segments = token.split('.');
    let (_header, payload) = match (segments.next(), segments.next()) {
        (Some(h), Some(p)) if !p.is_empty() => (h, p),
        _ => return Err(malformed()),
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|_| malformed())?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).map_err(|_| malformed())?;

    let user_id: DbId = match &claims.sub {
        serde_json::Value::Number(n) => n.as_i64().ok_or_else(malformed)?,
        serde_json::Value::String(s) => s.parse().map_err(|_| malformed())?,
        _ => return Err(malformed()),
    };

    Ok(Identity {
        token: token.to_string(),
        user_id,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn token_with_claims(claims: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims);
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn decodes_numeric_subject() {
        let token = token_with_claims(r#"{"sub":7,"role":"user","exp":1}"#);
        let identity = identity_from_token(&token).unwrap();
        assert_eq!(identity.user_id, 7);
        assert_eq!(identity.role, Role::User);
        assert_eq!(identity.token, token);
    }

    #[test]
    fn decodes_string_subject_and_admin_role() {
        let token = token_with_claims(r#"{"sub":"12","role":"admin"}"#);
        let identity = identity_from_token(&token).unwrap();
        assert_eq!(identity.user_id, 12);
        assert!(identity.role.is_admin());
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_matches!(
            identity_from_token("not-a-jwt"),
            Err(ClientError::Validation(_))
        );
        assert_matches!(
            identity_from_token("a.!!!.c"),
            Err(ClientError::Validation(_))
        );
        let token = token_with_claims(r#"{"role":"user"}"#);
        assert_matches!(identity_from_token(&token), Err(ClientError::Validation(_)));
    }
}
