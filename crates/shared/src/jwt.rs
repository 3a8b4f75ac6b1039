//! Signed token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the workspace-scoped [`Claims`]. Access
//! and refresh tokens share the claim shape but are discriminated by
//! [`TokenKind`], so one can never stand in for the other: a refresh token
//! presented to an API endpoint fails verification, as does an access token
//! presented for exchange.

use chrono::Duration;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::{Claims, TokenKind};
use crate::types::{UserId, WorkspaceId};

/// Signing configuration for the token service.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime in days.
    pub refresh_ttl_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        }
    }
}

/// Errors from token issuance or verification.
#[derive(Debug, Error)]
pub enum JwtError {
    /// The token is structurally invalid or its signature does not match.
    #[error("token is malformed or has a bad signature")]
    Malformed,

    /// The token has expired.
    #[error("token has expired")]
    Expired,

    /// A valid token of the other kind was presented.
    #[error("token kind mismatch: expected {expected}")]
    WrongKind {
        /// The kind the operation requires.
        expected: TokenKind,
    },

    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// An access/refresh pair issued together at login or exchange.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived token authorizing API requests.
    pub access_token: String,
    /// Long-lived token exchangeable for a fresh pair.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Issues and verifies the workspace-scoped token pair.
#[derive(Clone)]
pub struct JwtService {
    access_ttl: Duration,
    refresh_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a token service from the signing configuration.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issues a fresh access/refresh pair for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Signing` if either token cannot be signed.
    pub fn issue_pair(
        &self,
        user_id: UserId,
        workspace_id: WorkspaceId,
        role: &str,
    ) -> Result<TokenPair, JwtError> {
        let access = self.sign(Claims::issue(
            user_id,
            workspace_id,
            role,
            TokenKind::Access,
            self.access_ttl,
        ))?;
        let refresh = self.sign(Claims::issue(
            user_id,
            workspace_id,
            role,
            TokenKind::Refresh,
            self.refresh_ttl,
        ))?;

        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Verifies an access token presented with an API request.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` for an expired token, `WrongKind` for a
    /// refresh token, and `Malformed` for anything else unverifiable.
    pub fn verify_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify(token, TokenKind::Access)
    }

    /// Verifies a refresh token presented for exchange.
    ///
    /// # Errors
    ///
    /// Same as [`JwtService::verify_access`], with `WrongKind` for an
    /// access token.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify(token, TokenKind::Refresh)
    }

    fn sign(&self, claims: Claims) -> Result<String, JwtError> {
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed,
            },
        )?;

        if data.claims.typ != expected {
            return Err(JwtError::WrongKind { expected });
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles;

    fn service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn test_pair_round_trip() {
        let svc = service();
        let user = UserId::new();
        let wsp = WorkspaceId::new();

        let pair = svc.issue_pair(user, wsp, roles::ADMIN).unwrap();
        assert_eq!(pair.expires_in, 15 * 60);

        let claims = svc.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.user_id(), user.into_inner());
        assert_eq!(claims.workspace_id(), wsp.into_inner());
        assert!(claims.is_admin());
    }

    #[test]
    fn test_kinds_do_not_cross() {
        let svc = service();
        let pair = svc
            .issue_pair(UserId::new(), WorkspaceId::new(), roles::MEMBER)
            .unwrap();

        assert!(matches!(
            svc.verify_access(&pair.refresh_token),
            Err(JwtError::WrongKind {
                expected: TokenKind::Access
            })
        ));
        assert!(matches!(
            svc.verify_refresh(&pair.access_token),
            Err(JwtError::WrongKind {
                expected: TokenKind::Refresh
            })
        ));
        assert!(svc.verify_refresh(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            service().verify_access("not.a.token"),
            Err(JwtError::Malformed)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let pair = service()
            .issue_pair(UserId::new(), WorkspaceId::new(), roles::ADMIN)
            .unwrap();

        let other = JwtService::new(&JwtConfig {
            secret: "a-different-secret".to_string(),
            ..JwtConfig::default()
        });
        assert!(matches!(
            other.verify_access(&pair.access_token),
            Err(JwtError::Malformed)
        ));
    }
}
