//! Authentication types for JWT and tokens.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{UserId, WorkspaceId};

/// Role of a user within a workspace.
pub mod roles {
    /// Full access, including analytics.
    pub const ADMIN: &str = "admin";
    /// Day-to-day bookkeeping access.
    pub const MEMBER: &str = "member";
}

/// What a signed token is for.
///
/// Carried inside the claims so an access token can never mint new tokens
/// and a refresh token can never authorize a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, authorizes API requests.
    Access,
    /// Long-lived, exchangeable for a fresh token pair.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        })
    }
}

/// The claim set carried by every signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: UserId,
    /// Workspace ID (tenant scope).
    pub wsp: WorkspaceId,
    /// User's role in the workspace.
    pub role: String,
    /// Token kind discriminator.
    pub typ: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Builds the claim set for one token of the given kind and lifetime.
    #[must_use]
    pub fn issue(
        user_id: UserId,
        workspace_id: WorkspaceId,
        role: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            wsp: workspace_id,
            role: role.to_string(),
            typ: kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub.into_inner()
    }

    /// Returns the workspace ID from claims.
    #[must_use]
    pub const fn workspace_id(&self) -> Uuid {
        self.wsp.into_inner()
    }

    /// Returns true if the claims carry the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
///
/// Registration creates a new workspace with this user as its admin.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// User full name.
    pub name: String,
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
    /// Workspace name (defaults to the user's name).
    pub workspace_name: Option<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Workspace ID.
    pub workspace_id: Uuid,
    /// User full name.
    pub name: String,
    /// User email.
    pub email: String,
    /// User's role in the workspace.
    pub role: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_accessors() {
        let user = UserId::new();
        let wsp = WorkspaceId::new();
        let claims = Claims::issue(user, wsp, roles::ADMIN, TokenKind::Access, Duration::minutes(15));

        assert_eq!(claims.user_id(), user.into_inner());
        assert_eq!(claims.workspace_id(), wsp.into_inner());
        assert_eq!(claims.typ, TokenKind::Access);
        assert!(claims.is_admin());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_member_is_not_admin() {
        let claims = Claims::issue(
            UserId::new(),
            WorkspaceId::new(),
            roles::MEMBER,
            TokenKind::Refresh,
            Duration::days(7),
        );
        assert!(!claims.is_admin());
    }
}
