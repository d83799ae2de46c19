//! Session and credential handling
//!
//! The job store and API clients never read ambient storage. They receive a
//! [`CredentialProvider`] and ask it for the bearer token at the start of every
//! operation, so a login or logout between two calls is picked up immediately.
//!
//! # Module Structure
//!
//! - [`auth::credentials`](crate::auth::credentials) - in-memory and file-backed session holders
//!
//! # Role Gating
//!
//! Protected views call [`require_role`] (or [`require_any_role`]) before
//! doing anything. A missing token is an [`AppError::Auth`]; a role mismatch
//! is an [`AppError::AccessDenied`]. Both mean "send the user to login".
//!
//! ```ignore
//! use jobboard::auth::{require_role, credentials::FileCredentials};
//! use jobboard::types::Role;
//!
//! let credentials = FileCredentials::new(".jobboard/session.json");
//! let session = require_role(&credentials, Role::Hr)?;
//! ```

/// In-memory and file-backed credential holders.
pub mod credentials;

use crate::types::{AppError, Result, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Persisted login state, stored under the same keys the web client used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Session {
    pub fn new(access: Token, refresh: Token, role: Role) -> Self {
        Self {
            access_token: Some(access),
            refresh_token: Some(refresh),
            role: Some(role),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Read side of the session holder.
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, if logged in.
    fn token(&self) -> Option<Token>;

    /// Role recorded at login.
    fn role(&self) -> Option<Role>;

    fn session(&self) -> Session {
        Session {
            access_token: self.token(),
            refresh_token: None,
            role: self.role(),
        }
    }
}

/// Session holder that can also be written by login and logout.
pub trait SessionStore: CredentialProvider {
    fn save(&self, session: &Session) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Fails unless the holder has a token and exactly `required` as its role.
pub fn require_role(provider: &dyn CredentialProvider, required: Role) -> Result<Session> {
    require_any_role(provider, &[required])
}

/// Fails unless the holder has a token and one of `allowed` as its role.
pub fn require_any_role(provider: &dyn CredentialProvider, allowed: &[Role]) -> Result<Session> {
    let session = provider.session();
    if !session.is_authenticated() {
        return Err(AppError::Auth(
            "Not logged in. Run `jobboard login` first.".to_string(),
        ));
    }

    match session.role {
        Some(role) if allowed.contains(&role) => Ok(session),
        other => Err(AppError::AccessDenied {
            required: allowed
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(" or "),
            actual: other.map(|r| r.to_string()).unwrap_or_else(|| "none".to_string()),
        }),
    }
}
