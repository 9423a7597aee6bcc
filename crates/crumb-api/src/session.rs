//! Client-side view of the authentication session.
//!
//! The session provider is external; this type only carries the bearer
//! token it hands out. Protected calls go through [`Session::require`],
//! which turns an absent token into [`ApiError::Unauthenticated`] with the
//! intended destination preserved — the sign-in flow uses it to resume.

use crumb_core::AppConfig;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// A session with no token; protected calls will redirect to sign-in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            token: config.session_token.clone(),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token, or [`ApiError::Unauthenticated`] carrying
    /// `destination` when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] when no token is present.
    pub fn require(&self, destination: &str) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or_else(|| ApiError::Unauthenticated {
            destination: destination.to_string(),
        })
    }
}
