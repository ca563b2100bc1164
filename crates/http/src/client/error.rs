//! Client error types

use thiserror::Error;

/// Failure of a single API call
///
/// By the time one of these reaches the caller the user has already been
/// notified, and for [`RequestError::AuthExpired`] the browser is already
/// navigating to the login page.
#[derive(Debug, Error)]
pub enum RequestError {
    /// No response was obtained
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a decodable error payload
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Authorization could not be recovered by a token refresh
    #[error("Authentication expired")]
    AuthExpired,

    /// Server answered with an error body that is not JSON
    #[error("Undecodable response ({status})")]
    Undecodable { status: u16 },

    /// Payload or response body did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RequestError {
    /// HTTP status carried by the error, if a response was received
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Undecodable { status } => Some(*status),
            _ => None,
        }
    }

    /// Check whether this error is an unrecoverable authentication failure
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

/// Error building a [`super::CrmClient`]
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Underlying HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Why a token refresh did not produce a new access token
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Nothing to exchange; no request was sent
    #[error("No refresh token available")]
    NoRefreshToken,

    /// Refresh endpoint could not be reached
    #[error("Refresh request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Refresh endpoint answered with a non-success status
    #[error("Refresh rejected with status {0}")]
    Rejected(u16),

    /// Refresh endpoint answered without a usable access token
    #[error("Malformed refresh response: {0}")]
    MalformedResponse(#[source] reqwest::Error),
}
