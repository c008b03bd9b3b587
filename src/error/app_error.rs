use thiserror::Error;

/// Error type shared by every notification provider.
///
/// Providers never let these escape the dispatcher: the `send` wrapper on
/// [`NotificationProvider`](crate::services::notifications::NotificationProvider)
/// turns each one into a failed `NotificationResult` with the error text as
/// its detail.
#[derive(Error, Debug)]
pub enum AppError {
    /// Network, TLS or timeout failure while talking to the provider
    #[error("Transport error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered but did not report success
    #[error("Rejected by provider (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// A token exchange step did not yield a usable token
    #[error("Token exchange failed: {reason}")]
    Token { reason: String },

    /// Provider is missing required settings
    #[error("Provider {provider} is not configured")]
    NotConfigured { provider: String },

    /// Invalid setting value (bad proxy URL, bad header value, ...)
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        AppError::Transport { source: error }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl AppError {
    /// Creates a rejection error from an HTTP status and the raw body
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        AppError::Rejected {
            status,
            body: body.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
