// ── Core error types ──
//
// User-facing errors from klrent-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<klrent_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::pricing::DateRejection;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the rental portal at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- log in again")]
    SessionExpired,

    #[error("Not logged in -- run `klrent login` first")]
    NotLoggedIn,

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Rejected by the portal: {message}")]
    Rejected { status: u16, message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("{0}")]
    InvalidDate(DateRejection),

    #[error("Reservation is incomplete: {message}")]
    IncompleteQuote { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub(crate) fn incomplete(message: impl Into<String>) -> Self {
        Self::IncompleteQuote {
            message: message.into(),
        }
    }
}

impl From<DateRejection> for CoreError {
    fn from(rejection: DateRejection) -> Self {
        Self::InvalidDate(rejection)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<klrent_api::Error> for CoreError {
    fn from(err: klrent_api::Error) -> Self {
        match err {
            klrent_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            klrent_api::Error::SessionExpired => CoreError::SessionExpired,
            klrent_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: String::new(),
                        reason: e.to_string(),
                    }
                }
            }
            klrent_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            klrent_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            klrent_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            klrent_api::Error::Api { status, message } => CoreError::Rejected { status, message },
            klrent_api::Error::NotFound { resource } => CoreError::NotFound { resource },
            klrent_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
