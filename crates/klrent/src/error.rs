//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use klrent_config::ConfigError;
use klrent_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the rental portal at {url}")]
    #[diagnostic(
        code(klrent::connection_failed),
        help(
            "Check that the portal API is running and reachable.\n\
             Configured URL: {url}\n\
             Change it with: klrent config set api_url <URL>"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(klrent::timeout),
        help("Increase the timeout with --timeout or check the portal's responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(klrent::auth_failed),
        help("Check your e-mail and password, then run: klrent login")
    )]
    AuthFailed { message: String },

    #[error("Your session has expired")]
    #[diagnostic(code(klrent::session_expired), help("Run: klrent login"))]
    SessionExpired,

    #[error("You are not logged in")]
    #[diagnostic(code(klrent::not_logged_in), help("Run: klrent login"))]
    NotLoggedIn,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(klrent::no_credentials),
        help(
            "Pass --email, set KLRENT_EMAIL, or run: klrent config init\n\
             Store the password with: klrent config set-password"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {resource}")]
    #[diagnostic(code(klrent::not_found))]
    NotFound { resource: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("The portal rejected the request ({status}): {message}")]
    #[diagnostic(code(klrent::rejected))]
    Rejected { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(klrent::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(
        code(klrent::invalid_date),
        help("Sundays are closed, and the return date must come after the pickup date.")
    )]
    InvalidDate { message: String },

    #[error("Reservation is incomplete: {message}")]
    #[diagnostic(code(klrent::incomplete))]
    Incomplete { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(klrent::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: klrent config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(klrent::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(klrent::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(klrent::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(klrent::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. }
            | Self::SessionExpired
            | Self::NotLoggedIn
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { status: 409, .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidDate { .. }
            | Self::Incomplete { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::SessionExpired => CliError::SessionExpired,
            CoreError::NotLoggedIn => CliError::NotLoggedIn,
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotFound { resource } => CliError::NotFound { resource },
            CoreError::Rejected { status, message } => CliError::Rejected { status, message },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::InvalidDate(rejection) => CliError::InvalidDate {
                message: rejection.to_string(),
            },
            CoreError::IncompleteQuote { message } => CliError::Incomplete { message },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<klrent_core::DateRejection> for CliError {
    fn from(rejection: klrent_core::DateRejection) -> Self {
        CoreError::from(rejection).into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
