//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use pamly_config::ConfigError;
use pamly_core::{ApiError, CoreError};

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
    #[error("Could not connect to appliance at {url}")]
    #[diagnostic(
        code(pamly::connection_failed),
        help(
            "Check that the appliance is reachable.\n\
             {reason}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(pamly::auth_failed),
        help(
            "Verify your username, password and identity provider.\n\
             Store a password with: pamly config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(pamly::no_credentials),
        help(
            "Configure credentials with: pamly config init\n\
             Or set PAMLY_TOKEN, or PAMLY_USERNAME and PAMLY_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(pamly::not_found),
        help("Run: pamly {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Workflow ─────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(pamly::invalid_state),
        help("Run: pamly requests list to see the request's current state")
    )]
    InvalidState { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(pamly::still_pending),
        help("Retry with --wait <secs> to wait for approval")
    )]
    StillPending { message: String },

    #[error("Batch request failed: {message}")]
    #[diagnostic(code(pamly::batch_failed))]
    PartialBatch { message: String },

    #[error("{failed} of {total} account jobs did not succeed")]
    #[diagnostic(code(pamly::task_failed))]
    TaskFailed { failed: usize, total: usize },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(pamly::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pamly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(pamly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: pamly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No appliance configured")]
    #[diagnostic(
        code(pamly::no_config),
        help(
            "Create a profile with: pamly config init\n\
             Or pass --appliance <URL>. Config file expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(pamly::config))]
    Config { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Timed out waiting for {waiting_for}")]
    #[diagnostic(
        code(pamly::timeout),
        help("Increase --wait or check the job on the appliance.")
    )]
    Timeout { waiting_for: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidState { .. } | Self::StillPending { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Authentication { message } => CliError::AuthFailed { message },

            CoreError::NotFound { message } => CliError::NotFound {
                resource_type: "record".into(),
                identifier: message,
                list_command: "<resource> list".into(),
            },

            err @ CoreError::InvalidState { .. } => CliError::InvalidState {
                message: err.to_string(),
            },

            err @ CoreError::StillPending { .. } => CliError::StillPending {
                message: err.to_string(),
            },

            CoreError::PartialBatch { message, .. } => CliError::PartialBatch { message },

            CoreError::Timeout { waiting_for } => CliError::Timeout { waiting_for },

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .map(|c| c.to_string())
                    .or_else(|| status.map(|s| format!("HTTP {s}")))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Decode { message, .. } => CliError::ApiError {
                code: "decode".into(),
                message,
            },

            err @ (CoreError::InvalidTaskId { .. } | CoreError::UnsupportedTask { .. }) => {
                CliError::ApiError {
                    code: "task".into(),
                    message: err.to_string(),
                }
            }

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        CoreError::from(err).into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile(name) => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
