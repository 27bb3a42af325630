//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use spalink_config::ConfigError;
use spalink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the spa at {url}")]
    #[diagnostic(
        code(spalink::connection_failed),
        help(
            "Check that the spa controller is powered and on the network.\n\
             Cause: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_ms}ms")]
    #[diagnostic(
        code(spalink::timeout),
        help("Increase the timeout with --timeout-ms or check the spa's responsiveness.")
    )]
    Timeout { timeout_ms: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("The spa rejected the API key (HTTP {status})")]
    #[diagnostic(
        code(spalink::auth_failed),
        help("Verify the key, then store it with: spalink config set-key")
    )]
    AuthRejected { status: u16 },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(spalink::no_credentials),
        help(
            "Configure credentials with: spalink config init\n\
             Or pass --api-key / set SPALINK_API_KEY."
        )
    )]
    NoCredentials { profile: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("API error (HTTP {status} {status_text}): {body}")]
    #[diagnostic(code(spalink::api_error))]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Malformed response from the spa: {message}")]
    #[diagnostic(
        code(spalink::malformed_response),
        help("Check that the endpoint points at the spa API root.")
    )]
    MalformedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(spalink::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(spalink::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: spalink config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No spa endpoint configured")]
    #[diagnostic(
        code(spalink::no_config),
        help(
            "Create a profile with: spalink config init\n\
             Or pass --endpoint / set SPALINK_ENDPOINT.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(spalink::config))]
    Config { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(spalink::internal))]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(spalink::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthRejected { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_ms } => Self::Timeout { timeout_ms },
            CoreError::Api {
                status: status @ (401 | 403),
                ..
            } => Self::AuthRejected { status },
            CoreError::Api {
                status,
                status_text,
                body,
            } => Self::Api {
                status,
                status_text,
                body,
            },
            CoreError::MalformedResponse { message } => Self::MalformedResponse { message },
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::Config { message } => Self::Config { message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let cases = [
            (CoreError::Timeout { timeout_ms: 5000 }, exit_code::TIMEOUT),
            (
                CoreError::ConnectionFailed {
                    url: "http://spa.local/status".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::Api {
                    status: 401,
                    status_text: "Unauthorized".into(),
                    body: String::new(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::Api {
                    status: 500,
                    status_text: "Internal Server Error".into(),
                    body: String::new(),
                },
                exit_code::GENERAL,
            ),
            (
                CoreError::Validation {
                    field: "pump".into(),
                    reason: "bad".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::MalformedResponse {
                    message: "empty body".into(),
                },
                exit_code::GENERAL,
            ),
            (
                CoreError::Internal("status fetch task failed".into()),
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn missing_credentials_is_an_auth_failure() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "default".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
