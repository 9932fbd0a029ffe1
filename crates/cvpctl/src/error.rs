//! CLI error types with miette diagnostics.
//!
//! Maps `cvp_api::Error` and `cvp_config::ConfigError` into user-facing
//! errors with actionable help text and distinct exit codes. Transport
//! failures terminate the operation here, at the dispatch boundary;
//! the client itself never exits the process.

use miette::Diagnostic;
use thiserror::Error;

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
    #[error("Could not reach the controller")]
    #[diagnostic(
        code(cvpctl::connection_failed),
        help(
            "Check that the controller is running and accessible.\n\
             For self-signed certificates, try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: cvp_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Controller rejected the request (HTTP {status})")]
    #[diagnostic(
        code(cvpctl::auth_failed),
        help("Verify the CVPTOKEN bearer token is valid and not expired.")
    )]
    AuthFailed { status: u16 },

    // ── API ──────────────────────────────────────────────────────────
    #[error("CVP API error (HTTP {status}): {message}")]
    #[diagnostic(code(cvpctl::api_error))]
    ApiError { status: u16, message: String },

    // ── Workspace ────────────────────────────────────────────────────
    #[error("Tag creation aborted: {source}")]
    #[diagnostic(
        code(cvpctl::workspace),
        help(
            "The workspace transaction did not reach SUBMITTED; the staged\n\
             change has no effect. An abandoned workspace may remain on the\n\
             controller."
        )
    )]
    Workspace {
        #[source]
        source: cvp_api::Error,
    },

    #[error("Workspace build did not become ready in time")]
    #[diagnostic(
        code(cvpctl::build_timeout),
        help("Increase the bound with --build-wait or check the controller.")
    )]
    BuildTimeout {
        #[source]
        source: cvp_api::Error,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(cvpctl::config),
        help("Set the CVP and CVPTOKEN environment variables, or configure a profile.")
    )]
    Config(#[from] cvp_config::ConfigError),

    // ── Everything else from the API crate ───────────────────────────
    #[error(transparent)]
    #[diagnostic(code(cvpctl::api))]
    Api(cvp_api::Error),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::BuildTimeout { .. } => exit_code::TIMEOUT,
            Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── cvp_api::Error → CliError mapping ────────────────────────────────

impl From<cvp_api::Error> for CliError {
    fn from(err: cvp_api::Error) -> Self {
        match err {
            cvp_api::Error::Transport(_) | cvp_api::Error::Tls(_) => {
                Self::ConnectionFailed { source: err }
            }
            cvp_api::Error::Api { status, .. } if status == 401 || status == 403 => {
                Self::AuthFailed { status }
            }
            cvp_api::Error::Api { status, message } => Self::ApiError { status, message },
            cvp_api::Error::BuildTimeout { .. } => Self::BuildTimeout { source: err },
            cvp_api::Error::BuildFailed { .. } | cvp_api::Error::InvalidTransition { .. } => {
                Self::Workspace { source: err }
            }
            other => Self::Api(other),
        }
    }
}
