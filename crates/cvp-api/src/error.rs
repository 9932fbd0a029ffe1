use thiserror::Error;

use crate::workspace::WorkspaceState;

/// Top-level error type for the `cvp-api` crate.
///
/// Covers transport failures, controller-side API errors, payload
/// decoding, and workspace transaction failures. The CLI layer maps
/// these into user-facing diagnostics and exit codes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    ///
    /// Terminal for the operation that raised it: there is no way to
    /// proceed without a response. The dispatch boundary decides
    /// whether to terminate or report.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller API ──────────────────────────────────────────────
    /// Non-2xx response from the controller.
    #[error("CVP API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Workspace transactions ──────────────────────────────────────
    /// A transaction step was invoked out of order.
    #[error("workspace operation '{op}' invalid in state {from:?}")]
    InvalidTransition { from: WorkspaceState, op: &'static str },

    /// The workspace build did not reach a ready state within the bound.
    #[error("workspace {workspace_id} build not ready after {waited_secs}s")]
    BuildTimeout { workspace_id: String, waited_secs: u64 },

    /// The controller reported the workspace build as failed.
    #[error("workspace {workspace_id} build failed: {detail}")]
    BuildFailed { workspace_id: String, detail: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::BuildTimeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` for transport-level failures (connectivity,
    /// DNS, timeout) as opposed to controller-reported errors.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
