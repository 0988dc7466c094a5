//! Shared error type across wafgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Missing or unknown access token.
    AuthFailed,
    /// Unknown or empty WAF group.
    NotFound,
    /// Instance descriptor or config file is incomplete.
    Config,
    /// Upstream WAF answered with a non-success response.
    Vendor,
    /// Upstream WAF could not be reached.
    Transport,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Config => "CONFIG",
            ClientCode::Vendor => "VENDOR",
            ClientCode::Transport => "TRANSPORT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WafGateError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum WafGateError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid token")]
    AuthFailed,
    #[error("WAF {0} not found")]
    NotFound(String),
    #[error("config: {0}")]
    Config(String),
    #[error("vendor responded with HTTP {status}")]
    Vendor { status: u16, body: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl WafGateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            WafGateError::BadRequest(_) => ClientCode::BadRequest,
            WafGateError::AuthFailed => ClientCode::AuthFailed,
            WafGateError::NotFound(_) => ClientCode::NotFound,
            WafGateError::Config(_) => ClientCode::Config,
            WafGateError::Vendor { .. } => ClientCode::Vendor,
            WafGateError::Transport(_) => ClientCode::Transport,
            WafGateError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Upstream response body, when the failure carried a non-empty one.
    pub fn details(&self) -> Option<&str> {
        match self {
            WafGateError::Vendor { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}
