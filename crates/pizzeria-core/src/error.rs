//! Shared error type across pizzeria crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Frame exceeds the configured size limit.
    PayloadTooLarge,
    /// Host refused to open another session scope.
    SessionLimit,
    /// Unsupported protocol or config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::SessionLimit => "SESSION_LIMIT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PizzeriaError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum PizzeriaError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("session scope capacity exceeded")]
    CapacityExceeded,
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl PizzeriaError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PizzeriaError::BadRequest(_) => ClientCode::BadRequest,
            PizzeriaError::PayloadTooLarge => ClientCode::PayloadTooLarge,
            PizzeriaError::CapacityExceeded => ClientCode::SessionLimit,
            PizzeriaError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            PizzeriaError::Internal(_) => ClientCode::Internal,
        }
    }
}
