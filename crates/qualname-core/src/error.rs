//! Shared error type across qualname crates.

use thiserror::Error;

/// Stable error codes (used in logs and by foreign-language peers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Name rejected by the active filter, or no filter active.
    PermissionDenied,
    /// Import or attribute lookup failed partway through a dotted path.
    ResolutionFailure,
    /// Source-mode invocation without a usable `source`.
    MissingArgument,
    /// The resolved or compiled callable failed.
    InvocationFailure,
    /// Schema inference, encoding or decoding failed.
    CodecFailure,
    /// Source text could not be turned into a callable.
    SourceCompilation,
    /// Invalid configuration document.
    Config,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::ResolutionFailure => "RESOLUTION_FAILURE",
            ErrorCode::MissingArgument => "MISSING_ARGUMENT",
            ErrorCode::InvocationFailure => "INVOCATION_FAILURE",
            ErrorCode::CodecFailure => "CODEC_FAILURE",
            ErrorCode::SourceCompilation => "SOURCE_COMPILATION",
            ErrorCode::Config => "CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, QualnameError>;

/// Unified error type used by core and transform crates.
#[derive(Debug, Error)]
pub enum QualnameError {
    #[error("fully qualified name \"{name}\" not allowed by filter {filter}")]
    PermissionDenied { name: String, filter: String },
    #[error("cannot resolve \"{prefix}\": {reason}")]
    ResolutionFailure { prefix: String, reason: String },
    #[error("missing argument: {0}")]
    MissingArgument(String),
    #[error("invocation failed: {0}")]
    InvocationFailure(String),
    #[error("codec: {0}")]
    CodecFailure(String),
    #[error("source compilation: {0}")]
    SourceCompilation(String),
    #[error("config: {0}")]
    Config(String),
}

impl QualnameError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            QualnameError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            QualnameError::ResolutionFailure { .. } => ErrorCode::ResolutionFailure,
            QualnameError::MissingArgument(_) => ErrorCode::MissingArgument,
            QualnameError::InvocationFailure(_) => ErrorCode::InvocationFailure,
            QualnameError::CodecFailure(_) => ErrorCode::CodecFailure,
            QualnameError::SourceCompilation(_) => ErrorCode::SourceCompilation,
            QualnameError::Config(_) => ErrorCode::Config,
        }
    }

    pub(crate) fn codec(msg: impl Into<String>) -> Self {
        QualnameError::CodecFailure(msg.into())
    }
}
