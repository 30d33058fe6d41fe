//! Unified error types for tidewatch.
//!
//! Error codes:
//! - FETCH_001: Tide source unreachable or returned a non-2xx status
//! - PARSE_001: Malformed document, header, or cell value
//! - HEADER_001: Station date header absent from the document
//! - EMPTY_001: Header present but no usable table rows
//! - DB_001: Storage transaction or query failure
//! - VALID_001: Caller-supplied input rejected
//! - CONFIG_001: Invalid configuration

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// FETCH_001
    Fetch,
    /// PARSE_001
    Parse,
    /// HEADER_001
    MissingHeader,
    /// EMPTY_001
    EmptyResult,
    /// DB_001
    Storage,
    /// VALID_001
    Validation,
    /// CONFIG_001
    Config,
}

impl ErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch => "FETCH_001",
            Self::Parse => "PARSE_001",
            Self::MissingHeader => "HEADER_001",
            Self::EmptyResult => "EMPTY_001",
            Self::Storage => "DB_001",
            Self::Validation => "VALID_001",
            Self::Config => "CONFIG_001",
        }
    }

    /// Get the HTTP status code.
    ///
    /// Upstream document problems surface as 502: the request was fine,
    /// the tide source was not.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Fetch | Self::Parse | Self::MissingHeader | Self::EmptyResult => 502,
            Self::Storage | Self::Config => 500,
            Self::Validation => 400,
        }
    }
}

/// Unified error type for tidewatch.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing header: {0}")]
    MissingHeader(String),

    #[error("empty result: {0}")]
    EmptyResult(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn missing_header(msg: impl Into<String>) -> Self {
        Self::MissingHeader(msg.into())
    }

    pub fn empty_result(msg: impl Into<String>) -> Self {
        Self::EmptyResult(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Fetch(_) => ErrorCode::Fetch,
            Self::Parse(_) => ErrorCode::Parse,
            Self::MissingHeader(_) => ErrorCode::MissingHeader,
            Self::EmptyResult(_) => ErrorCode::EmptyResult,
            Self::Storage(_) => ErrorCode::Storage,
            Self::Validation(_) => ErrorCode::Validation,
            Self::Config(_) => ErrorCode::Config,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        self.error_code().http_status()
    }

    /// True for failures of the whole source document (as opposed to
    /// storage or caller errors).
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::Parse(_) | Self::MissingHeader(_) | Self::EmptyResult(_)
        )
    }
}
