//! # Error Types
//!
//! Error handling for the codec gateway.
//!
//! Every failure of an `encode` or `decode` call is terminal for that call and
//! is returned to the caller. The gateway never retries and never swallows an
//! error.
//!
//! ## Error Categories
//! - **Selector Errors**: unknown format, compression or decompression tags
//! - **Decode Errors**: malformed input, wrong text/binary expectation, corrupt bytes
//! - **Shape Errors**: a payload that does not fit a document-shaped format
//! - **Encode Errors**: values the format encoder or compressor cannot write
//! - **Configuration Errors**: config loading, parsing and validation
//!
//! ## Example Usage
//! ```rust
//! use codec_gateway::error::CodecError;
//! use codec_gateway::Codec;
//! use serde_json::json;
//!
//! let codec = Codec::default();
//! match codec.encode_tagged(&json!({"a": 1}), "unsupported", false) {
//!     Err(CodecError::UnsupportedFormat(tag)) => assert_eq!(tag, "unsupported"),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

use crate::core::serialization::Format;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Text/binary expectation errors
    pub const ERR_EXPECTED_TEXT: &str = "decoder expects text input, got binary";
    pub const ERR_EXPECTED_BINARY: &str = "decoder expects binary input, got text";

    /// Decompression errors
    pub const ERR_DECOMPRESSION_FAILED: &str = "decompression failed";
    pub const ERR_DECOMPRESSION_LIMIT: &str = "decompressed output exceeds size limit";
    pub const ERR_DECOMPRESSED_NOT_UTF8: &str = "decompressed output is not valid UTF-8";

    /// Nesting errors
    pub const ERR_NESTING_LIMIT: &str = "input nests deeper than the configured limit";

    /// Markup errors
    pub const ERR_XML_NO_ROOT: &str = "xml document has no root element";
    pub const ERR_XML_MULTIPLE_ROOTS: &str = "xml document has more than one root element";
    pub const ERR_XML_UNCLOSED: &str = "xml document ends inside an open element";
    pub const ERR_XML_TEXT_OUTSIDE_ROOT: &str = "text data outside of root node";
    pub const ERR_XML_NESTED_SEQUENCE: &str = "xml cannot represent a sequence inside a sequence";
}

/// CodecError is the error type for all gateway operations
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported compression algorithm: {0}")]
    UnsupportedCompression(String),

    #[error("Unsupported decompression algorithm: {0}")]
    UnsupportedDecompression(String),

    #[error("Invalid data or format: {0}")]
    InvalidDataOrFormat(String),

    #[error("Type mismatch: {format} requires a document payload, got {found}")]
    TypeMismatch { format: Format, found: &'static str },

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Compression failed: {0}")]
    CompressionFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CodecError {
    /// Shorthand for an `InvalidDataOrFormat` carrying any displayable cause
    pub(crate) fn invalid(reason: impl std::fmt::Display) -> Self {
        CodecError::InvalidDataOrFormat(reason.to_string())
    }

    /// Shorthand for a `SerializeError` carrying any displayable cause
    pub(crate) fn serialize(reason: impl std::fmt::Display) -> Self {
        CodecError::SerializeError(reason.to_string())
    }
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
