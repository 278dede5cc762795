//! use certview::error::CertViewError;

use thiserror::Error;

/// Errors raised while turning user text into a DER byte buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// Nothing left to decode once PEM markers and whitespace are stripped.
    #[error("No certificate data found in input")]
    EmptyPayload,

    /// The payload is not valid Base64.
    #[error("Invalid Base64 payload: {0}")]
    InvalidBase64(String),
}

impl From<base64::DecodeError> for FramingError {
    fn from(err: base64::DecodeError) -> Self {
        FramingError::InvalidBase64(err.to_string())
    }
}

/// Errors raised by the TLV decoder on malformed ASN.1 input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The declared length runs past the end of the buffer.
    #[error("Truncated ASN.1 data at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Indefinite or otherwise malformed length octets.
    #[error("Invalid ASN.1 length at offset {offset}: {reason}")]
    InvalidLength { offset: usize, reason: &'static str },

    /// A multi-byte tag number that does not fit in 32 bits or is cut short.
    #[error("Invalid ASN.1 tag at offset {offset}")]
    InvalidTag { offset: usize },

    /// Constructed values nest deeper than the configured maximum.
    #[error("ASN.1 nesting exceeds maximum depth of {max}")]
    DepthExceeded { max: usize },

    /// More nodes than the configured maximum.
    #[error("ASN.1 structure exceeds maximum of {max} nodes")]
    TooManyNodes { max: usize },

    /// Bytes left over after the top-level element.
    #[error("Trailing data after ASN.1 structure: consumed {consumed} of {total} bytes")]
    TrailingData { consumed: usize, total: usize },
}

/// Errors raised when a decoded tree does not have the certificate or CSR layout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A mandatory element is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// An element is present but carries the wrong tag.
    #[error("Unexpected tag for {field}: expected {expected}, found {found}")]
    UnexpectedTag {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// An element has the right tag but an unusable value.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// The key algorithm has no decomposition; the key stays as raw bytes.
    #[error("Unsupported key algorithm: {0}")]
    UnsupportedKeyAlgorithm(String),
}

/// Failure inside a single extension formatter. Always replaced by a hex dump.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtensionFormatError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The value decoded but carried nothing to display.
    #[error("Extension value is empty")]
    Empty,
}

/// Represents errors that abort a parse.
///
/// The `Display` output is the single message surfaced to callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertViewError {
    #[error(transparent)]
    Framing(#[from] FramingError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
