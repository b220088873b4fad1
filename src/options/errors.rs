//! # Options Codec Errors
//!
//! Every codec error is a malformed-options condition: the raw input
//! itself is corrupt, as opposed to semantically invalid.

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Options decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Options payload truncated")]
    Truncated,

    #[error("Bad magic bytes")]
    BadMagic,

    #[error("Unsupported options format version {0}")]
    UnsupportedVersion(u8),

    #[error("Checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("Unknown value tag {0}")]
    UnknownTag(u8),

    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("Duplicate option key '{0}'")]
    DuplicateKey(String),

    #[error("Option 'required' must be a boolean, got {0}")]
    RequiredNotBoolean(&'static str),

    #[error("{0} trailing bytes after options body")]
    TrailingBytes(usize),

    #[error("Value nesting exceeds depth {0}")]
    TooDeep(usize),
}

impl CodecError {
    /// Wire code shared by every codec error
    pub fn code(&self) -> &'static str {
        "ATTR_MALFORMED_OPTIONS"
    }
}
