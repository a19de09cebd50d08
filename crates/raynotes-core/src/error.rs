//! Error types for Raynotes core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer will map these
//! to user-friendly messages.

use thiserror::Error;

/// Result type alias for Raynotes operations.
pub type Result<T> = std::result::Result<T, RayError>;

/// Core error type for Raynotes operations.
#[derive(Debug, Error)]
pub enum RayError {
    /// Ciphertext length is not a whole number of cipher blocks
    #[error("Malformed ciphertext: length is not a multiple of the block size")]
    MalformedCiphertext,

    /// The padding trailer recovered after decryption is out of range
    #[error("Invalid padding in decrypted data")]
    InvalidPadding,

    /// The decrypted payload did not decompress
    #[error("Decompression failed")]
    Decompression,

    /// Catch-all failure surfaced when importing an archive.
    ///
    /// Import deliberately does not reveal which pipeline stage failed, so a
    /// wrong passphrase and a corrupted file are indistinguishable to callers.
    #[error("Invalid decryption password or corrupted file")]
    BadPassphraseOrCorrupt,

    /// A note document field was not valid base64
    #[error("Invalid base64 in note document: {source}")]
    InvalidBase64 {
        #[from]
        source: base64::DecodeError,
    },

    /// A note document decoded but did not parse as a document tree
    #[error("Invalid note document: {0}")]
    InvalidNoteJson(String),

    /// A note carried an unparseable modification timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
