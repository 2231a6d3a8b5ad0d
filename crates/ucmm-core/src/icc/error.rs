//! ICC Profile Error Types

use std::io;

use thiserror::Error;

use super::signatures::{TagSignature, TypeSignature};

/// Errors that can occur when reading ICC profiles
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IccError {
    /// A read ran past the end of the stream or payload
    #[error("truncated data: needed {needed} bytes at offset {offset}, {available} available")]
    TruncatedData {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// Invalid profile file signature (should be 'acsp')
    #[error("invalid profile signature: 0x{0:08X} (expected 'acsp')")]
    InvalidSignature(u32),

    /// Tag payload does not match its declared layout
    #[error("malformed '{type_sig}' payload: {reason}")]
    MalformedTag {
        type_sig: TypeSignature,
        reason: String,
    },

    /// Tag table entry points outside the stream
    #[error("tag '{tag}' out of bounds: offset {offset} + size {size} > stream length {stream_len}")]
    TagOutOfBounds {
        tag: TagSignature,
        offset: u32,
        size: u32,
        stream_len: u64,
    },

    /// Payload type signature has no registered parser
    #[error("unsupported tag type '{0}'")]
    UnsupportedType(TypeSignature),

    /// Tag is absent from the tag table
    #[error("tag '{0}' not found")]
    TagNotFound(TagSignature),

    /// The profile header has not been parsed
    #[error("profile header not available")]
    HeaderNotFound,

    /// No stream is available for the profile
    #[error("no profile stream available")]
    NoFile,

    /// Opening the profile source failed
    #[error("cannot open profile: {0}")]
    Open(#[source] io::Error),

    /// I/O error while reading
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl IccError {
    pub(crate) fn malformed(type_sig: TypeSignature, reason: impl Into<String>) -> Self {
        Self::MalformedTag {
            type_sig,
            reason: reason.into(),
        }
    }
}
