//! Error types for the replay codec, compression and transport layers
//!
//! The public replay API reports failures as flags and options. Underneath,
//! every failure is one of these typed errors so it can be logged at the
//! point where it gets flattened.

use std::io;

use crate::net::packet::PacketError;

/// Errors raised while encoding or decoding the binary replay layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Buffer too small: need {needed} bytes, {remaining} remaining")]
    BufferTooSmall { needed: usize, remaining: usize },

    #[error("Unexpected end of input: need {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Field '{field}' is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("Invalid boolean byte: {0:#04x}")]
    InvalidBool(u8),

    #[error("Field '{field}' is too long to encode ({len})")]
    LengthOverflow { field: &'static str, len: usize },

    #[error("Unsupported replay format version {found} (newest supported: {max})")]
    UnsupportedVersion { found: u32, max: u32 },
}

/// Errors raised by the LZ4 compression wrapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompressionError {
    #[error("Failed to encode replay: {0}")]
    Codec(#[from] CodecError),

    #[error("LZ4 decompression failed: {0}")]
    Decompress(String),

    #[error("Declared replay size {declared} exceeds limit {max}")]
    TooLarge { declared: usize, max: usize },
}

/// Errors raised while moving replays to and from files or packets.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("File too large: {len} bytes (max {max})")]
    FileTooLarge { len: u64, max: u64 },

    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Compression(#[from] CompressionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display() {
        let err = CodecError::BufferTooSmall {
            needed: 4,
            remaining: 1,
        };
        assert_eq!(err.to_string(), "Buffer too small: need 4 bytes, 1 remaining");

        let err = CodecError::UnsupportedVersion { found: 9, max: 1 };
        assert!(err.to_string().contains("version 9"));
    }

    #[test]
    fn test_transport_error_wraps_codec_error() {
        let err: TransportError = CodecError::InvalidBool(7).into();
        assert!(matches!(err, TransportError::Codec(CodecError::InvalidBool(7))));
        assert_eq!(err.to_string(), "Invalid boolean byte: 0x07");
    }
}
