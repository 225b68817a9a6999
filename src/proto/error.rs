//! Agent protocol errors.

use std::string::FromUtf8Error;

use thiserror::Error;

/// SSH agent protocol error.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// A field declared more bytes than the message still holds.
    #[error("Truncated message: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Number of bytes the field required.
        needed: usize,
        /// Number of bytes left in the message.
        remaining: usize,
    },

    /// An incoming frame declared a length that does not fit the receive buffer.
    #[error("Frame of {length} bytes exceeds buffer capacity of {capacity} bytes")]
    FrameTooLarge {
        /// Declared frame length, excluding the length field itself.
        length: usize,
        /// Capacity of the receive buffer.
        capacity: usize,
    },

    /// An incoming frame declared a length of zero and so carries no message type.
    #[error("Frame without message type")]
    EmptyFrame,

    /// Received command was not supported.
    #[error("Command not supported ({command})")]
    UnsupportedCommand {
        /// Command code that was unsupported.
        command: u8,
    },

    /// Received string was not UTF-8 encoded.
    #[error("String encoding failed: {0}")]
    StringEncoding(#[from] FromUtf8Error),

    /// Error encoding SSH structures.
    #[error("SSH encoding error: {0}")]
    SshEncoding(#[from] ssh_encoding::Error),
}

impl ProtoError {
    /// Whether this error breaks the framing of the stream.
    ///
    /// Such errors end the session: nothing after the offending
    /// frame header can be trusted to start on a frame boundary.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::FrameTooLarge { .. } | Self::EmptyFrame)
    }
}

/// Protocol result.
pub type ProtoResult<T> = Result<T, ProtoError>;
