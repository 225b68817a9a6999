//! Agent session errors.

use std::io;

use thiserror::Error;

use crate::proto::ProtoError;

/// Error ending an agent session.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Malformed framing or message encoding.
    #[error("Agent: Protocol error: {0}")]
    Proto(#[from] ProtoError),

    /// Channel read or write failed.
    #[error("Agent: I/O error: {0}")]
    IO(#[from] io::Error),
}

impl AgentError {
    /// Whether the peer broke the framing of the channel.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::Proto(error) if error.is_protocol_violation())
    }
}

/// Failure to sign on behalf of the remote peer.
#[derive(Debug, Error)]
pub enum SignError {
    /// The identity's key type cannot be served by this agent.
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// The key material could not be used.
    #[error("Key error: {0}")]
    Key(#[from] ssh_key::Error),

    /// RSA key components are inconsistent.
    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),

    /// The signature operation failed.
    #[error("Signature error: {0}")]
    Signature(#[from] signature::Error),

    /// Any other error raised by a signing backend.
    #[error("Other error: {0:#}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl SignError {
    /// Wrap an arbitrary backend error.
    pub fn other(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(error))
    }
}
