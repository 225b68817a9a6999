//! Agent protocol message numbers.

use super::error::{ProtoError, ProtoResult};

/// Message numbers used for requests from the client to the agent.
///
/// https://datatracker.ietf.org/doc/html/draft-miller-ssh-agent#name-message-numbers
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
#[repr(u8)]
pub enum RequestCode {
    RequestIdentities = 11,
    SignRequest = 13,
}

impl RequestCode {
    /// Convert an unsigned byte into a [`RequestCode`] (if served by this agent)
    pub fn from_u8(byte: u8) -> ProtoResult<Self> {
        let out = match byte {
            11 => Self::RequestIdentities,
            13 => Self::SignRequest,
            command => Err(ProtoError::UnsupportedCommand { command })?,
        };

        Ok(out)
    }

    /// Serialize the request code as a byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Message numbers used for responses from the agent to the client.
///
/// https://datatracker.ietf.org/doc/html/draft-miller-ssh-agent#name-message-numbers
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
#[repr(u8)]
pub enum ResponseCode {
    Failure = 5,
    IdentitiesAnswer = 12,
    SignResponse = 14,
}

impl ResponseCode {
    /// Convert an unsigned byte into a [`ResponseCode`] (if valid)
    pub fn from_u8(byte: u8) -> ProtoResult<Self> {
        let out = match byte {
            5 => Self::Failure,
            12 => Self::IdentitiesAnswer,
            14 => Self::SignResponse,
            command => Err(ProtoError::UnsupportedCommand { command })?,
        };
        Ok(out)
    }

    /// Serialize the response code as a byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}
