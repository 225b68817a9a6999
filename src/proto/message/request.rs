//! SSH agent protocol request messages.

use ssh_encoding::{CheckedSum, Decode, Encode, Reader, Writer};

use super::SignRequest;
use crate::proto::{wire, Error, RequestCode, Result};

/// SSH agent protocol request messages served by a forwarding agent.
///
/// These message types are sent from a client *to* an agent. Any other
/// message type fails to decode with
/// [`ProtoError::UnsupportedCommand`](crate::proto::ProtoError::UnsupportedCommand).
///
/// Described in [draft-miller-ssh-agent-14 § 3](https://www.ietf.org/archive/id/draft-miller-ssh-agent-14.html#section-3).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Request {
    /// Request a list of all identities (public key & comment)
    /// from an agent
    RequestIdentities,

    /// Perform a private key signature operation using a key
    /// stored in the agent
    SignRequest(SignRequest),
}

impl Request {
    /// The protocol message identifier for a given [`Request`] message type.
    ///
    /// Described in [draft-miller-ssh-agent-14 § 6.1](https://www.ietf.org/archive/id/draft-miller-ssh-agent-14.html#section-6.1).
    pub fn message_id(&self) -> u8 {
        let code = match self {
            Self::RequestIdentities => RequestCode::RequestIdentities,
            Self::SignRequest(_) => RequestCode::SignRequest,
        };
        code.to_u8()
    }
}

impl Decode for Request {
    type Error = Error;

    fn decode(reader: &mut impl Reader) -> Result<Self> {
        let message_type = wire::read_byte(reader)?;

        match RequestCode::from_u8(message_type)? {
            RequestCode::RequestIdentities => Ok(Self::RequestIdentities),
            RequestCode::SignRequest => SignRequest::decode(reader).map(Self::SignRequest),
        }
    }
}

impl Encode for Request {
    fn encoded_len(&self) -> ssh_encoding::Result<usize> {
        let message_id_len = 1;
        let payload_len = match self {
            Self::RequestIdentities => 0,
            Self::SignRequest(request) => request.encoded_len()?,
        };

        [message_id_len, payload_len].checked_sum()
    }

    fn encode(&self, writer: &mut impl Writer) -> ssh_encoding::Result<()> {
        wire::write_byte(writer, self.message_id())?;

        match self {
            Self::RequestIdentities => {}
            Self::SignRequest(request) => request.encode(writer)?,
        };

        Ok(())
    }
}
