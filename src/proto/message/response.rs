//! SSH agent protocol response messages.
use ssh_encoding::{CheckedSum, Decode, Encode, Reader, Writer};

use super::{Identity, Signature};
use crate::proto::{wire, Error, ResponseCode, Result};

/// SSH agent protocol response messages.
///
/// These message types are sent to a client *from* an agent (in response to a [`Request`](super::Request) message).
///
/// Described in [draft-miller-ssh-agent-14 § 3](https://www.ietf.org/archive/id/draft-miller-ssh-agent-14.html#section-3).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Response {
    /// Indicates generic agent failure
    Failure,

    /// A list of identities, sent in response to
    /// a [`Request::RequestIdentities`](super::Request::RequestIdentities) message.
    IdentitiesAnswer(Vec<Identity>),

    /// A signature, sent in response to
    /// a [`Request::SignRequest`](super::Request::SignRequest) message.
    SignResponse(Signature),
}

impl Response {
    /// The protocol message identifier for a given [`Response`](super::Response) message type.
    ///
    /// Described in [draft-miller-ssh-agent-14 § 6.1](https://www.ietf.org/archive/id/draft-miller-ssh-agent-14.html#section-6.1).
    pub fn message_id(&self) -> u8 {
        let code = match self {
            Self::Failure => ResponseCode::Failure,
            Self::IdentitiesAnswer(_) => ResponseCode::IdentitiesAnswer,
            Self::SignResponse(_) => ResponseCode::SignResponse,
        };
        code.to_u8()
    }
}

impl Decode for Response {
    type Error = Error;

    fn decode(reader: &mut impl Reader) -> Result<Self> {
        let message_type = wire::read_byte(reader)?;

        match ResponseCode::from_u8(message_type)? {
            ResponseCode::Failure => Ok(Self::Failure),
            ResponseCode::IdentitiesAnswer => {
                Identity::decode_vec(reader).map(Self::IdentitiesAnswer)
            }
            ResponseCode::SignResponse => {
                let signature = wire::read_string(reader)?;
                Signature::decode(&mut &signature[..]).map(Self::SignResponse)
            }
        }
    }
}

impl Encode for Response {
    fn encoded_len(&self) -> ssh_encoding::Result<usize> {
        let message_id_len = 1;
        let payload_len = match self {
            Self::Failure => 0,
            Self::IdentitiesAnswer(ids) => {
                let mut lengths = Vec::with_capacity(1 + ids.len());
                // Prefixed length
                lengths.push(wire::LENGTH_SIZE);

                for id in ids {
                    lengths.push(id.encoded_len()?);
                }

                lengths.checked_sum()?
            }
            Self::SignResponse(signature) => wire::string_len(signature.encoded_len()?)?,
        };

        [message_id_len, payload_len].checked_sum()
    }

    fn encode(&self, writer: &mut impl Writer) -> ssh_encoding::Result<()> {
        wire::write_byte(writer, self.message_id())?;

        match self {
            Self::Failure => {}
            Self::IdentitiesAnswer(ids) => {
                let count =
                    u32::try_from(ids.len()).map_err(|_| ssh_encoding::Error::Overflow)?;
                wire::write_u32(writer, count)?;
                for id in ids {
                    id.encode(writer)?;
                }
            }
            Self::SignResponse(signature) => {
                let len = u32::try_from(signature.encoded_len()?)
                    .map_err(|_| ssh_encoding::Error::Overflow)?;
                wire::write_u32(writer, len)?;
                signature.encode(writer)?;
            }
        };

        Ok(())
    }
}
