//! Data returned to the client when listing keys.

use ssh_encoding::{self, CheckedSum, Decode, Encode, Reader, Writer};

use crate::proto::{wire, Error, Result};

/// Data returned to the client when listing keys.
///
/// A list of these structures are sent in a [`Response::IdentitiesAnswer`](super::Response::IdentitiesAnswer) (`SSH_AGENT_IDENTITIES_ANSWER`) message body.
///
/// Described in [draft-miller-ssh-agent-14 § 3.5](https://www.ietf.org/archive/id/draft-miller-ssh-agent-14.html#section-3.5)
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Identity {
    /// Standard public-key encoding of the key, kept opaque.
    pub pubkey: Vec<u8>,

    /// A human-readable comment
    pub comment: String,
}

impl Identity {
    pub(crate) fn decode_vec(reader: &mut impl Reader) -> Result<Vec<Self>> {
        let len = wire::read_u32(reader)?;
        let mut identities = vec![];

        for _ in 0..len {
            identities.push(Self::decode(reader)?);
        }

        Ok(identities)
    }
}

impl Decode for Identity {
    type Error = Error;

    fn decode(reader: &mut impl Reader) -> Result<Self> {
        let pubkey = wire::read_string(reader)?;
        let comment = String::from_utf8(wire::read_string(reader)?)?;

        Ok(Self { pubkey, comment })
    }
}

impl Encode for Identity {
    fn encoded_len(&self) -> ssh_encoding::Result<usize> {
        [
            wire::string_len(self.pubkey.len())?,
            wire::string_len(self.comment.len())?,
        ]
        .checked_sum()
    }

    fn encode(&self, writer: &mut impl Writer) -> ssh_encoding::Result<()> {
        wire::write_string(writer, &self.pubkey)?;
        wire::write_string(writer, self.comment.as_bytes())?;

        Ok(())
    }
}
