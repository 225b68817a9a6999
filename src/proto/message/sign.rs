//! Signature request with data to be signed with a key in an agent,
//! and the signature sent back.

use ssh_encoding::{self, CheckedSum, Decode, Encode, Reader, Writer};

use crate::proto::{wire, Error, Result};

/// Signature request with data to be signed with a key in an agent.
///
/// This structure is sent in a [`Request::SignRequest`](super::Request::SignRequest) (`SSH_AGENTC_SIGN_REQUEST`) message.
///
/// Described in [draft-miller-ssh-agent-14 § 3.6](https://www.ietf.org/archive/id/draft-miller-ssh-agent-14.html#section-3.6)
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignRequest {
    /// Public key blob of the key to sign with.
    ///
    /// A single-identity agent always signs with its own key, so
    /// this is carried for logging only.
    pub pubkey: Vec<u8>,

    /// Binary data to be signed
    pub data: Vec<u8>,

    /// Signature flags. Read when present, `0` otherwise.
    pub flags: u32,
}

impl Decode for SignRequest {
    type Error = Error;

    fn decode(reader: &mut impl Reader) -> Result<Self> {
        let pubkey = wire::read_string(reader)?;
        let data = wire::read_string(reader)?;
        let flags = if reader.remaining_len() >= wire::LENGTH_SIZE {
            wire::read_u32(reader)?
        } else {
            0
        };

        Ok(Self {
            pubkey,
            data,
            flags,
        })
    }
}

impl Encode for SignRequest {
    fn encoded_len(&self) -> ssh_encoding::Result<usize> {
        [
            wire::string_len(self.pubkey.len())?,
            wire::string_len(self.data.len())?,
            wire::LENGTH_SIZE,
        ]
        .checked_sum()
    }

    fn encode(&self, writer: &mut impl Writer) -> ssh_encoding::Result<()> {
        wire::write_string(writer, &self.pubkey)?;
        wire::write_string(writer, &self.data)?;
        wire::write_u32(writer, self.flags)?;

        Ok(())
    }
}

/// Type-tagged signature blob.
///
/// Sent length-prefixed in a [`Response::SignResponse`](super::Response::SignResponse) (`SSH_AGENT_SIGN_RESPONSE`) message.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Signature {
    /// Key type name, e.g. `ssh-rsa`.
    pub algorithm: String,

    /// Raw signature bytes as produced by the key.
    pub blob: Vec<u8>,
}

impl Decode for Signature {
    type Error = Error;

    fn decode(reader: &mut impl Reader) -> Result<Self> {
        let algorithm = String::from_utf8(wire::read_string(reader)?)?;
        let blob = wire::read_string(reader)?;

        Ok(Self { algorithm, blob })
    }
}

impl Encode for Signature {
    fn encoded_len(&self) -> ssh_encoding::Result<usize> {
        [
            wire::string_len(self.algorithm.len())?,
            wire::string_len(self.blob.len())?,
        ]
        .checked_sum()
    }

    fn encode(&self, writer: &mut impl Writer) -> ssh_encoding::Result<()> {
        wire::write_string(writer, self.algorithm.as_bytes())?;
        wire::write_string(writer, &self.blob)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use testresult::TestResult;

    use super::*;
    use crate::proto::ProtoError;

    #[test]
    fn decode_without_flags() -> TestResult {
        let bytes = hex!("00000003 6b6579 00000004 64617461");
        let request = SignRequest::decode(&mut &bytes[..])?;
        assert_eq!(request.pubkey, b"key");
        assert_eq!(request.data, b"data");
        assert_eq!(request.flags, 0);
        Ok(())
    }

    #[test]
    fn decode_ignores_trailing_bytes() -> TestResult {
        let bytes = hex!("00000000 00000001 78 00000002 aabb");
        let request = SignRequest::decode(&mut &bytes[..])?;
        assert_eq!(request.data, b"x");
        assert_eq!(request.flags, 2);
        Ok(())
    }

    #[test]
    fn truncated_data() {
        let bytes = hex!("00000003 6b6579 00000010 6461");
        assert!(matches!(
            SignRequest::decode(&mut &bytes[..]),
            Err(ProtoError::Truncated { .. })
        ));
    }

    #[test]
    fn encode_request() -> TestResult {
        let request = SignRequest {
            pubkey: b"key".to_vec(),
            data: b"data".to_vec(),
            flags: 4,
        };
        let mut out = vec![];
        request.encode(&mut out)?;
        assert_eq!(out, hex!("00000003 6b6579 00000004 64617461 00000004"));
        assert_eq!(out.len(), request.encoded_len()?);
        Ok(())
    }
}
