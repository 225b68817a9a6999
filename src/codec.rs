//! SSH agent protocol framing.
//!
//! Every message on an agent channel is a big-endian `u32` length
//! followed by that many bytes: a message type byte and its payload.

use std::mem::size_of;

use byteorder::{BigEndian, ByteOrder};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use ssh_encoding::Encode;
#[cfg(feature = "codec")]
use tokio_util::codec::{Decoder, Encoder};

#[cfg(feature = "codec")]
use super::error::AgentError;
use super::proto::{ProtoError, ProtoResult};

/// Receive buffer capacity used unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Smallest usable capacity: a length field and a message type.
pub const MIN_CAPACITY: usize = size_of::<u32>() + 1;

/// One complete message taken off the wire: the type byte and payload,
/// without the length prefix.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame(Bytes);

impl Frame {
    /// Message type byte.
    pub fn message_type(&self) -> u8 {
        self.0[0]
    }

    /// Bytes following the message type.
    pub fn payload(&self) -> &[u8] {
        &self.0[1..]
    }

    /// The message type followed by the payload, as decoded by
    /// [`Request`](crate::proto::Request).
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// SSH agent framing codec with a bounded frame size.
///
/// Decoding never consumes a partial frame. A frame that could not fit
/// into a receive buffer of `capacity` bytes, length field included,
/// is rejected with [`ProtoError::FrameTooLarge`] as soon as its length
/// field is seen.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    capacity: usize,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl FrameCodec {
    /// Create a codec for a receive buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(MIN_CAPACITY),
        }
    }

    /// Receive buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take the first complete frame off `src`.
    ///
    /// Returns `Ok(None)` while the frame is incomplete, leaving `src`
    /// untouched. Call repeatedly until it does so to drain every frame
    /// already buffered.
    pub fn decode_frame(&self, src: &mut BytesMut) -> ProtoResult<Option<Frame>> {
        if src.len() < size_of::<u32>() {
            return Ok(None);
        }

        let length = BigEndian::read_u32(&src[..size_of::<u32>()]) as usize;
        if length == 0 {
            return Err(ProtoError::EmptyFrame);
        }
        if length > self.capacity - size_of::<u32>() {
            return Err(ProtoError::FrameTooLarge {
                length,
                capacity: self.capacity,
            });
        }

        if src.len() < size_of::<u32>() + length {
            return Ok(None);
        }

        src.advance(size_of::<u32>());
        Ok(Some(Frame(src.split_to(length).freeze())))
    }

    /// Append `message` to `dst` with its length prefix.
    pub fn encode_message(&self, message: &impl Encode, dst: &mut BytesMut) -> ProtoResult<()> {
        let mut bytes = Vec::new();

        let len = u32::try_from(message.encoded_len()?)
            .map_err(|_| ssh_encoding::Error::Overflow)?;
        len.encode(&mut bytes)?;
        message.encode(&mut bytes)?;

        dst.put(&*bytes);
        Ok(())
    }
}

#[cfg(feature = "codec")]
impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = AgentError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(self.decode_frame(src)?)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let frame = self.decode(src)?;
        if frame.is_none() && !src.is_empty() {
            log::debug!(
                "Discarding {} bytes of incomplete frame at end of stream",
                src.len()
            );
            src.clear();
        }
        Ok(frame)
    }
}

#[cfg(feature = "codec")]
impl<Message: Encode> Encoder<Message> for FrameCodec {
    type Error = AgentError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        Ok(self.encode_message(&item, dst)?)
    }
}
