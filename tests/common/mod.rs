#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use bytes::BytesMut;
use ssh_agent_forward::{
    agent::Agent,
    codec::FrameCodec,
    config::AgentConfig,
    error::SignError,
    identity::{KeyType, SigningIdentity},
    proto::{Request, Response},
};
use ssh_encoding::Decode;

pub const KEY_BLOB: &[u8] = b"test-key-blob";

/// Identity whose "signature" is the signed data reversed.
#[derive(Debug)]
pub struct TestIdentity {
    key_type: KeyType,
    fail: bool,
    signed: Mutex<Vec<Vec<u8>>>,
}

impl TestIdentity {
    pub fn new(key_type: KeyType) -> Arc<Self> {
        Arc::new(Self {
            key_type,
            fail: false,
            signed: Mutex::default(),
        })
    }

    pub fn failing(key_type: KeyType) -> Arc<Self> {
        Arc::new(Self {
            key_type,
            fail: true,
            signed: Mutex::default(),
        })
    }

    pub fn signed(&self) -> Vec<Vec<u8>> {
        self.signed.lock().expect("lock").clone()
    }
}

impl SigningIdentity for TestIdentity {
    fn key_type(&self) -> KeyType {
        self.key_type.clone()
    }

    fn public_key_blob(&self) -> &[u8] {
        KEY_BLOB
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
        self.signed.lock().expect("lock").push(data.to_vec());
        if self.fail {
            return Err(SignError::other(io::Error::other("token removed")));
        }
        Ok(data.iter().rev().copied().collect())
    }
}

pub fn agent(identity: Arc<TestIdentity>) -> Agent {
    Agent::new(identity, AgentConfig::unpaced().with_comment("test"))
}

/// Requests with their length prefixes, back to back.
pub fn encode(requests: &[Request]) -> Vec<u8> {
    let codec = FrameCodec::default();
    let mut out = BytesMut::new();
    for request in requests {
        codec
            .encode_message(request, &mut out)
            .expect("encodable request");
    }
    out.to_vec()
}

/// Split a received byte stream into responses.
pub fn responses(bytes: &[u8]) -> Vec<Response> {
    let codec = FrameCodec::default();
    let mut buffer = BytesMut::from(bytes);
    let mut out = vec![];
    while let Some(frame) = codec.decode_frame(&mut buffer).expect("valid frame") {
        out.push(Response::decode(&mut frame.as_bytes()).expect("valid response"));
    }
    assert!(buffer.is_empty(), "trailing bytes in output: {buffer:?}");
    out
}

/// What the channel returns for one read call.
#[derive(Debug)]
pub enum Step {
    Data(Vec<u8>),
    WouldBlock,
    Interrupted,
    Fail(io::ErrorKind),
}

/// Channel activity in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Read(usize),
    Write(Vec<u8>),
    Flush,
}

/// Channel replaying scripted reads and recording everything written.
///
/// Reading past the end of the script reports end of stream.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    steps: VecDeque<Step>,
    write_stalls: usize,
    events: Vec<Event>,
}

impl ScriptedChannel {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every chunk delivered by its own read.
    pub fn chunked(bytes: &[u8], chunk: usize) -> Self {
        Self::new(bytes.chunks(chunk).map(|c| Step::Data(c.to_vec())))
    }

    /// Refuse the first `count` writes with would-block.
    pub fn with_write_stalls(mut self, count: usize) -> Self {
        self.write_stalls = count;
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn written(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Write(bytes) => Some(&bytes[..]),
                _ => None,
            })
            .collect::<Vec<_>>()
            .concat()
    }
}

impl Read for ScriptedChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = match self.steps.pop_front() {
            None => 0,
            Some(Step::Data(mut data)) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                if len < data.len() {
                    self.steps.push_front(Step::Data(data.split_off(len)));
                }
                len
            }
            Some(Step::WouldBlock) => return Err(io::ErrorKind::WouldBlock.into()),
            Some(Step::Interrupted) => return Err(io::ErrorKind::Interrupted.into()),
            Some(Step::Fail(kind)) => return Err(kind.into()),
        };
        self.events.push(Event::Read(read));
        Ok(read)
    }
}

impl Write for ScriptedChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.write_stalls > 0 {
            self.write_stalls -= 1;
            return Err(io::ErrorKind::WouldBlock.into());
        }
        self.events.push(Event::Write(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.events.push(Event::Flush);
        Ok(())
    }
}
