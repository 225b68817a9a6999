//! Blocking agent sessions, one thread per forwarded channel.
//!
//! Blocking sessions are always enabled since they need nothing beyond
//! the Rust standard library. Channels are plain [`Read`] + [`Write`]
//! streams and may be non-blocking: a read or write reporting
//! [`io::ErrorKind::WouldBlock`] is retried after the configured poll
//! interval, and a read of zero bytes ends the session.
//!
//! # Examples
//!
//! ```no_run
//! # #[cfg(unix)]
//! # fn main() -> testresult::TestResult {
//! use std::os::unix::net::UnixStream;
//! use std::sync::Arc;
//!
//! use ssh_agent_forward::{agent::Agent, blocking, config::AgentConfig, identity::KeypairIdentity};
//!
//! let identity = KeypairIdentity::from_openssh(std::fs::read("id_rsa")?)?;
//! let agent = Agent::new(Arc::new(identity), AgentConfig::default());
//!
//! let (channel, _peer) = UnixStream::pair()?;
//! blocking::spawn(&agent, channel)?.join().ok();
//! # Ok(()) }
//! # #[cfg(windows)] fn main() { }
//! ```

use std::io::{self, Read, Write};
use std::thread::{self, JoinHandle};

use bytes::BytesMut;
use log::{debug, error, info, trace};

use crate::{
    agent::Agent,
    codec::{Frame, FrameCodec},
    error::AgentError,
    proto::{ProtoResult, Response},
};

/// Fixed-capacity reassembly buffer turning arbitrary reads into frames.
#[derive(Debug)]
pub struct Framer {
    codec: FrameCodec,
    buffer: BytesMut,
}

impl Framer {
    /// Create a framer buffering at most `codec.capacity()` bytes.
    pub fn new(codec: FrameCodec) -> Self {
        Self {
            buffer: BytesMut::with_capacity(codec.capacity()),
            codec,
        }
    }

    /// Number of buffered bytes not yet taken as frames.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Read once from `reader` into the free part of the buffer.
    ///
    /// Returns the reader's result unchanged; `Ok(0)` means end of stream.
    pub fn fill(&mut self, reader: &mut impl Read) -> io::Result<usize> {
        let start = self.buffer.len();
        if start == self.codec.capacity() {
            return Err(io::Error::other("agent receive buffer is full"));
        }

        self.buffer.resize(self.codec.capacity(), 0);
        let result = reader.read(&mut self.buffer[start..]);
        let read = *result.as_ref().unwrap_or(&0);
        self.buffer.truncate(start + read);

        result
    }

    /// Take the next complete frame, compacting the buffer.
    ///
    /// Call until it returns `Ok(None)` to drain every buffered frame.
    pub fn next_frame(&mut self) -> ProtoResult<Option<Frame>> {
        self.codec.decode_frame(&mut self.buffer)
    }
}

/// Agent session driving one blocking channel.
#[derive(Debug)]
pub struct Session<C> {
    agent: Agent,
    channel: C,
    framer: Framer,
}

impl<C: Read + Write> Session<C> {
    /// Bind `channel` to `agent`.
    pub fn new(agent: Agent, channel: C) -> Self {
        let framer = Framer::new(agent.codec());
        Self {
            agent,
            channel,
            framer,
        }
    }

    /// Extracts the channel by consuming this session.
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Serve requests until the channel reaches end of stream.
    ///
    /// Returns `Ok(())` at end of stream. A protocol violation or a
    /// transport error ends the session with that error.
    pub fn run(&mut self) -> Result<(), AgentError> {
        thread::sleep(self.agent.config().settle_delay);

        loop {
            match self.framer.fill(&mut self.channel) {
                Ok(0) => {
                    debug!(
                        "End of stream with {} bytes buffered",
                        self.framer.buffered()
                    );
                    return Ok(());
                }
                Ok(read) => {
                    trace!("Read {read} bytes");
                    self.dispatch_buffered()?;
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => self.wait(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn dispatch_buffered(&mut self) -> Result<(), AgentError> {
        while let Some(frame) = self.framer.next_frame()? {
            debug!("Received request type {}", frame.message_type());
            if let Some(response) = self.agent.dispatcher().dispatch(&frame) {
                self.send(&response)?;
            }
        }
        Ok(())
    }

    fn send(&mut self, response: &Response) -> Result<(), AgentError> {
        let mut bytes = BytesMut::new();
        self.framer.codec.encode_message(response, &mut bytes)?;

        self.write_all(&bytes)?;
        self.flush()?;

        thread::sleep(self.agent.config().response_delay);
        Ok(())
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            match self.channel.write(bytes) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(written) => bytes = &bytes[written..],
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => self.wait(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        loop {
            match self.channel.flush() {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => self.wait(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn wait(&self) {
        thread::sleep(self.agent.config().poll_interval);
    }
}

/// Start a session on a newly opened agent channel in its own thread.
///
/// The session's outcome is logged; the channel closing is the only
/// signal to the peer.
pub fn spawn<C>(agent: &Agent, channel: C) -> io::Result<JoinHandle<()>>
where
    C: Read + Write + Send + 'static,
{
    let mut session = Session::new(agent.clone(), channel);
    thread::Builder::new()
        .name("ssh-agent-forward".into())
        .spawn(move || {
            info!("Agent session started");
            match session.run() {
                Ok(()) => info!("Agent channel closed"),
                Err(e) => error!("Agent session terminated; error = {:?}", e),
            }
        })
}
