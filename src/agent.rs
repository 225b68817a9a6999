//! Agent sessions on forwarded agent channels.
//!
//! An [`Agent`] binds one identity to a configuration. Every time the SSH
//! transport opens an agent forwarding channel, the host hands the channel
//! to [`Agent::spawn`] (or to [`blocking::spawn`](crate::blocking::spawn)
//! for blocking channels), which starts an independent session serving
//! requests on it until the channel closes.

use std::sync::Arc;

#[cfg(feature = "agent")]
use futures::{SinkExt, TryStreamExt};
#[cfg(feature = "agent")]
use log::{debug, error, info};
#[cfg(feature = "agent")]
use tokio::io::{AsyncRead, AsyncWrite};
#[cfg(feature = "agent")]
use tokio_util::codec::Framed;

use crate::codec::FrameCodec;
use crate::config::AgentConfig;
use crate::dispatch::Dispatcher;
#[cfg(feature = "agent")]
use crate::error::AgentError;
use crate::identity::SigningIdentity;

/// Session factory for a single identity.
///
/// Cloning is cheap: clones share the identity.
#[derive(Debug, Clone)]
pub struct Agent {
    dispatcher: Dispatcher,
    config: AgentConfig,
}

impl Agent {
    /// Serve `identity` with the given settings.
    pub fn new(identity: Arc<dyn SigningIdentity>, config: AgentConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(identity, config.comment.clone()),
            config,
        }
    }

    /// Session settings.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Request dispatcher shared by all sessions.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Framing codec sized for the configured receive buffer.
    pub fn codec(&self) -> FrameCodec {
        FrameCodec::new(self.config.buffer_capacity)
    }
}

#[cfg(feature = "agent")]
impl Agent {
    /// Serve requests arriving on `stream` until it closes.
    ///
    /// Every frame already received is answered before more data is read.
    /// Returns `Ok(())` at end of stream, or the protocol or I/O error that
    /// ended the session.
    pub async fn serve<S>(&self, stream: S) -> Result<(), AgentError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        tokio::time::sleep(self.config.settle_delay).await;

        let codec = self.codec();
        let mut adapter = Framed::with_capacity(stream, codec, codec.capacity());

        while let Some(frame) = adapter.try_next().await? {
            debug!("Received request type {}", frame.message_type());
            if let Some(response) = self.dispatcher.dispatch(&frame) {
                adapter.send(response).await?;
                tokio::time::sleep(self.config.response_delay).await;
            }
        }

        Ok(())
    }

    /// Start a session on a newly opened agent channel.
    ///
    /// Must be called from within a Tokio runtime. The session's outcome
    /// is logged; the channel closing is the only signal to the peer.
    pub fn spawn<S>(&self, stream: S) -> tokio::task::JoinHandle<()>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let agent = self.clone();
        tokio::spawn(async move {
            info!("Agent session started");
            match agent.serve(stream).await {
                Ok(()) => info!("Agent channel closed"),
                Err(e) => error!("Agent session terminated; error = {:?}", e),
            }
        })
    }
}
