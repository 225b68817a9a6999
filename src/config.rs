//! Agent session settings.

use std::time::Duration;

use crate::codec::DEFAULT_CAPACITY;

/// Comment sent along with the identity unless configured otherwise.
pub const DEFAULT_COMMENT: &str = "ssh-agent-forward";

/// Settings shared by every session of an [`Agent`](crate::agent::Agent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Comment listed with the identity.
    pub comment: String,

    /// Receive buffer capacity in bytes. Frames that do not fit end the session.
    pub buffer_capacity: usize,

    /// Pause after each response is written and flushed, giving the
    /// peer time to consume it before the next read.
    pub response_delay: Duration,

    /// Pause between reads while the channel has no data.
    pub poll_interval: Duration,

    /// Pause before the first read of a newly opened channel.
    pub settle_delay: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            comment: DEFAULT_COMMENT.into(),
            buffer_capacity: DEFAULT_CAPACITY,
            response_delay: Duration::from_millis(10),
            poll_interval: Duration::from_millis(10),
            settle_delay: Duration::from_millis(10),
        }
    }
}

impl AgentConfig {
    /// Configuration without any pacing delays.
    pub fn unpaced() -> Self {
        Self {
            response_delay: Duration::ZERO,
            poll_interval: Duration::ZERO,
            settle_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Replace the identity comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Replace the receive buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }
}
