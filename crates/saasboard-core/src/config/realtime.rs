//! Notification stream configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Server-Sent-Events notification stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Interval between keep-alive comment frames, in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_seconds: u64,
    /// Frames buffered per open stream before writes start failing.
    #[serde(default = "default_sink_buffer")]
    pub sink_buffer_size: usize,
}

impl RealtimeConfig {
    /// Keep-alive interval as a [`Duration`].
    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_seconds.max(1))
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            keep_alive_seconds: default_keep_alive(),
            sink_buffer_size: default_sink_buffer(),
        }
    }
}

fn default_keep_alive() -> u64 {
    30
}

fn default_sink_buffer() -> usize {
    64
}
