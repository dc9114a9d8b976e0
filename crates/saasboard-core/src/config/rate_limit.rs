//! Login throttling configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed-window limits applied to the authentication endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Accepted login attempts per client identity per window.
    #[serde(default = "default_login_limit")]
    pub login_limit: u32,
    /// Window length in seconds.
    #[serde(default = "default_login_window")]
    pub login_window_seconds: u64,
    /// Interval between sweeps of expired windows, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl RateLimitConfig {
    /// Login window as a [`Duration`].
    pub fn login_window(&self) -> Duration {
        Duration::from_secs(self.login_window_seconds)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_limit: default_login_limit(),
            login_window_seconds: default_login_window(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_login_limit() -> u32 {
    10
}

fn default_login_window() -> u64 {
    15 * 60
}

fn default_sweep_interval() -> u64 {
    60
}
