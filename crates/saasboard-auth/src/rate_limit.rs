//! Fixed-window rate limiter for the login endpoint.
//!
//! Each key owns a window of `window` length starting at its first attempt.
//! Attempts inside the window are counted; the first attempt after the
//! window ends starts a fresh one. A client can therefore get up to
//! `2 × limit` attempts through across a window boundary.
//!
//! Expired windows are removed by a background sweep task. The task is
//! spawned by the first insert into an empty table and exits once a sweep
//! leaves the table empty, so an idle process runs no timer at all.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Outcome of a single [`RateLimiter::check`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the attempt may proceed.
    pub allowed: bool,
    /// Attempts left in the current window.
    pub remaining: u32,
    /// When the current window ends.
    pub reset_at: Instant,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, rounded up and at least 1.
    ///
    /// This is the value sent in the `Retry-After` header.
    pub fn retry_after_secs(&self) -> u64 {
        let wait = self.reset_at.saturating_duration_since(Instant::now());
        let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
        secs.max(1)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug)]
struct Inner {
    windows: DashMap<String, Window>,
    /// Set while a sweep task is alive.
    sweeping: AtomicBool,
    sweep_interval: Duration,
}

/// Process-wide fixed-window counter keyed by client identity.
///
/// Cloning is cheap and shares the table.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

impl RateLimiter {
    /// Creates a limiter that sweeps expired windows every `sweep_interval`.
    pub fn new(sweep_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                windows: DashMap::new(),
                sweeping: AtomicBool::new(false),
                sweep_interval,
            }),
        }
    }

    /// Records an attempt for `key` and decides whether it is allowed.
    pub fn check(&self, key: &str, limit: u32, window: Duration) -> RateLimitDecision {
        let now = Instant::now();

        let decision = match self.inner.windows.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) if now < occupied.get().reset_at => {
                let current = occupied.get_mut();
                current.count = current.count.saturating_add(1);
                if current.count > limit {
                    RateLimitDecision {
                        allowed: false,
                        remaining: 0,
                        reset_at: current.reset_at,
                    }
                } else {
                    RateLimitDecision {
                        allowed: true,
                        remaining: limit - current.count,
                        reset_at: current.reset_at,
                    }
                }
            }
            Entry::Occupied(mut occupied) => {
                let fresh = Window {
                    count: 1,
                    reset_at: now + window,
                };
                occupied.insert(fresh);
                Self::first_attempt(limit, fresh)
            }
            Entry::Vacant(vacant) => {
                let fresh = Window {
                    count: 1,
                    reset_at: now + window,
                };
                vacant.insert(fresh);
                Self::first_attempt(limit, fresh)
            }
        };

        self.ensure_sweeper();

        if !decision.allowed {
            debug!(key = %key, limit, "Rate limit exceeded");
        }
        decision
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.inner.windows.len()
    }

    /// Whether a sweep task is currently alive.
    pub fn is_sweeping(&self) -> bool {
        self.inner.sweeping.load(Ordering::SeqCst)
    }

    fn first_attempt(limit: u32, window: Window) -> RateLimitDecision {
        RateLimitDecision {
            allowed: true,
            remaining: limit.saturating_sub(1),
            reset_at: window.reset_at,
        }
    }

    /// Spawns the sweep task unless one is already running.
    ///
    /// Called after every insert, so a non-empty table always has a sweeper.
    fn ensure_sweeper(&self) {
        if self
            .inner
            .sweeping
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        match Handle::try_current() {
            Ok(handle) => {
                let weak = Arc::downgrade(&self.inner);
                let interval = self.inner.sweep_interval;
                handle.spawn(sweep_loop(weak, interval));
                debug!("Rate limit sweep task started");
            }
            Err(_) => {
                self.inner.sweeping.store(false, Ordering::SeqCst);
                warn!("No tokio runtime; rate limit sweep task not started");
            }
        }
    }
}

async fn sweep_loop(inner: Weak<Inner>, interval: Duration) {
    loop {
        tokio::time::sleep(interval).await;

        let Some(inner) = inner.upgrade() else {
            return;
        };

        let now = Instant::now();
        inner.windows.retain(|_, w| now < w.reset_at);

        if !inner.windows.is_empty() {
            continue;
        }

        inner.sweeping.store(false, Ordering::SeqCst);

        // An insert may have landed between the drain and the flag store.
        // Whoever wins the flag back owns the sweep from here.
        if inner.windows.is_empty()
            || inner
                .sweeping
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
        {
            debug!("Rate limit table empty, sweep task stopped");
            return;
        }
    }
}
