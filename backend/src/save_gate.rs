//! Minimum-interval gate for saves.
//!
//! A save is let through only if the previous accepted save for the same key
//! is at least `min_interval` old. Rejected saves are not queued; the caller
//! is told and may retry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SaveGate {
    min_interval: Duration,
    last_accepted: HashMap<String, Instant>,
}

impl SaveGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: HashMap::new(),
        }
    }

    /// A zero interval lets everything through
    pub fn is_enabled(&self) -> bool {
        !self.min_interval.is_zero()
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Record and accept the attempt if the gate is open for `key` at `now`.
    pub fn try_pass(&mut self, key: &str, now: Instant) -> bool {
        if !self.is_enabled() {
            return true;
        }

        match self.last_accepted.get(key) {
            Some(last) if now.saturating_duration_since(*last) < self.min_interval => false,
            _ => {
                self.last_accepted.insert(key.to_string(), now);
                true
            }
        }
    }

    /// Drop what is known about `key`, reopening the gate for it
    pub fn forget(&mut self, key: &str) {
        self.last_accepted.remove(key);
    }

    /// Time until `key` may save again
    pub fn retry_after(&self, key: &str, now: Instant) -> Duration {
        self.last_accepted
            .get(key)
            .map(|last| self.min_interval.saturating_sub(now.saturating_duration_since(*last)))
            .unwrap_or_default()
    }
}
