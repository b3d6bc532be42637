//! Listener statistics (lock-free, relaxed counters)

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::info;

use super::dispatcher::DatagramOutcome;

#[derive(Debug, Default)]
pub struct ListenerStats {
    datagrams_received: AtomicU64,
    bytes_received: AtomicU64,
    commands_dispatched: AtomicU64,
    unrecognized_verbs: AtomicU64,
    playback_errors: AtomicU64,
}

/// Copy plain dari counter pada satu titik waktu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub datagrams_received: u64,
    pub bytes_received: u64,
    pub commands_dispatched: u64,
    pub unrecognized_verbs: u64,
    pub playback_errors: u64,
}

impl ListenerStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn record_datagram(&self, len: usize) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(len as u64, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn record_outcome(&self, outcome: DatagramOutcome) {
        let counter = match outcome {
            DatagramOutcome::Dispatched(_) => &self.commands_dispatched,
            DatagramOutcome::Rejected => &self.unrecognized_verbs,
            DatagramOutcome::PlaybackFailed(_) => &self.playback_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            unrecognized_verbs: self.unrecognized_verbs.load(Ordering::Relaxed),
            playback_errors: self.playback_errors.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    pub fn log_summary(&self, uptime: Duration) {
        info!(
            uptime_secs = uptime.as_secs_f64(),
            datagrams = self.datagrams_received,
            bytes = self.bytes_received,
            dispatched = self.commands_dispatched,
            unrecognized = self.unrecognized_verbs,
            playback_errors = self.playback_errors,
            "listener stats"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Verb;

    #[test]
    fn test_counters() {
        let stats = ListenerStats::new();
        stats.record_datagram(10);
        stats.record_datagram(5);
        stats.record_outcome(DatagramOutcome::Dispatched(Verb::Play));
        stats.record_outcome(DatagramOutcome::Rejected);

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                datagrams_received: 2,
                bytes_received: 15,
                commands_dispatched: 1,
                unrecognized_verbs: 1,
                playback_errors: 0,
            }
        );
    }
}
