//! Core module: parse -> dispatch pipeline
//!
//! Prinsip desain:
//! - No shared mutable state antar datagram: command dibuat, di-dispatch, dibuang
//! - Never fails: error per-datagram di-log, tidak pernah propagate
//! - Lock-free stats: hanya atomic counter

mod dispatcher;
mod stats;

pub use dispatcher::{CommandDispatcher, DatagramOutcome};
pub use stats::{ListenerStats, StatsSnapshot};
