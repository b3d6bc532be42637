//! Mongrid - video-wall command listener
//!
//! Arsitektur:
//! - Protocol: 0x1F-delimited text command, satu per UDP datagram
//! - Zero-Copy: field views ke receive buffer, bounded copy saat materialize
//! - Never fails per-datagram: bad datagram di-log, loop lanjut
//! - Playback grid: external API di-pass sebagai explicit handle
//!
//! Data flow:
//! `Listener` -> datagram -> `scan` -> `parse_command` -> `CommandDispatcher` -> `PlaybackGrid`

pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod playback;
pub mod protocol;

pub use config::{load_config, ListenerConfig, StartupStream};
pub use error::{ConfigError, EncodeError, ListenerError, ParseError, PlaybackError};
