//! Error taxonomy
//!
//! - Startup: `ListenerError::Bind` / `Resolve` (fatal), `ConfigError`
//! - Receive loop: `ListenerError::Receive` (menghentikan loop saja)
//! - Per-datagram: `ParseError`, `PlaybackError` (di-log, datagram di-drop, loop lanjut)
//!
//! Truncation bukan error: builder memotong input diam-diam.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Datagram ditolak sebelum dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid command: {verb:?}")]
    UnrecognizedVerb { verb: String },
}

/// Kegagalan dari playback-grid subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("playback grid is not initialised")]
    NotInitialized,
    #[error("invalid grid size {rows}x{cols}")]
    InvalidGridSize { rows: u32, cols: u32 },
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    CellOutOfRange {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },
    #[error("playback backend failed: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("cannot resolve {host}:{service}")]
    Resolve {
        host: String,
        service: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot bind datagram socket on {host}:{service}")]
    Bind {
        host: String,
        service: String,
        #[source]
        source: io::Error,
    },
    #[error("event loop failed: {0}")]
    Poll(io::Error),
    #[error("receive failed: {0}")]
    Receive(io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("environment variable {var} has invalid value {value:?}")]
    Env { var: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Command tidak bisa di-encode ke satu datagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("field `{field}` contains the 0x1F delimiter")]
    DelimiterInField { field: &'static str },
    #[error("encoded command is {len} bytes, datagram limit is {max}")]
    TooLarge { len: usize, max: usize },
}
