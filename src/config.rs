//! Listener configuration
//!
//! Layer (urutan override): defaults -> TOML file -> environment -> CLI flags (di binary).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::playback::GridCell;

pub const ENV_BIND_HOST: &str = "MONGRID_BIND_HOST";
pub const ENV_SERVICE: &str = "MONGRID_SERVICE";
pub const ENV_RECV_BUFFER: &str = "MONGRID_RECV_BUFFER";
pub const ENV_LOG: &str = "MONGRID_LOG";

/// Stream yang diputar sekali saat startup, sebelum command pertama masuk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartupStream {
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub col: u32,
    pub uri: String,
    pub description: String,
    #[serde(default = "default_stream_type")]
    pub stream_type: String,
}

impl StartupStream {
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.row, self.col)
    }
}

fn default_stream_type() -> String {
    "H264".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenerConfig {
    /// Host untuk bind; default semua local address.
    pub bind_host: String,
    /// Well-known service (decimal port).
    pub service: String,
    /// SO_RCVBUF; `None` = default OS.
    pub recv_buffer_bytes: Option<usize>,
    pub grid_rows: u32,
    pub grid_cols: u32,
    /// Cell yang jadi target semua `play` command.
    pub target_row: u32,
    pub target_col: u32,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    pub startup_streams: Vec<StartupStream>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".into(),
            service: "7001".into(),
            recv_buffer_bytes: None,
            grid_rows: 2,
            grid_cols: 2,
            target_row: 0,
            target_col: 0,
            log_filter: "info".into(),
            startup_streams: Vec::new(),
        }
    }
}

impl ListenerConfig {
    pub fn target_cell(&self) -> GridCell {
        GridCell::new(self.target_row, self.target_col)
    }

    /// Parse TOML text. Field yang tidak ada memakai default.
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply override dari environment, lewat `lookup` supaya bisa di-test tanpa env global.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_BIND_HOST) {
            self.bind_host = v;
        }
        if let Some(v) = lookup(ENV_SERVICE) {
            self.service = v;
        }
        if let Some(v) = lookup(ENV_RECV_BUFFER) {
            let bytes = v.trim().parse::<usize>().map_err(|_| ConfigError::Env {
                var: ENV_RECV_BUFFER,
                value: v.clone(),
            })?;
            self.recv_buffer_bytes = Some(bytes);
        }
        if let Some(v) = lookup(ENV_LOG) {
            self.log_filter = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one cell, got {}x{}",
                self.grid_rows, self.grid_cols
            )));
        }
        let in_grid = |cell: GridCell| cell.row < self.grid_rows && cell.col < self.grid_cols;
        if !in_grid(self.target_cell()) {
            return Err(ConfigError::Invalid(format!(
                "target cell {} is outside the {}x{} grid",
                self.target_cell(),
                self.grid_rows,
                self.grid_cols
            )));
        }
        if let Some(stream) = self.startup_streams.iter().find(|s| !in_grid(s.cell())) {
            return Err(ConfigError::Invalid(format!(
                "startup stream {:?} targets cell {} outside the grid",
                stream.description,
                stream.cell()
            )));
        }
        if self.service.trim().parse::<u16>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "service must be a decimal port, got {:?}",
                self.service
            )));
        }
        Ok(())
    }
}

/// Defaults, lalu optional file, lalu process environment.
///
/// Belum di-validate: caller apply CLI override dulu, lalu `validate()`.
pub fn load_config(path: Option<&Path>) -> Result<ListenerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            ListenerConfig::from_toml_str(&raw, path)?
        }
        None => ListenerConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}
