//! Command Dispatcher: `Command` -> satu call ke playback grid
//!
//! Tidak ada state antar datagram. Setiap datagram di-parse, di-dispatch
//! maksimal sekali, lalu dibuang. Error di sini tidak pernah keluar dari
//! `handle_datagram`: di-log lalu loop lanjut.

use tracing::{debug, info, warn};

use crate::error::PlaybackError;
use crate::playback::{GridCell, PlaybackGrid};
use crate::protocol::{parse_command, Command, PlayRequest, Verb};

/// Hasil pemrosesan satu datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatagramOutcome {
    /// Command valid dan grid call sukses (atau placeholder no-op).
    Dispatched(Verb),
    /// Verb tidak dikenal, tidak ada dispatch.
    Rejected,
    /// Grid call gagal. Datagram tetap dianggap delivered, tanpa retry.
    PlaybackFailed(Verb),
}

pub struct CommandDispatcher<G> {
    grid: G,
    target: GridCell,
}

impl<G: PlaybackGrid> CommandDispatcher<G> {
    /// Dispatcher yang selalu menargetkan cell (0, 0).
    pub fn new(grid: G) -> Self {
        Self::with_target(grid, GridCell::default())
    }

    /// Protocol tidak punya field untuk cell addressing: target fixed per proses.
    pub fn with_target(grid: G, target: GridCell) -> Self {
        Self { grid, target }
    }

    #[inline(always)]
    pub fn target(&self) -> GridCell {
        self.target
    }

    #[inline(always)]
    pub fn grid(&self) -> &G {
        &self.grid
    }

    /// Invoke tepat satu operasi grid untuk `command`, synchronous.
    pub fn dispatch(&self, command: &Command) -> Result<(), PlaybackError> {
        match command {
            Command::Play(request) => self.play(request),
            Command::Stop => {
                info!("stop command received");
                Ok(())
            }
            Command::Monitor => {
                info!("monitor command received");
                Ok(())
            }
            Command::Config => {
                info!("config command received");
                Ok(())
            }
        }
    }

    fn play(&self, request: &PlayRequest) -> Result<(), PlaybackError> {
        if request.was_truncated() {
            debug!(
                description = request.description.len(),
                uri = request.uri.len(),
                stream_type = request.stream_type.len(),
                "play fields truncated to builder capacity"
            );
        }
        self.grid.play_stream(
            self.target,
            &request.uri.to_str_lossy(),
            &request.description.to_str_lossy(),
            &request.stream_type.to_str_lossy(),
        )
    }

    /// Parse + dispatch satu datagram. Never fails: semua error di-log.
    pub fn handle_datagram(&self, datagram: &[u8]) -> DatagramOutcome {
        let command = match parse_command(datagram) {
            Ok(command) => command,
            Err(err) => {
                warn!(error = %err, "dropping datagram");
                return DatagramOutcome::Rejected;
            }
        };

        let verb = command.verb();
        match self.dispatch(&command) {
            Ok(()) => DatagramOutcome::Dispatched(verb),
            Err(err) => {
                warn!(%verb, error = %err, "playback dispatch failed");
                DatagramOutcome::PlaybackFailed(verb)
            }
        }
    }
}
