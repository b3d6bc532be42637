//! Playback Grid boundary
//!
//! Video decoding dan display grid ada di luar crate ini. Listener hanya
//! butuh dua operasi: `init_grid` dan `play_stream`.
//!
//! Handle di-pass eksplisit (tidak ada global grid), dan harus aman dipanggil
//! dari receive thread maupun main thread.

mod headless;

use std::sync::Arc;

use crate::error::PlaybackError;

pub use headless::{CellStream, HeadlessGrid};

/// Alamat (row, col) di playback grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
}

impl GridCell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// External playback-grid API.
pub trait PlaybackGrid: Send + Sync {
    fn init_grid(&self, rows: u32, cols: u32) -> Result<(), PlaybackError>;

    fn play_stream(
        &self,
        cell: GridCell,
        uri: &str,
        description: &str,
        stream_type: &str,
    ) -> Result<(), PlaybackError>;
}

impl<T: PlaybackGrid + ?Sized> PlaybackGrid for Arc<T> {
    #[inline]
    fn init_grid(&self, rows: u32, cols: u32) -> Result<(), PlaybackError> {
        (**self).init_grid(rows, cols)
    }

    #[inline]
    fn play_stream(
        &self,
        cell: GridCell,
        uri: &str,
        description: &str,
        stream_type: &str,
    ) -> Result<(), PlaybackError> {
        (**self).play_stream(cell, uri, description, stream_type)
    }
}
