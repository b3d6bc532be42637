//! Headless grid: stand-in in-process untuk video grid.
//!
//! Menyimpan stream aktif per cell dan log setiap call. Dipakai binary
//! ketika tidak ada display backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::info;

use super::{GridCell, PlaybackGrid};
use crate::error::PlaybackError;

/// Stream yang sedang diputar di satu cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStream {
    pub uri: String,
    pub description: String,
    pub stream_type: String,
}

#[derive(Debug)]
struct GridState {
    rows: u32,
    cols: u32,
    cells: Vec<Option<CellStream>>,
}

impl GridState {
    fn index(&self, cell: GridCell) -> Result<usize, PlaybackError> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return Err(PlaybackError::CellOutOfRange {
                row: cell.row,
                col: cell.col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(cell.row as usize * self.cols as usize + cell.col as usize)
    }
}

#[derive(Debug, Default)]
pub struct HeadlessGrid {
    state: Mutex<Option<GridState>>,
}

impl HeadlessGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<GridState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `(rows, cols)` setelah `init_grid`.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.lock().as_ref().map(|s| (s.rows, s.cols))
    }

    /// Stream aktif di `cell`, jika ada.
    pub fn cell(&self, cell: GridCell) -> Option<CellStream> {
        let guard = self.lock();
        let state = guard.as_ref()?;
        let index = state.index(cell).ok()?;
        state.cells[index].clone()
    }
}

impl PlaybackGrid for HeadlessGrid {
    fn init_grid(&self, rows: u32, cols: u32) -> Result<(), PlaybackError> {
        if rows == 0 || cols == 0 {
            return Err(PlaybackError::InvalidGridSize { rows, cols });
        }
        let cells = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or(PlaybackError::InvalidGridSize { rows, cols })?;

        *self.lock() = Some(GridState {
            rows,
            cols,
            cells: vec![None; cells],
        });
        info!(rows, cols, "grid initialised");
        Ok(())
    }

    fn play_stream(
        &self,
        cell: GridCell,
        uri: &str,
        description: &str,
        stream_type: &str,
    ) -> Result<(), PlaybackError> {
        let mut guard = self.lock();
        let state = guard.as_mut().ok_or(PlaybackError::NotInitialized)?;
        let index = state.index(cell)?;

        state.cells[index] = Some(CellStream {
            uri: uri.to_owned(),
            description: description.to_owned(),
            stream_type: stream_type.to_owned(),
        });
        info!(%cell, uri, description, stream_type, "play stream");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_before_init_fails() {
        let grid = HeadlessGrid::new();
        assert_eq!(
            grid.play_stream(GridCell::new(0, 0), "u", "d", "t"),
            Err(PlaybackError::NotInitialized)
        );
        assert_eq!(grid.dimensions(), None);
    }

    #[test]
    fn test_init_rejects_empty_grid() {
        let grid = HeadlessGrid::new();
        assert_eq!(
            grid.init_grid(0, 2),
            Err(PlaybackError::InvalidGridSize { rows: 0, cols: 2 })
        );
    }

    #[test]
    fn test_play_records_cell() {
        let grid = HeadlessGrid::new();
        grid.init_grid(2, 2).unwrap();
        grid.play_stream(GridCell::new(1, 0), "rtsp://x/y", "Cam A", "H264")
            .unwrap();

        assert_eq!(grid.dimensions(), Some((2, 2)));
        assert_eq!(grid.cell(GridCell::new(0, 0)), None);
        assert_eq!(
            grid.cell(GridCell::new(1, 0)),
            Some(CellStream {
                uri: "rtsp://x/y".into(),
                description: "Cam A".into(),
                stream_type: "H264".into(),
            })
        );
    }

    #[test]
    fn test_play_out_of_range() {
        let grid = HeadlessGrid::new();
        grid.init_grid(2, 2).unwrap();
        assert_eq!(
            grid.play_stream(GridCell::new(0, 2), "u", "d", "t"),
            Err(PlaybackError::CellOutOfRange {
                row: 0,
                col: 2,
                rows: 2,
                cols: 2
            })
        );
    }

    #[test]
    fn test_reinit_clears_cells() {
        let grid = HeadlessGrid::new();
        grid.init_grid(1, 1).unwrap();
        grid.play_stream(GridCell::default(), "u", "d", "t").unwrap();
        grid.init_grid(1, 1).unwrap();
        assert_eq!(grid.cell(GridCell::default()), None);
    }
}
