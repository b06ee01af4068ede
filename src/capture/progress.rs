//! Row-level progress reporting. Reporters observe the decoder, never steer it.

use tracing::{debug, info};

pub trait Progress {
    /// Called after each fully decoded row.
    fn row_completed(&mut self, rows_done: usize, total_rows: usize);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn row_completed(&mut self, _rows_done: usize, _total_rows: usize) {}
}

impl<F: FnMut(usize, usize)> Progress for F {
    fn row_completed(&mut self, rows_done: usize, total_rows: usize) {
        self(rows_done, total_rows)
    }
}

/// Logs every row at `debug` and each 10% step at `info`.
#[derive(Debug, Default)]
pub struct LogProgress {
    last_decile: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for LogProgress {
    fn row_completed(&mut self, rows_done: usize, total_rows: usize) {
        debug!(rows_done, total_rows, "row decoded");
        if total_rows == 0 {
            return;
        }
        let decile = rows_done * 10 / total_rows;
        if decile > self.last_decile {
            self.last_decile = decile;
            info!("Received {rows_done}/{total_rows} rows ({}%)", decile * 10);
        }
    }
}
