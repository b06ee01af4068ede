//! Nested-array JSON dump of a pixel grid. This is the ground-truth artifact.

use crate::capture::PixelGrid;
use crate::error::{AppError, AppResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub fn write_dump(grid: &PixelGrid, path: &Path) -> AppResult<()> {
    let file = File::create(path).map_err(|e| AppError::output(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, grid).map_err(|e| AppError::output(path, e))?;
    writer.flush().map_err(|e| AppError::output(path, e))
}

/// Parse a dump written by [`write_dump`] back into a grid.
pub fn load_dump(path: &Path) -> AppResult<PixelGrid> {
    let file = File::open(path).map_err(|e| AppError::output(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| AppError::output(path, e))
}
