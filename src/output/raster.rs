//! Lossless PNG rendering of a pixel grid.

use crate::capture::PixelGrid;
use crate::error::{AppError, AppResult};
use image::{ColorType, ImageFormat};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

fn color_type(channels: usize) -> Option<ColorType> {
    match channels {
        1 => Some(ColorType::L8),
        2 => Some(ColorType::La8),
        3 => Some(ColorType::Rgb8),
        4 => Some(ColorType::Rgba8),
        _ => None,
    }
}

pub fn write_png(grid: &PixelGrid, path: &Path) -> AppResult<()> {
    let dims = grid.dims();
    let color = color_type(dims.channels).ok_or_else(|| {
        AppError::InvalidDimensions(format!("{} channels cannot be encoded", dims.channels))
    })?;
    let width = u32::try_from(dims.width)
        .map_err(|_| AppError::InvalidDimensions(format!("width {} too large", dims.width)))?;
    let height = u32::try_from(dims.height)
        .map_err(|_| AppError::InvalidDimensions(format!("height {} too large", dims.height)))?;

    image::save_buffer_with_format(path, grid.as_bytes(), width, height, color, ImageFormat::Png)
        .map_err(|e| AppError::output(path, e))
}

/// Hand the image to the desktop viewer. Failures are logged, never returned.
pub fn show_image(path: &Path) {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    match command.spawn() {
        Ok(child) => debug!(pid = child.id(), "viewer launched for {}", path.display()),
        Err(e) => warn!("Could not open {}: {}", path.display(), e),
    }
}
