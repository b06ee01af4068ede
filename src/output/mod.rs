//! Persistence of a captured frame as a JSON dump and a PNG.

mod dump;
mod raster;

pub use dump::{load_dump, write_dump};
pub use raster::{show_image, write_png};

use crate::capture::CaptureResult;
use crate::error::{AppError, AppResult};
use std::path::Path;
use tracing::info;

/// Writes both artifacts for a capture, zero cells of a partial frame included.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriter {
    show: bool,
}

impl OutputWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the PNG in the platform viewer once written.
    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Write the dump to `json_path`, then the image to `image_path`.
    ///
    /// Missing parent directories are created. A failure on either target is
    /// returned; nothing is rolled back.
    pub fn persist(
        &self,
        result: &CaptureResult,
        json_path: &Path,
        image_path: &Path,
    ) -> AppResult<()> {
        ensure_parent(json_path)?;
        write_dump(&result.grid, json_path)?;
        info!("Wrote pixel dump to {}", json_path.display());

        ensure_parent(image_path)?;
        write_png(&result.grid, image_path)?;
        info!("Wrote image to {}", image_path.display());

        if self.show {
            show_image(image_path);
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| AppError::output(path, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Completion, Dimensions, PixelGrid};

    fn partial_result() -> CaptureResult {
        let mut grid = PixelGrid::new(Dimensions::new(2, 2, 3)).unwrap();
        for (ch, value) in [10, 20, 30].into_iter().enumerate() {
            grid.set(0, 0, ch, value);
        }
        CaptureResult {
            grid,
            completion: Completion::Partial,
            rows_completed: 0,
            bytes_read: 3,
        }
    }

    #[test]
    fn test_persist_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("nested/out.txt");
        let image_path = dir.path().join("nested/img/out.png");
        let result = partial_result();

        OutputWriter::new()
            .persist(&result, &json_path, &image_path)
            .unwrap();

        assert_eq!(load_dump(&json_path).unwrap(), result.grid);
        assert!(image_path.exists());
    }

    #[test]
    fn test_persist_unwritable_target() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let json_path = blocker.join("out.txt");

        let err = OutputWriter::new()
            .persist(&partial_result(), &json_path, &dir.path().join("out.png"))
            .unwrap_err();

        assert!(matches!(err, AppError::Output { .. }));
        assert_eq!(err.exit_code(), 6);
    }
}
