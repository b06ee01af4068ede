//! Pixel storage for a captured frame.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Frame geometry: `height` rows of `width` cells, `channels` bytes per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl Dimensions {
    /// 256x256 RGB, the frame the capture firmware emits.
    pub const DEFAULT: Self = Self::new(256, 256, 3);

    pub const fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.height == 0 || self.width == 0 || self.channels == 0 {
            return Err(AppError::InvalidDimensions(format!(
                "{}x{}x{} has a zero extent",
                self.height, self.width, self.channels
            )));
        }
        if self.total_bytes().is_none() {
            return Err(AppError::InvalidDimensions(format!(
                "{}x{}x{} overflows",
                self.height, self.width, self.channels
            )));
        }
        Ok(())
    }

    /// Bytes in one row.
    pub fn row_bytes(&self) -> usize {
        self.width * self.channels
    }

    /// Bytes in the whole frame, `None` on overflow.
    pub fn total_bytes(&self) -> Option<usize> {
        self.height
            .checked_mul(self.width)
            .and_then(|n| n.checked_mul(self.channels))
    }

    /// Raster offset of `(row, col, channel)`.
    pub fn index(&self, row: usize, col: usize, channel: usize) -> usize {
        (row * self.width + col) * self.channels + channel
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An H x W x C grid of `u8` stored flat in raster order.
///
/// Every cell starts at zero. Serializes as nested `[[[u8; C]; W]; H]` arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    dims: Dimensions,
    data: Vec<u8>,
}

impl PixelGrid {
    pub fn new(dims: Dimensions) -> AppResult<Self> {
        dims.validate()?;
        let len = dims.total_bytes().unwrap_or_default();
        Ok(Self {
            dims,
            data: vec![0; len],
        })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<u8> {
        self.in_bounds(row, col, channel)
            .then(|| self.data[self.dims.index(row, col, channel)])
    }

    /// Write one channel value; returns `false` if the coordinate is out of range.
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> bool {
        if !self.in_bounds(row, col, channel) {
            return false;
        }
        let idx = self.dims.index(row, col, channel);
        self.data[idx] = value;
        true
    }

    /// The channel values of one cell.
    pub fn pixel(&self, row: usize, col: usize) -> Option<&[u8]> {
        if row >= self.dims.height || col >= self.dims.width {
            return None;
        }
        let start = self.dims.index(row, col, 0);
        Some(&self.data[start..start + self.dims.channels])
    }

    /// Flat raster-order bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn to_nested(&self) -> Vec<Vec<Vec<u8>>> {
        self.data
            .chunks(self.dims.row_bytes())
            .map(|row| row.chunks(self.dims.channels).map(<[u8]>::to_vec).collect())
            .collect()
    }

    /// Rebuild a grid from nested rows; every row and cell must have the same length.
    pub fn from_nested(rows: &[Vec<Vec<u8>>]) -> AppResult<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let channels = rows
            .first()
            .and_then(|row| row.first())
            .map(Vec::len)
            .unwrap_or(0);
        let mut grid = Self::new(Dimensions::new(height, width, channels))?;

        let mut offset = 0;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(AppError::InvalidDimensions(format!(
                    "row {r} has {} cells, expected {width}",
                    row.len()
                )));
            }
            for (c, cell) in row.iter().enumerate() {
                if cell.len() != channels {
                    return Err(AppError::InvalidDimensions(format!(
                        "cell ({r}, {c}) has {} channels, expected {channels}",
                        cell.len()
                    )));
                }
                grid.data[offset..offset + channels].copy_from_slice(cell);
                offset += channels;
            }
        }
        Ok(grid)
    }

    fn in_bounds(&self, row: usize, col: usize, channel: usize) -> bool {
        row < self.dims.height && col < self.dims.width && channel < self.dims.channels
    }
}

impl Serialize for PixelGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_nested().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PixelGrid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<Vec<u8>>>::deserialize(deserializer)?;
        Self::from_nested(&rows).map_err(serde::de::Error::custom)
    }
}

/// Whether the decoder consumed the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completion {
    Full,
    Partial,
}

/// Outcome of one acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub grid: PixelGrid,
    pub completion: Completion,
    /// Rows whose every byte was decoded.
    pub rows_completed: usize,
    /// Bytes consumed from the stream.
    pub bytes_read: usize,
}

impl CaptureResult {
    pub fn is_partial(&self) -> bool {
        self.completion == Completion::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_grid_is_zeroed() {
        let grid = PixelGrid::new(Dimensions::new(2, 3, 3)).unwrap();
        assert_eq!(grid.as_bytes().len(), 18);
        assert!(grid.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            PixelGrid::new(Dimensions::new(0, 4, 3)),
            Err(AppError::InvalidDimensions(_))
        ));
        assert!(Dimensions::new(usize::MAX, 2, 3).validate().is_err());
    }

    #[test]
    fn test_set_and_get_follow_raster_order() {
        let mut grid = PixelGrid::new(Dimensions::new(2, 2, 3)).unwrap();
        assert!(grid.set(1, 0, 2, 99));
        assert_eq!(grid.get(1, 0, 2), Some(99));
        assert_eq!(grid.as_bytes()[8], 99);
        assert!(!grid.set(2, 0, 0, 1));
        assert_eq!(grid.get(0, 2, 0), None);
    }

    #[test]
    fn test_nested_layout() {
        let mut grid = PixelGrid::new(Dimensions::new(2, 2, 3)).unwrap();
        grid.as_bytes_mut()
            .copy_from_slice(&[10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120]);

        assert_eq!(
            grid.to_nested(),
            vec![
                vec![vec![10, 20, 30], vec![40, 50, 60]],
                vec![vec![70, 80, 90], vec![100, 110, 120]],
            ]
        );
        assert_eq!(grid.pixel(1, 1), Some(&[100u8, 110, 120][..]));
    }

    #[test]
    fn test_from_nested_rejects_ragged_rows() {
        let rows = vec![vec![vec![1, 2, 3], vec![4, 5, 6]], vec![vec![7, 8, 9]]];
        assert!(matches!(
            PixelGrid::from_nested(&rows),
            Err(AppError::InvalidDimensions(_))
        ));

        let cells = vec![vec![vec![1, 2, 3], vec![4, 5]]];
        assert!(PixelGrid::from_nested(&cells).is_err());
    }

    #[test]
    fn test_serde_uses_nested_arrays() {
        let grid = PixelGrid::from_nested(&[vec![vec![1, 2, 3]]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[[1,2,3]]]");

        let back: PixelGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert!(serde_json::from_str::<PixelGrid>("[[[1,2,300]]]").is_err());
    }
}
