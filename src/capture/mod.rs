//! Frame acquisition: the pixel grid, the decoder and its cancellation token.

mod cancel;
mod decoder;
mod grid;
mod progress;

pub use cancel::CancellationToken;
pub use decoder::{Connection, StreamDecoder};
pub use grid::{CaptureResult, Completion, Dimensions, PixelGrid};
pub use progress::{LogProgress, NoProgress, Progress};
