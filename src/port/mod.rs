//! Port abstraction layer for serial communication.
//!
//! Provides the transport traits and the real and mock implementations,
//! enabling dependency injection of the byte source into discovery and capture.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::{MockOpener, MockSerialPort};
pub use sync_port::*;
pub use traits::*;
