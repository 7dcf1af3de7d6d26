//! tfn-io: file gateway for transfer functions.
//!
//! Reads and writes the JSON and binary `.tfn` formats, maps file contents
//! onto the normalized `[0, 1]` domain, and exports evaluated palettes as
//! PNG strips.

pub mod error;
pub mod export;
pub mod format;
pub mod gateway;

pub use error::{Channel, GatewayError, GatewayResult};
pub use export::{write_palette_png, write_pre_integration_png};
pub use format::{Format, LoadedTransferFunction};
pub use gateway::{SaveOptions, load, load_from_bytes, load_into, save};
