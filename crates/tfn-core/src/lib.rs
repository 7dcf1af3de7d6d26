//! tfn-core: control-point model for piecewise-linear transfer functions.
//!
//! This crate owns the color and opacity curves, their point-level edits,
//! and the sampling that turns them into RGBA palettes. It never touches a
//! graphics API: render hosts receive plain buffers or tables by value.

pub mod collection;
pub mod command;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod linear2d;
pub mod point;
pub mod preset;
pub mod publish;
pub mod sequence;
pub mod transfer_function;

// Re-exports for convenience.
pub use collection::{Origin, TransferFunctionCollection};
pub use command::EditCommand;
pub use config::EditorConfig;
pub use error::{Result, TfnError};
pub use evaluate::{Palette, SampleSpacing, evaluate};
pub use linear2d::{Linear2DTable, PreIntegrationTable};
pub use point::{ColorPoint, ControlPoint, OpacityPoint};
pub use preset::Preset;
pub use publish::{PalettePublisher, PaletteSnapshot};
pub use sequence::{ColorPoints, ControlPoints, EditOutcome, OpacityPoints};
pub use transfer_function::TransferFunction;
