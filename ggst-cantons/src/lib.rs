//! Canton policy layer for the Grundstückgewinnsteuer engine.
//!
//! Each canton module wires its own tariff tables and pipeline variation into
//! the shared arithmetic from `ggst-core`. The [`CantonRegistry`] maps canton
//! codes to engines and is built once at startup; it holds no global state.

pub mod cantons;
pub mod engine;
pub mod registry;

pub use engine::{CantonEngine, CantonError};
pub use registry::CantonRegistry;
