//! Core engine for Swiss real-estate capital-gains tax
//! ("Grundstückgewinnsteuer") computations.
//!
//! This crate contains the canton-agnostic arithmetic: deterministic rounding,
//! the progressive-bracket evaluator, holding-period surcharge/discount
//! adjustments, and canton/commune/church share distribution. Canton policy
//! (which tables apply, and in which variation of the pipeline) lives in the
//! `ggst-cantons` crate.
//!
//! All arithmetic uses [`rust_decimal::Decimal`]; values stay exact until one
//! of the rounding primitives in [`calculations::rounding`] is applied.

pub mod calculations;
pub mod models;

pub use models::*;
