//! Canton-agnostic tax arithmetic.
//!
//! `rounding` holds the two deterministic rounding primitives; `tariff` holds
//! the progressive-bracket evaluator, the holding-period adjusters, and the
//! share/church-tax distributors.

pub mod rounding;
pub mod tariff;

pub use rounding::{round_half_even, round_up_to_nickel};
pub use tariff::{
    AdjustedTax, BracketEvaluation, ChurchTax, apply_discount, apply_surcharge,
    compute_church_tax, compute_share, evaluate_brackets, finalize_simple_tax,
};
