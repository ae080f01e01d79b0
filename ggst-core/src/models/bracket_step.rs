use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One step of a progressive bracket evaluation, recorded for traceability.
///
/// Steps are purely observational output; they are created once by the
/// evaluator and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketStep {
    /// Cumulative gain limit of the bracket that produced this step.
    pub bracket_limit: Decimal,

    /// Marginal rate of the bracket.
    pub rate: Decimal,

    /// Portion of the gain taxed inside this bracket's band.
    pub taxable_amount: Decimal,

    /// Tax accrued in this band (`taxable_amount * rate`).
    pub tax_in_bracket: Decimal,

    /// Running total after this band.
    pub cumulative_tax: Decimal,
}
