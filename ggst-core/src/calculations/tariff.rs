//! Generic progressive-tariff evaluation.
//!
//! These functions are the shared arithmetic behind every canton engine:
//! progressive bracket tables, holding-period surcharges and discounts, and
//! the canton/commune/church share distribution. All of them are pure
//! value-in/value-out functions over [`Decimal`]; intermediate values stay
//! exact and only [`finalize_simple_tax`] and the share functions quantize.
//!
//! # Pipeline
//!
//! The canonical composition, which canton engines follow unless their law
//! explicitly deviates:
//!
//! 1. [`evaluate_brackets`] on the taxable gain (or a flat/degressive rate),
//! 2. [`apply_surcharge`] for short ownership,
//! 3. [`apply_discount`] for long ownership,
//! 4. [`finalize_simple_tax`] — the "einfache Steuer",
//! 5. optionally [`compute_share`] per Steuerfuss multiplier and
//!    [`compute_church_tax`] across confessions.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ggst_core::calculations::tariff::{apply_discount, evaluate_brackets};
//! use ggst_core::models::{Bracket, DiscountEntry};
//!
//! let brackets = vec![
//!     Bracket { limit: dec!(2000), rate: dec!(0.02) },
//!     Bracket { limit: dec!(4000), rate: dec!(0.04) },
//!     Bracket { limit: dec!(6000), rate: dec!(0.06) },
//! ];
//! let discounts = vec![DiscountEntry { years: 10, rate: dec!(0.25) }];
//!
//! let eval = evaluate_brackets(dec!(5000), &brackets, None);
//! assert_eq!(eval.total_tax, dec!(180.00));
//!
//! let adjusted = apply_discount(eval.total_tax, 120, &discounts, 6);
//! assert_eq!(adjusted.tax, dec!(135.00));
//! assert_eq!(adjusted.applied_rate, Some(dec!(0.25)));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::rounding::{round_half_even, round_up_to_nickel};
use crate::models::{Bracket, BracketStep, Confession, DiscountEntry, SurchargeEntry};

/// Result of evaluating a progressive bracket table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketEvaluation {
    /// Cumulative tax from all brackets plus the remainder portion.
    pub total_tax: Decimal,

    /// One trace record per bracket actually touched.
    pub steps: Vec<BracketStep>,

    /// Portion of the amount above the last bracket limit that was taxed at
    /// the top rate. Zero when the table covered the whole amount or no top
    /// rate was supplied.
    pub remainder_amount: Decimal,

    /// Tax on `remainder_amount`.
    pub remainder_tax: Decimal,
}

/// Output of a surcharge or discount application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustedTax {
    pub tax: Decimal,

    /// The rate that was applied, or `None` when no adjustment matched.
    pub applied_rate: Option<Decimal>,
}

/// Church tax total and per-confession breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChurchTax {
    pub total: Decimal,
    pub breakdown: BTreeMap<Confession, Decimal>,
}

/// Evaluates a progressive bracket table against `amount`.
///
/// Bracket limits are cumulative gain thresholds, ascending. Each band taxes
/// `min(remaining, limit - previous_limit)` at the band's rate. Whatever
/// remains above the last limit is taxed at `top_rate`; without a top rate
/// the excess stays untaxed, which is the correct behavior for cantons whose
/// table already ends in an unbounded top bracket.
///
/// Callers filter non-positive gains before calling; `amount` must be
/// positive and `brackets` must satisfy [`crate::models::TariffSchedule`]'s
/// invariants (validated at load time, not here).
pub fn evaluate_brackets(
    amount: Decimal,
    brackets: &[Bracket],
    top_rate: Option<Decimal>,
) -> BracketEvaluation {
    debug_assert!(amount > Decimal::ZERO, "callers must filter non-positive gains");

    let mut remaining = amount;
    let mut tax = Decimal::ZERO;
    let mut steps = Vec::new();
    let mut prev_limit = Decimal::ZERO;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }
        let band = bracket.limit - prev_limit;
        let taxable = remaining.min(band);
        let bracket_tax = taxable * bracket.rate;
        tax += bracket_tax;
        steps.push(BracketStep {
            bracket_limit: bracket.limit,
            rate: bracket.rate,
            taxable_amount: taxable,
            tax_in_bracket: bracket_tax,
            cumulative_tax: tax,
        });
        remaining -= taxable;
        prev_limit = bracket.limit;
    }

    let mut remainder_amount = Decimal::ZERO;
    let mut remainder_tax = Decimal::ZERO;
    if remaining > Decimal::ZERO
        && let Some(rate) = top_rate
    {
        remainder_amount = remaining;
        remainder_tax = remaining * rate;
        tax += remainder_tax;
    }

    BracketEvaluation { total_tax: tax, steps, remainder_amount, remainder_tax }
}

/// Applies a holding-period surcharge for short ownership.
///
/// No surcharge applies at or above `threshold_months`. Below it, the table
/// is scanned in its given ascending order and the **first** entry with
/// `total_months <= max_months` wins — the tightest short-holding band — and
/// the tax is multiplied by `1 + rate`. An exhausted table is a silent
/// no-op: real configurations cover `[0, threshold_months)` fully.
pub fn apply_surcharge(
    tax: Decimal,
    total_months: i32,
    surcharges: &[SurchargeEntry],
    threshold_months: i32,
) -> AdjustedTax {
    if total_months >= threshold_months {
        return AdjustedTax { tax, applied_rate: None };
    }
    for entry in surcharges {
        if total_months <= entry.max_months {
            return AdjustedTax {
                tax: tax * (Decimal::ONE + entry.rate),
                applied_rate: Some(entry.rate),
            };
        }
    }
    warn!(total_months, threshold_months, "surcharge table exhausted without a match");
    AdjustedTax { tax, applied_rate: None }
}

/// Applies a holding-period discount for long ownership.
///
/// Ownership years are completed years, `total_months / 12`. No discount
/// applies below `min_years`. Otherwise the table is scanned from the
/// **highest** `years` threshold downward and the first entry with
/// `years <= ownership_years` wins — the most generous long-holding band —
/// and the tax is multiplied by `1 - rate`. Note the traversal direction is
/// the opposite of [`apply_surcharge`]; both directions are contractual.
pub fn apply_discount(
    tax: Decimal,
    total_months: i32,
    discounts: &[DiscountEntry],
    min_years: i32,
) -> AdjustedTax {
    let ownership_years = total_months / 12;
    if ownership_years < min_years {
        return AdjustedTax { tax, applied_rate: None };
    }
    for entry in discounts.iter().rev() {
        if ownership_years >= entry.years {
            return AdjustedTax {
                tax: tax * (Decimal::ONE - entry.rate),
                applied_rate: Some(entry.rate),
            };
        }
    }
    AdjustedTax { tax, applied_rate: None }
}

/// Computes a canton or commune share from the simple tax and a Steuerfuss
/// multiplier given in percent.
///
/// `round_up_to_nickel(simple_tax * multiplier_percent / 100)` — the ceiling
/// is the documented cantonal convention, which over-collects by at most
/// four centimes per share.
pub fn compute_share(simple_tax: Decimal, multiplier_percent: Decimal) -> Decimal {
    round_up_to_nickel(simple_tax * multiplier_percent / Decimal::ONE_HUNDRED)
}

/// Distributes church tax across confessions, pro rata per person.
///
/// Each person is liable for `simple_tax * rate(confession) / 100 /
/// total_people`; a confession's share is that amount times its headcount.
/// Confessions without a configured rate count as 0% rather than erroring.
/// With zero total headcount the result is zero with an empty breakdown.
pub fn compute_church_tax(
    simple_tax: Decimal,
    confession_rates: &BTreeMap<Confession, Decimal>,
    confession_counts: &BTreeMap<Confession, u32>,
) -> ChurchTax {
    let total_people: u32 = confession_counts.values().sum();
    if total_people == 0 {
        return ChurchTax { total: Decimal::ZERO, breakdown: BTreeMap::new() };
    }

    let mut breakdown = BTreeMap::new();
    let mut total = Decimal::ZERO;

    for (&confession, &count) in confession_counts {
        let rate = confession_rates.get(&confession).copied().unwrap_or(Decimal::ZERO);
        let part = simple_tax * rate / Decimal::ONE_HUNDRED / Decimal::from(total_people)
            * Decimal::from(count);
        breakdown.insert(confession, part);
        total += part;
    }

    ChurchTax { total, breakdown }
}

/// Quantizes the adjusted tax to the two-decimal "einfache Steuer".
pub fn finalize_simple_tax(tax: Decimal) -> Decimal {
    round_half_even(tax)
}
