//! Canton SG (St. Gallen) — progressive tariff with additive surcharges.
//!
//! SG deviates from the canonical pipeline in three places: extra high-gain
//! brackets extend the base tariff above CHF 248'000, gains of CHF 600'000
//! or more are taxed at a flat 10% on the entire gain, and the short-holding
//! surcharge adds percentage points on the gain (`tax += gain × rate`)
//! instead of multiplying the tax. The discount from year 17 scales per year
//! and is capped, with a lower cap for gains of CHF 500'000 or more.

use std::collections::BTreeMap;

use ggst_core::calculations::tariff::{evaluate_brackets, finalize_simple_tax};
use ggst_core::{Bracket, Confession, HoldingPeriod, ResultMetadata, TaxInputs, TaxResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::engine::{CantonEngine, CantonError};

/// Additive surcharge band: applies when completed ownership years are
/// strictly below `year`.
struct YearSurcharge {
    year: i32,
    rate: Decimal,
}

pub struct StGallenEngine {
    brackets: Vec<Bracket>,
    minimum_taxable_gain: Decimal,
    flat_rate_threshold: Decimal,
    flat_rate: Decimal,
    surcharge_threshold_months: i32,
    surcharges_by_year: Vec<YearSurcharge>,
    discount_min_years: i32,
    discount_per_year_low: Decimal,
    discount_per_year_high: Decimal,
    discount_gain_threshold: Decimal,
    discount_max_low: Decimal,
    discount_max_high: Decimal,
}

impl StGallenEngine {
    pub fn new() -> Self {
        // Base tariff plus the high-gain brackets above 248k, as one list.
        let brackets = vec![
            Bracket { limit: dec!(2200), rate: dec!(0) },
            Bracket { limit: dec!(5000), rate: dec!(0.005) },
            Bracket { limit: dec!(7700), rate: dec!(0.01) },
            Bracket { limit: dec!(9800), rate: dec!(0.02) },
            Bracket { limit: dec!(11900), rate: dec!(0.03) },
            Bracket { limit: dec!(14500), rate: dec!(0.04) },
            Bracket { limit: dec!(18200), rate: dec!(0.05) },
            Bracket { limit: dec!(25100), rate: dec!(0.06) },
            Bracket { limit: dec!(34700), rate: dec!(0.07) },
            Bracket { limit: dec!(50000), rate: dec!(0.08) },
            Bracket { limit: dec!(72000), rate: dec!(0.085) },
            Bracket { limit: dec!(100000), rate: dec!(0.09) },
            Bracket { limit: dec!(150000), rate: dec!(0.095) },
            Bracket { limit: dec!(248000), rate: dec!(0.10) },
            Bracket { limit: dec!(350000), rate: dec!(0.105) },
            Bracket { limit: dec!(500000), rate: dec!(0.11) },
        ];

        Self {
            brackets,
            minimum_taxable_gain: dec!(2200),
            flat_rate_threshold: dec!(600000),
            flat_rate: dec!(0.10),
            surcharge_threshold_months: 60,
            surcharges_by_year: vec![
                YearSurcharge { year: 1, rate: dec!(0.05) },
                YearSurcharge { year: 2, rate: dec!(0.04) },
                YearSurcharge { year: 3, rate: dec!(0.03) },
                YearSurcharge { year: 4, rate: dec!(0.02) },
                YearSurcharge { year: 5, rate: dec!(0.01) },
            ],
            discount_min_years: 17,
            discount_per_year_low: dec!(0.015),
            discount_per_year_high: dec!(0.01),
            discount_gain_threshold: dec!(500000),
            discount_max_low: dec!(0.405),
            discount_max_high: dec!(0.27),
        }
    }

    /// Percentage points added on the gain for short holding periods.
    fn surcharge_rate(&self, total_months: i32) -> Option<Decimal> {
        if total_months >= self.surcharge_threshold_months {
            return None;
        }
        let ownership_years = total_months / 12;
        self.surcharges_by_year
            .iter()
            .find(|entry| ownership_years < entry.year)
            .map(|entry| entry.rate)
    }

    /// Discount from year 17; the per-year rate and cap depend on gain size.
    fn discount_rate(&self, total_months: i32, gain: Decimal) -> Option<Decimal> {
        let ownership_years = total_months / 12;
        if ownership_years < self.discount_min_years {
            return None;
        }
        let discount_years = Decimal::from(ownership_years - self.discount_min_years + 1);
        let rate = if gain >= self.discount_gain_threshold {
            (self.discount_per_year_high * discount_years).min(self.discount_max_high)
        } else {
            (self.discount_per_year_low * discount_years).min(self.discount_max_low)
        };
        Some(rate)
    }

    fn metadata(&self, inputs: &TaxInputs) -> ResultMetadata {
        ResultMetadata {
            canton: self.canton_code().to_string(),
            canton_name: self.canton_name().to_string(),
            commune: inputs.commune.clone(),
            tax_year: inputs.tax_year,
            source_links: vec![
                "https://www.sg.ch/steuern-finanzen/steuern/grundstueckgewinnsteuer.html"
                    .to_string(),
                "https://www.estv2.admin.ch/stp/kb/sg-de.pdf".to_string(),
            ],
        }
    }
}

impl Default for StGallenEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CantonEngine for StGallenEngine {
    fn canton_code(&self) -> &'static str {
        "SG"
    }

    fn canton_name(&self) -> &'static str {
        "St. Gallen"
    }

    fn communes(&self, _tax_year: i32) -> Vec<String> {
        // TODO: load the full list from the BFS commune dataset.
        ["St. Gallen", "Rapperswil-Jona", "Wil", "Gossau", "Buchs"]
            .map(String::from)
            .to_vec()
    }

    fn available_years(&self) -> Vec<i32> {
        vec![2024, 2025, 2026]
    }

    fn confessions(&self) -> Vec<Confession> {
        vec![]
    }

    fn compute(&self, inputs: &TaxInputs) -> Result<TaxResult, CantonError> {
        let taxable_gain = inputs.taxable_gain();
        let holding = HoldingPeriod::between(inputs.purchase_date, inputs.sale_date);

        // The SG minimum is inclusive: a gain of exactly 2200 is tax-free.
        if taxable_gain <= Decimal::ZERO || taxable_gain <= self.minimum_taxable_gain {
            debug!(%taxable_gain, "gain at or below taxable minimum, returning zero result");
            return Ok(TaxResult::zero(taxable_gain, holding, self.metadata(inputs)));
        }

        let (mut tax, steps, remainder_amount, remainder_tax) =
            if taxable_gain >= self.flat_rate_threshold {
                let flat_tax = taxable_gain * self.flat_rate;
                (flat_tax, vec![], taxable_gain, flat_tax)
            } else {
                let eval = evaluate_brackets(taxable_gain, &self.brackets, None);
                (eval.total_tax, eval.steps, eval.remainder_amount, eval.remainder_tax)
            };
        let simple_tax_before_adjustments = tax;

        let surcharge_rate = self.surcharge_rate(holding.months());
        if let Some(rate) = surcharge_rate {
            tax += taxable_gain * rate;
        }

        let discount_rate = self.discount_rate(holding.months(), taxable_gain);
        if let Some(rate) = discount_rate {
            tax *= Decimal::ONE - rate;
        }

        let simple_tax = finalize_simple_tax(tax);
        let effective_tax_rate_percent = Decimal::ONE_HUNDRED * simple_tax / taxable_gain;

        Ok(TaxResult {
            taxable_gain,
            simple_tax,
            canton_share: simple_tax,
            commune_share: Decimal::ZERO,
            church_tax_total: Decimal::ZERO,
            church_tax_breakdown: BTreeMap::new(),
            total_tax: simple_tax,
            holding_months: holding.months(),
            holding_years: holding.years(),
            brackets_applied: steps,
            remainder_amount,
            remainder_tax,
            surcharge_rate,
            discount_rate,
            holding_period_rate: None,
            adjusted_gain: None,
            simple_tax_before_adjustments,
            effective_tax_rate_percent,
            canton_multiplier_percent: Decimal::ONE_HUNDRED,
            commune_multiplier_percent: Decimal::ZERO,
            metadata: self.metadata(inputs),
        })
    }
}
