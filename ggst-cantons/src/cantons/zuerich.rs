//! Canton ZH (Zürich) — communal-uniform tariff.
//!
//! The tariff is set by the canton and applies identically in every commune;
//! there is no canton/commune Steuerfuss split and the full tax accrues to
//! the commune. Church tax is not part of the real-estate gains tax in ZH.
//! Gains below CHF 5'000 are tax-free.

use ggst_core::calculations::tariff::{
    apply_discount, apply_surcharge, evaluate_brackets, finalize_simple_tax,
};
use ggst_core::{
    Bracket, Confession, DiscountEntry, HoldingPeriod, ResultMetadata, SurchargeEntry,
    TariffSchedule, TaxInputs, TaxResult,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::debug;

use crate::engine::{CantonEngine, CantonError};

pub struct ZuerichEngine {
    schedule: TariffSchedule,
    minimum_taxable_gain: Decimal,
}

impl ZuerichEngine {
    pub fn new() -> Self {
        // § 225 StG ZH: 5% relief at 5 full years, +3 percentage points per
        // further year, capped at 50% after 20 years.
        let discounts = (5..=20)
            .map(|years| DiscountEntry {
                years,
                rate: dec!(0.05) + Decimal::from(years - 5) * dec!(0.03),
            })
            .collect();

        let schedule = TariffSchedule {
            brackets: vec![
                Bracket { limit: dec!(4000), rate: dec!(0.10) },
                Bracket { limit: dec!(10000), rate: dec!(0.15) },
                Bracket { limit: dec!(18000), rate: dec!(0.20) },
                Bracket { limit: dec!(30000), rate: dec!(0.25) },
                Bracket { limit: dec!(50000), rate: dec!(0.30) },
                Bracket { limit: dec!(100000), rate: dec!(0.35) },
            ],
            top_rate: Some(dec!(0.40)),
            surcharges: vec![
                SurchargeEntry { max_months: 12, rate: dec!(0.50) },
                SurchargeEntry { max_months: 24, rate: dec!(0.25) },
            ],
            surcharge_threshold_months: 24,
            discounts,
            discount_min_years: 5,
        };

        Self { schedule, minimum_taxable_gain: dec!(5000) }
    }

    fn metadata(&self, inputs: &TaxInputs) -> ResultMetadata {
        ResultMetadata {
            canton: self.canton_code().to_string(),
            canton_name: self.canton_name().to_string(),
            commune: inputs.commune.clone(),
            tax_year: inputs.tax_year,
            source_links: vec![
                "https://www.zh.ch/de/steuern-finanzen/steuern/grundstueckgewinnsteuer.html"
                    .to_string(),
                "https://www.estv2.admin.ch/stp/kb/zh-de.pdf".to_string(),
            ],
        }
    }
}

impl Default for ZuerichEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CantonEngine for ZuerichEngine {
    fn canton_code(&self) -> &'static str {
        "ZH"
    }

    fn canton_name(&self) -> &'static str {
        "Zürich"
    }

    fn communes(&self, _tax_year: i32) -> Vec<String> {
        // ZH has ~160 communes, all sharing the cantonal tariff.
        // TODO: load the full list from the BFS commune dataset.
        ["Zürich", "Winterthur", "Wädenswil", "Uster", "Dietikon"]
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

        if taxable_gain <= Decimal::ZERO || taxable_gain < self.minimum_taxable_gain {
            debug!(%taxable_gain, "gain below taxable minimum, returning zero result");
            return Ok(TaxResult::zero(taxable_gain, holding, self.metadata(inputs)));
        }

        let eval =
            evaluate_brackets(taxable_gain, &self.schedule.brackets, self.schedule.top_rate);
        let simple_tax_before_adjustments = eval.total_tax;

        let surcharged = apply_surcharge(
            eval.total_tax,
            holding.months(),
            &self.schedule.surcharges,
            self.schedule.surcharge_threshold_months,
        );
        let discounted = apply_discount(
            surcharged.tax,
            holding.months(),
            &self.schedule.discounts,
            self.schedule.discount_min_years,
        );

        let simple_tax = finalize_simple_tax(discounted.tax);
        let effective_tax_rate_percent = Decimal::ONE_HUNDRED * simple_tax / taxable_gain;

        Ok(TaxResult {
            taxable_gain,
            simple_tax,
            canton_share: Decimal::ZERO,
            commune_share: simple_tax,
            church_tax_total: Decimal::ZERO,
            church_tax_breakdown: BTreeMap::new(),
            total_tax: simple_tax,
            holding_months: holding.months(),
            holding_years: holding.years(),
            brackets_applied: eval.steps,
            remainder_amount: eval.remainder_amount,
            remainder_tax: eval.remainder_tax,
            surcharge_rate: surcharged.applied_rate,
            discount_rate: discounted.applied_rate,
            holding_period_rate: None,
            adjusted_gain: None,
            simple_tax_before_adjustments,
            effective_tax_rate_percent,
            canton_multiplier_percent: Decimal::ZERO,
            commune_multiplier_percent: Decimal::ONE_HUNDRED,
            metadata: self.metadata(inputs),
        })
    }
}
