//! Canton AG (Aargau) — degressive flat rate by holding period.
//!
//! AG has no progressive brackets: the tax is `gain × rate` where the rate
//! depends solely on completed ownership years. It starts at 40% for sales
//! within the first year and falls to a 5% floor beyond 25 years.

use std::collections::BTreeMap;

use ggst_core::calculations::tariff::finalize_simple_tax;
use ggst_core::{Confession, HoldingPeriod, ResultMetadata, TaxInputs, TaxResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::engine::{CantonEngine, CantonError};

pub struct AargauEngine {
    rates_by_holding_years: BTreeMap<i32, Decimal>,
    min_rate: Decimal,
}

impl AargauEngine {
    pub fn new() -> Self {
        // §§ 96ff StG AG: -2 percentage points per year through year 11,
        // then -1 point per year through year 25.
        let rates_by_holding_years = (1..=25)
            .map(|years| {
                let rate = if years <= 11 {
                    dec!(0.40) - Decimal::from(years - 1) * dec!(0.02)
                } else {
                    dec!(0.19) - Decimal::from(years - 12) * dec!(0.01)
                };
                (years, rate)
            })
            .collect();

        Self { rates_by_holding_years, min_rate: dec!(0.05) }
    }

    fn rate_for(&self, ownership_years: i32) -> Decimal {
        if ownership_years <= 0 {
            // Less than one completed year uses the year-1 rate.
            return self.rates_by_holding_years[&1];
        }
        self.rates_by_holding_years
            .get(&ownership_years)
            .copied()
            .unwrap_or(self.min_rate)
    }

    fn metadata(&self, inputs: &TaxInputs) -> ResultMetadata {
        ResultMetadata {
            canton: self.canton_code().to_string(),
            canton_name: self.canton_name().to_string(),
            commune: inputs.commune.clone(),
            tax_year: inputs.tax_year,
            source_links: vec![
                "https://www.ag.ch/de/verwaltung/dfr/steuern/grundstueckgewinnsteuer".to_string(),
                "https://www.estv2.admin.ch/stp/kb/ag-de.pdf".to_string(),
            ],
        }
    }
}

impl Default for AargauEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CantonEngine for AargauEngine {
    fn canton_code(&self) -> &'static str {
        "AG"
    }

    fn canton_name(&self) -> &'static str {
        "Aargau"
    }

    fn communes(&self, _tax_year: i32) -> Vec<String> {
        // TODO: load the full list from the BFS commune dataset.
        ["Aarau", "Baden", "Wettingen", "Brugg", "Lenzburg"]
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

        if taxable_gain <= Decimal::ZERO {
            debug!(%taxable_gain, "non-positive gain, returning zero result");
            return Ok(TaxResult::zero(taxable_gain, holding, self.metadata(inputs)));
        }

        let rate = self.rate_for(holding.years());
        let simple_tax = finalize_simple_tax(taxable_gain * rate);
        let effective_tax_rate_percent = Decimal::ONE_HUNDRED * simple_tax / taxable_gain;

        // Uniform canton rate, no Steuerfuss: the simple tax is the total tax
        // and accrues to the canton.
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
            brackets_applied: vec![],
            remainder_amount: Decimal::ZERO,
            remainder_tax: Decimal::ZERO,
            surcharge_rate: None,
            discount_rate: None,
            holding_period_rate: Some(rate),
            adjusted_gain: None,
            simple_tax_before_adjustments: simple_tax,
            effective_tax_rate_percent,
            canton_multiplier_percent: Decimal::ONE_HUNDRED,
            commune_multiplier_percent: Decimal::ZERO,
            metadata: self.metadata(inputs),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};
    use ggst_core::TaxpayerType;
    use pretty_assertions::assert_eq;

    use super::*;

    fn engine() -> AargauEngine {
        AargauEngine::new()
    }

    fn make_inputs(gain: i64, months: i32) -> TaxInputs {
        let purchase = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let mut sale_year = purchase.year() + months / 12;
        let mut sale_month = 1 + months % 12;
        if sale_month > 12 {
            sale_year += 1;
            sale_month -= 12;
        }
        TaxInputs {
            canton: "AG".to_string(),
            commune: "Aarau".to_string(),
            tax_year: 2025,
            purchase_date: purchase,
            sale_date: NaiveDate::from_ymd_opt(sale_year, sale_month as u32, 1).unwrap(),
            purchase_price: dec!(300000),
            sale_price: Decimal::from(300000 + gain),
            acquisition_costs: Decimal::ZERO,
            selling_costs: Decimal::ZERO,
            investments: vec![],
            taxpayer_type: TaxpayerType::Natural,
            confessions: BTreeMap::new(),
        }
    }

    #[test]
    fn rate_table_shape() {
        let engine = engine();
        assert_eq!(engine.rate_for(1), dec!(0.40));
        assert_eq!(engine.rate_for(11), dec!(0.20));
        assert_eq!(engine.rate_for(12), dec!(0.19));
        assert_eq!(engine.rate_for(25), dec!(0.06));
        assert_eq!(engine.rate_for(26), dec!(0.05));
    }

    #[test]
    fn sale_within_first_year_uses_maximum_rate() {
        let result = engine().compute(&make_inputs(100000, 6)).unwrap();

        assert_eq!(result.holding_period_rate, Some(dec!(0.40)));
        assert_eq!(result.simple_tax, dec!(40000.00));
        assert_eq!(result.total_tax, dec!(40000.00));
        assert_eq!(result.canton_share, dec!(40000.00));
        assert_eq!(result.commune_share, dec!(0));
    }

    #[test]
    fn five_years() {
        let result = engine().compute(&make_inputs(100000, 60)).unwrap();

        assert_eq!(result.holding_period_rate, Some(dec!(0.32)));
        assert_eq!(result.simple_tax, dec!(32000.00));
    }

    #[test]
    fn ten_years() {
        let result = engine().compute(&make_inputs(100000, 120)).unwrap();

        assert_eq!(result.holding_period_rate, Some(dec!(0.22)));
        assert_eq!(result.simple_tax, dec!(22000.00));
    }

    #[test]
    fn twenty_five_years() {
        let result = engine().compute(&make_inputs(100000, 300)).unwrap();

        assert_eq!(result.holding_period_rate, Some(dec!(0.06)));
        assert_eq!(result.simple_tax, dec!(6000.00));
    }

    #[test]
    fn beyond_25_years_hits_the_floor() {
        let result = engine().compute(&make_inputs(100000, 360)).unwrap();

        assert_eq!(result.holding_period_rate, Some(dec!(0.05)));
        assert_eq!(result.simple_tax, dec!(5000.00));
    }

    #[test]
    fn no_minimum_gain_threshold() {
        // AG taxes from the first franc of gain.
        let result = engine().compute(&make_inputs(1, 120)).unwrap();

        assert_eq!(result.simple_tax, dec!(0.22));
    }

    #[test]
    fn zero_gain_yields_zero_result() {
        let result = engine().compute(&make_inputs(0, 120)).unwrap();

        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.holding_period_rate, None);
    }
}
