//! Canton BE (Bern) — Steuerfuss model with gain-reduction discount.
//!
//! BE deviates from the canonical pipeline in one place: the holding-period
//! discount reduces the taxable *gain* before bracket evaluation instead of
//! reducing the tax afterwards. The surcharge for short holding still
//! multiplies the tax. The simple tax is then scaled by the cantonal
//! Steueranlage and the communal Steuerfuss.

use std::collections::BTreeMap;

use ggst_core::calculations::tariff::{
    apply_surcharge, compute_share, evaluate_brackets, finalize_simple_tax,
};
use ggst_core::{
    Bracket, Confession, DiscountEntry, HoldingPeriod, ResultMetadata, SurchargeEntry,
    TariffSchedule, TaxInputs, TaxResult,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::engine::{CantonEngine, CantonError};

struct CommuneRates {
    commune: &'static str,
    multiplier_percent: Decimal,
}

struct YearRates {
    tax_year: i32,
    canton_multiplier_percent: Decimal,
    communes: Vec<CommuneRates>,
}

pub struct BernEngine {
    schedule: TariffSchedule,
    minimum_taxable_gain: Decimal,
    steuerfuesse: Vec<YearRates>,
}

impl BernEngine {
    pub fn new() -> Self {
        // Art. 146 StG BE: 2% gain reduction per full year of ownership from
        // the sixth year on, capped at 50% after 30 years.
        let discounts = (6..=30)
            .map(|years| DiscountEntry { years, rate: Decimal::from(years - 5) * dec!(0.02) })
            .collect();

        let schedule = TariffSchedule {
            brackets: vec![
                Bracket { limit: dec!(2700), rate: dec!(0.0144) },
                Bracket { limit: dec!(5400), rate: dec!(0.024) },
                Bracket { limit: dec!(13300), rate: dec!(0.0408) },
                Bracket { limit: dec!(26300), rate: dec!(0.0492) },
                Bracket { limit: dec!(52400), rate: dec!(0.057) },
                Bracket { limit: dec!(78600), rate: dec!(0.0648) },
                Bracket { limit: dec!(104900), rate: dec!(0.0726) },
                Bracket { limit: dec!(157300), rate: dec!(0.0804) },
            ],
            top_rate: Some(dec!(0.0882)),
            surcharges: vec![
                SurchargeEntry { max_months: 12, rate: dec!(0.70) },
                SurchargeEntry { max_months: 24, rate: dec!(0.50) },
                SurchargeEntry { max_months: 36, rate: dec!(0.35) },
                SurchargeEntry { max_months: 48, rate: dec!(0.20) },
                SurchargeEntry { max_months: 60, rate: dec!(0.10) },
            ],
            surcharge_threshold_months: 60,
            discounts,
            discount_min_years: 6,
        };

        let steuerfuesse = [2025, 2026]
            .into_iter()
            .map(|tax_year| YearRates {
                tax_year,
                canton_multiplier_percent: dec!(302.5),
                communes: vec![
                    CommuneRates { commune: "Bern", multiplier_percent: dec!(154) },
                    CommuneRates { commune: "Biel/Bienne", multiplier_percent: dec!(185) },
                    CommuneRates { commune: "Thun", multiplier_percent: dec!(172) },
                ],
            })
            .collect();

        Self { schedule, minimum_taxable_gain: dec!(5200), steuerfuesse }
    }

    fn year_rates(&self, tax_year: i32) -> Option<&YearRates> {
        self.steuerfuesse.iter().find(|y| y.tax_year == tax_year)
    }

    fn metadata(&self, inputs: &TaxInputs) -> ResultMetadata {
        ResultMetadata {
            canton: self.canton_code().to_string(),
            canton_name: self.canton_name().to_string(),
            commune: inputs.commune.clone(),
            tax_year: inputs.tax_year,
            source_links: vec![
                "https://www.be.ch/de/start/themen/steuern/grundstueckgewinnsteuer.html"
                    .to_string(),
                "https://www.estv2.admin.ch/stp/kb/be-de.pdf".to_string(),
            ],
        }
    }
}

impl Default for BernEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CantonEngine for BernEngine {
    fn canton_code(&self) -> &'static str {
        "BE"
    }

    fn canton_name(&self) -> &'static str {
        "Bern"
    }

    fn communes(&self, tax_year: i32) -> Vec<String> {
        self.year_rates(tax_year)
            .map(|year| year.communes.iter().map(|c| c.commune.to_string()).collect())
            .unwrap_or_default()
    }

    fn available_years(&self) -> Vec<i32> {
        self.steuerfuesse.iter().map(|y| y.tax_year).collect()
    }

    fn confessions(&self) -> Vec<Confession> {
        // Church tax is not levied through this engine for BE.
        vec![]
    }

    fn compute(&self, inputs: &TaxInputs) -> Result<TaxResult, CantonError> {
        let raw_gain = inputs.taxable_gain();
        let holding = HoldingPeriod::between(inputs.purchase_date, inputs.sale_date);

        if raw_gain <= Decimal::ZERO || raw_gain < self.minimum_taxable_gain {
            debug!(%raw_gain, "gain below taxable minimum, returning zero result");
            return Ok(TaxResult::zero(raw_gain, holding, self.metadata(inputs)));
        }

        // The discount reduces the taxable gain before bracket evaluation.
        let mut discount_rate = None;
        let mut adjusted_gain = None;
        let mut bracket_base = raw_gain;
        if holding.years() >= self.schedule.discount_min_years {
            if let Some(entry) = self
                .schedule
                .discounts
                .iter()
                .rev()
                .find(|entry| holding.years() >= entry.years)
            {
                discount_rate = Some(entry.rate);
                bracket_base = raw_gain * (Decimal::ONE - entry.rate);
                adjusted_gain = Some(bracket_base);
            }
        }

        let eval = evaluate_brackets(bracket_base, &self.schedule.brackets, self.schedule.top_rate);
        let simple_tax_before_adjustments = eval.total_tax;

        let surcharged = apply_surcharge(
            eval.total_tax,
            holding.months(),
            &self.schedule.surcharges,
            self.schedule.surcharge_threshold_months,
        );

        let simple_tax = finalize_simple_tax(surcharged.tax);

        let year = self
            .year_rates(inputs.tax_year)
            .ok_or_else(|| CantonError::UnknownCommune {
                commune: inputs.commune.clone(),
                tax_year: inputs.tax_year,
            })?;
        let commune = year
            .communes
            .iter()
            .find(|c| c.commune == inputs.commune)
            .ok_or_else(|| CantonError::UnknownCommune {
                commune: inputs.commune.clone(),
                tax_year: inputs.tax_year,
            })?;

        let canton_share = compute_share(simple_tax, year.canton_multiplier_percent);
        let commune_share = compute_share(simple_tax, commune.multiplier_percent);
        let total_tax = canton_share + commune_share;
        let effective_tax_rate_percent = Decimal::ONE_HUNDRED * simple_tax / raw_gain;

        Ok(TaxResult {
            taxable_gain: raw_gain,
            simple_tax,
            canton_share,
            commune_share,
            church_tax_total: Decimal::ZERO,
            church_tax_breakdown: BTreeMap::new(),
            total_tax,
            holding_months: holding.months(),
            holding_years: holding.years(),
            brackets_applied: eval.steps,
            remainder_amount: eval.remainder_amount,
            remainder_tax: eval.remainder_tax,
            surcharge_rate: surcharged.applied_rate,
            discount_rate,
            holding_period_rate: None,
            adjusted_gain,
            simple_tax_before_adjustments,
            effective_tax_rate_percent,
            canton_multiplier_percent: year.canton_multiplier_percent,
            commune_multiplier_percent: commune.multiplier_percent,
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

    fn engine() -> BernEngine {
        BernEngine::new()
    }

    fn make_inputs(gain: i64, months: i32) -> TaxInputs {
        let purchase = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let mut sale_year = purchase.year() + months / 12;
        let mut sale_month = 1 + months % 12;
        if sale_month > 12 {
            sale_year += 1;
            sale_month -= 12;
        }
        TaxInputs {
            canton: "BE".to_string(),
            commune: "Bern".to_string(),
            tax_year: 2025,
            purchase_date: purchase,
            sale_date: NaiveDate::from_ymd_opt(sale_year, sale_month as u32, 1).unwrap(),
            purchase_price: dec!(100000),
            sale_price: Decimal::from(100000 + gain),
            acquisition_costs: Decimal::ZERO,
            selling_costs: Decimal::ZERO,
            investments: vec![],
            taxpayer_type: TaxpayerType::Natural,
            confessions: BTreeMap::new(),
        }
    }

    #[test]
    fn schedule_is_valid() {
        assert_eq!(engine().schedule.validate(), Ok(()));
    }

    #[test]
    fn gain_below_minimum_is_tax_free() {
        let result = engine().compute(&make_inputs(5000, 120)).unwrap();

        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn discount_reduces_the_gain_not_the_tax() {
        let result = engine().compute(&make_inputs(10000, 120)).unwrap();

        // 10 years → 10% gain reduction; adjusted gain 9000.
        // Brackets: 2700*0.0144 + 2700*0.024 + 3600*0.0408 = 250.56
        assert_eq!(result.discount_rate, Some(dec!(0.10)));
        assert_eq!(result.adjusted_gain, Some(dec!(9000.00)));
        assert_eq!(result.simple_tax, dec!(250.56));
        // taxable_gain reports the unreduced gain
        assert_eq!(result.taxable_gain, dec!(10000));
    }

    #[test]
    fn short_holding_surcharge_on_full_gain() {
        let result = engine().compute(&make_inputs(50000, 6)).unwrap();

        // No discount below 6 years; brackets on 50000 give 2416.50,
        // then 70% surcharge → 4108.05.
        assert_eq!(result.discount_rate, None);
        assert_eq!(result.adjusted_gain, None);
        assert_eq!(result.surcharge_rate, Some(dec!(0.70)));
        assert_eq!(result.simple_tax_before_adjustments, dec!(2416.50));
        assert_eq!(result.simple_tax, dec!(4108.05));
    }

    #[test]
    fn discount_caps_at_50_percent_after_30_years() {
        let result = engine().compute(&make_inputs(100000, 360)).unwrap();

        assert_eq!(result.discount_rate, Some(dec!(0.50)));
        assert_eq!(result.adjusted_gain, Some(dec!(50000.00)));
        // Same brackets as a 50000 gain without discount.
        assert_eq!(result.simple_tax_before_adjustments, dec!(2416.50));
        assert_eq!(result.simple_tax, dec!(2416.50));
    }

    #[test]
    fn shares_use_steuerfuss_multipliers() {
        let result = engine().compute(&make_inputs(10000, 120)).unwrap();

        // Simple tax 250.56; canton 302.5%, commune Bern 154%.
        // 250.56 * 3.025 = 757.944 → 757.95 (rounded up to 0.05)
        // 250.56 * 1.54 = 385.8624 → 385.90
        assert_eq!(result.canton_multiplier_percent, dec!(302.5));
        assert_eq!(result.commune_multiplier_percent, dec!(154));
        assert_eq!(result.canton_share, dec!(757.95));
        assert_eq!(result.commune_share, dec!(385.90));
        assert_eq!(result.total_tax, dec!(1143.85));
    }

    #[test]
    fn unknown_commune_is_an_error() {
        let mut inputs = make_inputs(10000, 120);
        inputs.commune = "Köniz".to_string();

        assert!(matches!(
            engine().compute(&inputs),
            Err(CantonError::UnknownCommune { .. })
        ));
    }
}
