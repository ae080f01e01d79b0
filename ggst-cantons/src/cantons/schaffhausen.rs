//! Canton SH (Schaffhausen) — the reference canton.
//!
//! SH runs the full canonical pipeline: ten progressive brackets with a 15%
//! top rate, month-based surcharges below 60 months, year-based discounts
//! from 6 full years (up to 60% at 17+ years), then canton and commune
//! shares via the per-commune Steuerfuss and church tax distributed across
//! confessions. Monetary behavior is pinned to the cantonal JavaScript
//! reference calculator.

use std::collections::BTreeMap;

use ggst_core::calculations::tariff::{
    apply_discount, apply_surcharge, compute_church_tax, compute_share, evaluate_brackets,
    finalize_simple_tax,
};
use ggst_core::{
    Bracket, Confession, DiscountEntry, HoldingPeriod, ResultMetadata, SurchargeEntry,
    TariffSchedule, TaxInputs, TaxResult,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::engine::{CantonEngine, CantonError};

/// Steuerfuss and confession rates for one commune, in percent.
struct CommuneRates {
    commune: &'static str,
    multiplier_percent: Decimal,
    evang_r: Decimal,
    roem_k: Decimal,
    christ_k: Decimal,
}

struct YearRates {
    tax_year: i32,
    canton_multiplier_percent: Decimal,
    communes: Vec<CommuneRates>,
}

pub struct SchaffhausenEngine {
    schedule: TariffSchedule,
    steuerfuesse: Vec<YearRates>,
}

impl SchaffhausenEngine {
    pub fn new() -> Self {
        let schedule = TariffSchedule {
            brackets: vec![
                Bracket { limit: dec!(2000), rate: dec!(0.02) },
                Bracket { limit: dec!(4000), rate: dec!(0.04) },
                Bracket { limit: dec!(6000), rate: dec!(0.06) },
                Bracket { limit: dec!(8000), rate: dec!(0.08) },
                Bracket { limit: dec!(15000), rate: dec!(0.10) },
                Bracket { limit: dec!(30000), rate: dec!(0.12) },
                Bracket { limit: dec!(45000), rate: dec!(0.14) },
                Bracket { limit: dec!(60000), rate: dec!(0.16) },
                Bracket { limit: dec!(80000), rate: dec!(0.18) },
                Bracket { limit: dec!(100000), rate: dec!(0.20) },
            ],
            top_rate: Some(dec!(0.15)),
            surcharges: vec![
                SurchargeEntry { max_months: 6, rate: dec!(0.50) },
                SurchargeEntry { max_months: 12, rate: dec!(0.45) },
                SurchargeEntry { max_months: 18, rate: dec!(0.40) },
                SurchargeEntry { max_months: 24, rate: dec!(0.35) },
                SurchargeEntry { max_months: 30, rate: dec!(0.30) },
                SurchargeEntry { max_months: 36, rate: dec!(0.25) },
                SurchargeEntry { max_months: 42, rate: dec!(0.20) },
                SurchargeEntry { max_months: 48, rate: dec!(0.15) },
                SurchargeEntry { max_months: 54, rate: dec!(0.10) },
                SurchargeEntry { max_months: 60, rate: dec!(0.05) },
            ],
            surcharge_threshold_months: 60,
            discounts: vec![
                DiscountEntry { years: 6, rate: dec!(0.05) },
                DiscountEntry { years: 7, rate: dec!(0.10) },
                DiscountEntry { years: 8, rate: dec!(0.15) },
                DiscountEntry { years: 9, rate: dec!(0.20) },
                DiscountEntry { years: 10, rate: dec!(0.25) },
                DiscountEntry { years: 11, rate: dec!(0.30) },
                DiscountEntry { years: 12, rate: dec!(0.35) },
                DiscountEntry { years: 13, rate: dec!(0.40) },
                DiscountEntry { years: 14, rate: dec!(0.45) },
                DiscountEntry { years: 15, rate: dec!(0.50) },
                DiscountEntry { years: 16, rate: dec!(0.55) },
                DiscountEntry { years: 17, rate: dec!(0.60) },
            ],
            discount_min_years: 6,
        };

        let steuerfuesse = [2025, 2026]
            .into_iter()
            .map(|tax_year| YearRates {
                tax_year,
                canton_multiplier_percent: dec!(76),
                communes: vec![
                    CommuneRates {
                        commune: "Schaffhausen",
                        multiplier_percent: dec!(83),
                        evang_r: dec!(13),
                        roem_k: dec!(13),
                        christ_k: dec!(13),
                    },
                    CommuneRates {
                        commune: "Neuhausen am Rheinfall",
                        multiplier_percent: dec!(98),
                        evang_r: dec!(14),
                        roem_k: dec!(13.5),
                        christ_k: dec!(13),
                    },
                    CommuneRates {
                        commune: "Thayngen",
                        multiplier_percent: dec!(97),
                        evang_r: dec!(13),
                        roem_k: dec!(13),
                        christ_k: dec!(13),
                    },
                    CommuneRates {
                        commune: "Stein am Rhein",
                        multiplier_percent: dec!(91),
                        evang_r: dec!(12),
                        roem_k: dec!(12.5),
                        christ_k: dec!(13),
                    },
                ],
            })
            .collect();

        Self { schedule, steuerfuesse }
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
                "https://sh.ch/CMS/get/file/ca0d9d0b-64f9-45fc-9754-a186094ed97e".to_string(),
                "https://www.estv2.admin.ch/stp/kb/sh-de.pdf".to_string(),
            ],
        }
    }
}

impl Default for SchaffhausenEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CantonEngine for SchaffhausenEngine {
    fn canton_code(&self) -> &'static str {
        "SH"
    }

    fn canton_name(&self) -> &'static str {
        "Schaffhausen"
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
        vec![
            Confession::EvangelicalReformed,
            Confession::RomanCatholic,
            Confession::ChristianCatholic,
            Confession::Other,
        ]
    }

    fn compute(&self, inputs: &TaxInputs) -> Result<TaxResult, CantonError> {
        let taxable_gain = inputs.taxable_gain();
        let holding = HoldingPeriod::between(inputs.purchase_date, inputs.sale_date);

        if taxable_gain <= Decimal::ZERO {
            debug!(%taxable_gain, "non-positive gain, returning zero result");
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

        let confession_rates = BTreeMap::from([
            (Confession::EvangelicalReformed, commune.evang_r),
            (Confession::RomanCatholic, commune.roem_k),
            (Confession::ChristianCatholic, commune.christ_k),
            (Confession::Other, Decimal::ZERO),
        ]);
        let church = compute_church_tax(simple_tax, &confession_rates, &inputs.confessions);

        let total_tax = canton_share + commune_share + church.total;
        let effective_tax_rate_percent = Decimal::ONE_HUNDRED * simple_tax / taxable_gain;

        Ok(TaxResult {
            taxable_gain,
            simple_tax,
            canton_share,
            commune_share,
            church_tax_total: church.total,
            church_tax_breakdown: church.breakdown,
            total_tax,
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
            canton_multiplier_percent: year.canton_multiplier_percent,
            commune_multiplier_percent: commune.multiplier_percent,
            metadata: self.metadata(inputs),
        })
    }
}
