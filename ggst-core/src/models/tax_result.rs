use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BracketStep, Confession, HoldingPeriod};

/// Traceability metadata attached to every result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub canton: String,
    pub canton_name: String,
    pub commune: String,
    pub tax_year: i32,
    /// Links to the authoritative cantonal sources the tariff was taken from.
    pub source_links: Vec<String>,
}

/// Full output of a Grundstückgewinnsteuer computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub taxable_gain: Decimal,

    /// The "einfache Steuer": base tax after bracket evaluation and
    /// holding-period adjustment, rounded to two decimal places, before any
    /// Steuerfuss multiplier or share split.
    pub simple_tax: Decimal,

    pub canton_share: Decimal,
    pub commune_share: Decimal,
    pub church_tax_total: Decimal,
    pub church_tax_breakdown: BTreeMap<Confession, Decimal>,
    pub total_tax: Decimal,

    pub holding_months: i32,
    pub holding_years: i32,

    /// Per-bracket computation trace.
    pub brackets_applied: Vec<BracketStep>,

    /// Portion of the gain above the last bracket limit, taxed at the top
    /// rate (zero when the bracket table covered the whole gain).
    pub remainder_amount: Decimal,
    pub remainder_tax: Decimal,

    pub surcharge_rate: Option<Decimal>,
    pub discount_rate: Option<Decimal>,

    /// Degressive holding-period rate, for cantons that tax the whole gain
    /// at a single duration-dependent rate (AG).
    pub holding_period_rate: Option<Decimal>,

    /// Gain after a gain-reducing discount, for cantons that discount the
    /// taxable gain instead of the tax (BE).
    pub adjusted_gain: Option<Decimal>,

    pub simple_tax_before_adjustments: Decimal,
    pub effective_tax_rate_percent: Decimal,

    pub canton_multiplier_percent: Decimal,
    pub commune_multiplier_percent: Decimal,

    pub metadata: ResultMetadata,
}

impl TaxResult {
    /// An all-zero result for non-positive or below-minimum gains.
    pub fn zero(taxable_gain: Decimal, holding: HoldingPeriod, metadata: ResultMetadata) -> Self {
        Self {
            taxable_gain,
            simple_tax: Decimal::ZERO,
            canton_share: Decimal::ZERO,
            commune_share: Decimal::ZERO,
            church_tax_total: Decimal::ZERO,
            church_tax_breakdown: BTreeMap::new(),
            total_tax: Decimal::ZERO,
            holding_months: holding.months(),
            holding_years: holding.years(),
            brackets_applied: Vec::new(),
            remainder_amount: Decimal::ZERO,
            remainder_tax: Decimal::ZERO,
            surcharge_rate: None,
            discount_rate: None,
            holding_period_rate: None,
            adjusted_gain: None,
            simple_tax_before_adjustments: Decimal::ZERO,
            effective_tax_rate_percent: Decimal::ZERO,
            canton_multiplier_percent: Decimal::ZERO,
            commune_multiplier_percent: Decimal::ZERO,
            metadata,
        }
    }
}
