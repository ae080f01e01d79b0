use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Confession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxpayerType {
    Natural,
    Legal,
}

impl TaxpayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Legal => "legal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "natural" => Some(Self::Natural),
            "legal" => Some(Self::Legal),
            _ => None,
        }
    }
}

/// A single value-increasing investment in the property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub description: String,
    pub amount: Decimal,
    pub investment_date: Option<NaiveDate>,
}

/// Cross-canton input model for one Grundstückgewinnsteuer computation.
///
/// Inputs are a plain value object; every computation constructs its result
/// from a fresh `TaxInputs` and no state is carried between computations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInputs {
    /// Two-letter canton code (e.g. `SH`, `ZH`).
    pub canton: String,

    /// Commune name as listed in the canton's Steuerfuss data.
    pub commune: String,

    pub tax_year: i32,

    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,

    pub purchase_price: Decimal,
    pub sale_price: Decimal,

    /// Costs incurred when acquiring the property (notary, fees, ...).
    pub acquisition_costs: Decimal,

    /// Costs incurred by the sale itself (broker, advertising, ...).
    pub selling_costs: Decimal,

    /// Value-increasing investments, deductible from the gain.
    pub investments: Vec<Investment>,

    pub taxpayer_type: TaxpayerType,

    /// Number of owners per confession, for church-tax distribution.
    pub confessions: BTreeMap<Confession, u32>,
}

impl TaxInputs {
    /// Sum of all value-increasing investments.
    pub fn total_investments(&self) -> Decimal {
        self.investments.iter().map(|inv| inv.amount).sum()
    }

    /// Raw taxable gain before any canton-specific adjustment: sale price
    /// minus purchase price, acquisition costs, selling costs, and
    /// value-increasing investments. May be negative for a loss.
    pub fn taxable_gain(&self) -> Decimal {
        self.sale_price
            - self.purchase_price
            - self.acquisition_costs
            - self.selling_costs
            - self.total_investments()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn inputs() -> TaxInputs {
        TaxInputs {
            canton: "SH".to_string(),
            commune: "Schaffhausen".to_string(),
            tax_year: 2026,
            purchase_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            sale_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            purchase_price: dec!(400000),
            sale_price: dec!(500000),
            acquisition_costs: dec!(5000),
            selling_costs: dec!(10000),
            investments: vec![],
            taxpayer_type: TaxpayerType::Natural,
            confessions: BTreeMap::new(),
        }
    }

    #[test]
    fn taxable_gain_nets_out_prices_and_costs() {
        assert_eq!(inputs().taxable_gain(), dec!(85000));
    }

    #[test]
    fn taxable_gain_deducts_investments() {
        let mut i = inputs();
        i.investments = vec![
            Investment {
                description: "new roof".to_string(),
                amount: dec!(20000),
                investment_date: None,
            },
            Investment {
                description: "heating".to_string(),
                amount: dec!(15000),
                investment_date: None,
            },
        ];
        assert_eq!(i.total_investments(), dec!(35000));
        assert_eq!(i.taxable_gain(), dec!(50000));
    }

    #[test]
    fn taxable_gain_can_be_negative() {
        let mut i = inputs();
        i.sale_price = dec!(300000);
        assert_eq!(i.taxable_gain(), dec!(-115000));
    }

    #[test]
    fn taxpayer_type_round_trips() {
        assert_eq!(TaxpayerType::parse("natural"), Some(TaxpayerType::Natural));
        assert_eq!(TaxpayerType::parse("legal"), Some(TaxpayerType::Legal));
        assert_eq!(TaxpayerType::parse("other"), None);
        assert_eq!(TaxpayerType::Legal.as_str(), "legal");
    }
}
