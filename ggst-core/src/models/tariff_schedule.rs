use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One band of a progressive tariff table.
///
/// `limit` is the cumulative (absolute) gain threshold up to which `rate`
/// applies, not the width of the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub limit: Decimal,
    pub rate: Decimal,
}

/// Holding-period surcharge band: applies when total ownership months are at
/// most `max_months`. Tables are ordered ascending by `max_months` and the
/// first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeEntry {
    pub max_months: i32,
    pub rate: Decimal,
}

/// Holding-period discount band: applies when completed ownership years reach
/// `years`. Tables are ordered ascending by `years` and the highest
/// qualifying entry wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountEntry {
    pub years: i32,
    pub rate: Decimal,
}

/// Errors raised by [`TariffSchedule::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TariffError {
    /// Bracket limits must strictly increase.
    #[error("bracket limit {0} does not exceed the previous limit {1}")]
    NonAscendingBracketLimit(Decimal, Decimal),

    /// A bracket, surcharge, or discount rate is negative.
    #[error("negative rate {0} in tariff table")]
    NegativeRate(Decimal),

    /// Surcharge entries must be ordered ascending by `max_months`.
    #[error("surcharge entry for {0} months is out of order")]
    UnsortedSurchargeTable(i32),

    /// Discount entries must be ordered ascending by `years`.
    #[error("discount entry for {0} years is out of order")]
    UnsortedDiscountTable(i32),
}

/// A canton's complete tariff configuration for the progressive pipeline.
///
/// The evaluators in [`crate::calculations::tariff`] assume well-formed
/// tables and do not re-validate on every call; callers that assemble a
/// schedule from external data must run [`TariffSchedule::validate`] once at
/// load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffSchedule {
    /// Progressive brackets, ascending by limit. May be empty for cantons
    /// that use no bracket table.
    pub brackets: Vec<Bracket>,

    /// Flat rate applied to the portion of the gain above the last bracket
    /// limit. `None` means the excess stays untaxed (the table is already
    /// exhaustive).
    pub top_rate: Option<Decimal>,

    /// Surcharge bands for short ownership, ascending by `max_months`.
    pub surcharges: Vec<SurchargeEntry>,

    /// No surcharge applies at or above this many ownership months.
    pub surcharge_threshold_months: i32,

    /// Discount bands for long ownership, ascending by `years`.
    pub discounts: Vec<DiscountEntry>,

    /// No discount applies below this many completed ownership years.
    pub discount_min_years: i32,
}

impl TariffSchedule {
    /// Checks ordering and sign invariants of all tables.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError`] on the first violated invariant: non-ascending
    /// bracket limits, a negative rate anywhere, or an unsorted
    /// surcharge/discount table.
    pub fn validate(&self) -> Result<(), TariffError> {
        let mut prev_limit: Option<Decimal> = None;
        for bracket in &self.brackets {
            if bracket.rate < Decimal::ZERO {
                return Err(TariffError::NegativeRate(bracket.rate));
            }
            if let Some(prev) = prev_limit
                && bracket.limit <= prev
            {
                return Err(TariffError::NonAscendingBracketLimit(bracket.limit, prev));
            }
            prev_limit = Some(bracket.limit);
        }

        if let Some(top_rate) = self.top_rate
            && top_rate < Decimal::ZERO
        {
            return Err(TariffError::NegativeRate(top_rate));
        }

        let mut prev_months: Option<i32> = None;
        for entry in &self.surcharges {
            if entry.rate < Decimal::ZERO {
                return Err(TariffError::NegativeRate(entry.rate));
            }
            if let Some(prev) = prev_months
                && entry.max_months <= prev
            {
                return Err(TariffError::UnsortedSurchargeTable(entry.max_months));
            }
            prev_months = Some(entry.max_months);
        }

        let mut prev_years: Option<i32> = None;
        for entry in &self.discounts {
            if entry.rate < Decimal::ZERO {
                return Err(TariffError::NegativeRate(entry.rate));
            }
            if let Some(prev) = prev_years
                && entry.years <= prev
            {
                return Err(TariffError::UnsortedDiscountTable(entry.years));
            }
            prev_years = Some(entry.years);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn schedule() -> TariffSchedule {
        TariffSchedule {
            brackets: vec![
                Bracket { limit: dec!(2000), rate: dec!(0.02) },
                Bracket { limit: dec!(4000), rate: dec!(0.04) },
            ],
            top_rate: Some(dec!(0.15)),
            surcharges: vec![
                SurchargeEntry { max_months: 6, rate: dec!(0.50) },
                SurchargeEntry { max_months: 12, rate: dec!(0.45) },
            ],
            surcharge_threshold_months: 60,
            discounts: vec![
                DiscountEntry { years: 6, rate: dec!(0.05) },
                DiscountEntry { years: 10, rate: dec!(0.25) },
            ],
            discount_min_years: 6,
        }
    }

    #[test]
    fn valid_schedule_passes() {
        assert_eq!(schedule().validate(), Ok(()));
    }

    #[test]
    fn empty_tables_are_valid() {
        let empty = TariffSchedule {
            brackets: vec![],
            top_rate: None,
            surcharges: vec![],
            surcharge_threshold_months: 0,
            discounts: vec![],
            discount_min_years: 0,
        };
        assert_eq!(empty.validate(), Ok(()));
    }

    #[test]
    fn rejects_non_ascending_bracket_limits() {
        let mut s = schedule();
        s.brackets[1].limit = dec!(2000);
        assert_eq!(
            s.validate(),
            Err(TariffError::NonAscendingBracketLimit(dec!(2000), dec!(2000)))
        );
    }

    #[test]
    fn rejects_negative_bracket_rate() {
        let mut s = schedule();
        s.brackets[0].rate = dec!(-0.02);
        assert_eq!(s.validate(), Err(TariffError::NegativeRate(dec!(-0.02))));
    }

    #[test]
    fn rejects_negative_top_rate() {
        let mut s = schedule();
        s.top_rate = Some(dec!(-0.15));
        assert_eq!(s.validate(), Err(TariffError::NegativeRate(dec!(-0.15))));
    }

    #[test]
    fn rejects_unsorted_surcharge_table() {
        let mut s = schedule();
        s.surcharges.swap(0, 1);
        assert_eq!(s.validate(), Err(TariffError::UnsortedSurchargeTable(6)));
    }

    #[test]
    fn rejects_unsorted_discount_table() {
        let mut s = schedule();
        s.discounts.swap(0, 1);
        assert_eq!(s.validate(), Err(TariffError::UnsortedDiscountTable(6)));
    }
}
