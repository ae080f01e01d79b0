use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ownership duration between purchase and sale, counted in whole months.
///
/// The count is `(year(sale) - year(purchase)) * 12 + (month(sale) -
/// month(purchase))`; the day of month is deliberately ignored. This is the
/// month difference the reference calculators use, and every surcharge and
/// discount band selection depends on this exact definition — it must not be
/// replaced with a calendar-accurate elapsed-days computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingPeriod {
    months: i32,
}

impl HoldingPeriod {
    /// Computes the holding period from purchase and sale dates.
    pub fn between(purchase: NaiveDate, sale: NaiveDate) -> Self {
        let months = (sale.year() - purchase.year()) * 12
            + (sale.month() as i32 - purchase.month() as i32);
        Self { months }
    }

    pub fn from_months(months: i32) -> Self {
        Self { months }
    }

    /// Total ownership months.
    pub fn months(&self) -> i32 {
        self.months
    }

    /// Completed ownership years (integer floor division by 12).
    pub fn years(&self) -> i32 {
        self.months / 12
    }
}
