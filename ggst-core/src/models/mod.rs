mod bracket_step;
mod confession;
mod holding_period;
mod tariff_schedule;
mod tax_inputs;
mod tax_result;

pub use bracket_step::BracketStep;
pub use confession::Confession;
pub use holding_period::HoldingPeriod;
pub use tariff_schedule::{Bracket, DiscountEntry, SurchargeEntry, TariffError, TariffSchedule};
pub use tax_inputs::{Investment, TaxInputs, TaxpayerType};
pub use tax_result::{ResultMetadata, TaxResult};
