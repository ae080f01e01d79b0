//! Canton-specific engines.
//!
//! Tariff tables are embedded as `dec!` constants; values follow the
//! published cantonal tariffs. Each module documents the canton's deviation
//! from the canonical pipeline, if any.

mod aargau;
mod bern;
mod schaffhausen;
mod st_gallen;
mod zuerich;

pub use aargau::AargauEngine;
pub use bern::BernEngine;
pub use schaffhausen::SchaffhausenEngine;
pub use st_gallen::StGallenEngine;
pub use zuerich::ZuerichEngine;
