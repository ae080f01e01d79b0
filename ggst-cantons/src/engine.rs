use ggst_core::{Confession, TaxInputs, TaxResult};
use thiserror::Error;

/// Errors that can occur when dispatching or running a canton computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CantonError {
    /// No engine is registered for the requested canton code.
    #[error("no engine registered for canton '{0}'")]
    UnknownCanton(String),

    /// The canton has no Steuerfuss data for this commune and tax year.
    #[error("no Steuerfuss data for commune '{commune}' in tax year {tax_year}")]
    UnknownCommune { commune: String, tax_year: i32 },
}

/// Interface every canton-specific engine implements.
///
/// Engines are pure: `compute` reads the inputs and the engine's own static
/// tariff tables and returns a fresh [`TaxResult`]. Implementations must be
/// `Send + Sync` so a registry can be shared across threads.
pub trait CantonEngine: Send + Sync {
    /// Two-letter canton code (e.g. `SH`).
    fn canton_code(&self) -> &'static str;

    /// Full canton name (e.g. `Schaffhausen`).
    fn canton_name(&self) -> &'static str;

    /// Commune names with Steuerfuss data for the given tax year.
    fn communes(&self, tax_year: i32) -> Vec<String>;

    /// Tax years for which tariff data is available.
    fn available_years(&self) -> Vec<i32>;

    /// Confession keys that participate in church tax for this canton.
    /// Empty when church tax is not part of the Grundstückgewinnsteuer.
    fn confessions(&self) -> Vec<Confession>;

    /// Runs the full computation for this canton.
    fn compute(&self, inputs: &TaxInputs) -> Result<TaxResult, CantonError>;
}
