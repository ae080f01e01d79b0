use std::collections::BTreeMap;

use ggst_core::{TaxInputs, TaxResult};

use crate::cantons::{
    AargauEngine, BernEngine, SchaffhausenEngine, StGallenEngine, ZuerichEngine,
};
use crate::engine::{CantonEngine, CantonError};

/// Lookup from canton code to engine, constructed once at startup.
///
/// The registry is an ordinary owned value with no interior mutability; build
/// it once and pass it by reference to whatever needs canton dispatch. Since
/// every engine is pure, a shared registry can serve any number of threads
/// concurrently.
pub struct CantonRegistry {
    engines: BTreeMap<&'static str, Box<dyn CantonEngine>>,
}

impl CantonRegistry {
    /// Builds the registry with all implemented canton engines.
    pub fn new() -> Self {
        let engines: Vec<Box<dyn CantonEngine>> = vec![
            Box::new(AargauEngine::new()),
            Box::new(BernEngine::new()),
            Box::new(SchaffhausenEngine::new()),
            Box::new(StGallenEngine::new()),
            Box::new(ZuerichEngine::new()),
        ];
        Self {
            engines: engines
                .into_iter()
                .map(|engine| (engine.canton_code(), engine))
                .collect(),
        }
    }

    /// Looks up the engine for a canton code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CantonError::UnknownCanton`] when no engine is registered
    /// for the code.
    pub fn engine(&self, canton_code: &str) -> Result<&dyn CantonEngine, CantonError> {
        let code = canton_code.to_ascii_uppercase();
        self.engines
            .get(code.as_str())
            .map(|engine| engine.as_ref())
            .ok_or(CantonError::UnknownCanton(code))
    }

    /// Dispatches a computation to the engine named by `inputs.canton`.
    pub fn compute(&self, inputs: &TaxInputs) -> Result<TaxResult, CantonError> {
        self.engine(&inputs.canton)?.compute(inputs)
    }

    /// Sorted list of registered canton codes.
    pub fn available_cantons(&self) -> Vec<&'static str> {
        self.engines.keys().copied().collect()
    }
}

impl Default for CantonRegistry {
    fn default() -> Self {
        Self::new()
    }
}
