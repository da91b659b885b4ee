//! Calculator factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::calculator::{Algorithm, Calculator, FibCalculator, FibError};

/// Factory trait for creating calculators.
pub trait CalculatorFactory: Send + Sync {
    /// Get or create a calculator by name.
    fn get(&self, name: &str) -> Result<Arc<dyn Calculator>, FibError>;

    /// List all available calculator names, sorted.
    fn available(&self) -> Vec<&'static str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    cache: RwLock<HashMap<Algorithm, Arc<dyn Calculator>>>,
}

impl DefaultFactory {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorFactory for DefaultFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn Calculator>, FibError> {
        let algorithm: Algorithm = name.parse()?;

        if let Some(calc) = self.cache.read().get(&algorithm) {
            return Ok(Arc::clone(calc));
        }

        let mut cache = self.cache.write();
        let calc = cache
            .entry(algorithm)
            .or_insert_with(|| Arc::new(FibCalculator::new(algorithm)));
        Ok(Arc::clone(calc))
    }

    fn available(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = Algorithm::ALL.iter().map(|a| a.key()).collect();
        names.sort_unstable();
        names
    }
}
