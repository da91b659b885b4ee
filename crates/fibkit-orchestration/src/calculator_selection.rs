//! Calculator selection logic.

use std::sync::Arc;

use fibkit_core::calculator::{Calculator, FibError};
use fibkit_core::registry::CalculatorFactory;

/// Get calculators to run based on algorithm selection.
///
/// `"all"` (any case) selects every registered calculator in sorted name
/// order; anything else must name a single calculator.
pub fn get_calculators_to_run(
    algo: &str,
    factory: &dyn CalculatorFactory,
) -> Result<Vec<Arc<dyn Calculator>>, FibError> {
    if algo.trim().eq_ignore_ascii_case("all") {
        factory
            .available()
            .into_iter()
            .map(|name| factory.get(name))
            .collect()
    } else {
        Ok(vec![factory.get(algo)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibkit_core::registry::DefaultFactory;

    #[test]
    fn select_all() {
        let factory = DefaultFactory::new();
        let calcs = get_calculators_to_run("ALL", &factory).unwrap();
        let names: Vec<_> = calcs.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["FastDoubling", "MatrixExponentiation"]);
    }

    #[test]
    fn select_single() {
        let factory = DefaultFactory::new();
        let calcs = get_calculators_to_run("matrix", &factory).unwrap();
        assert_eq!(calcs.len(), 1);
        assert_eq!(calcs[0].name(), "MatrixExponentiation");
    }

    #[test]
    fn select_unknown() {
        let factory = DefaultFactory::new();
        let result = get_calculators_to_run("unknown", &factory);
        assert!(matches!(result, Err(FibError::Config(_))));
    }
}
