//! Test-scoped ownership of doubles.
//!
//! A [`TestScope`] remembers every double created through it, so they can all
//! be verified together when the test ends. The `#[testkit_doubles::test]`
//! attribute creates one per test and finishes it after the body has run.
//!
//! ```rust
//! use testkit_doubles::mock::Contract;
//! use testkit_doubles::report::CollectingReporter;
//! use testkit_doubles::scope::TestScope;
//!
//! let scope = TestScope::new();
//! let double = scope.double(Contract::new("Dummy", ["a_method"]));
//! double.expect_once("a_method").unwrap();
//! double.call("a_method", vec![]).unwrap();
//!
//! assert!(scope.finish(&CollectingReporter::new()).passed());
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::mock::{Contract, Double, DoubleConfig};
use crate::report::{Report, Reporter};

/// Owns the doubles of one test.
///
/// Clones share the same set of doubles.
#[derive(Debug, Clone, Default)]
pub struct TestScope {
    doubles: Arc<Mutex<Vec<Double>>>,
}

impl TestScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a double for `contract` owned by this scope.
    #[must_use]
    pub fn double(&self, contract: impl Into<Arc<Contract>>) -> Double {
        self.adopt(Double::new(contract))
    }

    /// Create a configured double owned by this scope.
    #[must_use]
    pub fn double_with_config(
        &self,
        contract: impl Into<Arc<Contract>>,
        config: DoubleConfig,
    ) -> Double {
        self.adopt(Double::with_config(contract, config))
    }

    /// Take an existing double into this scope and hand it back.
    pub fn adopt(&self, double: Double) -> Double {
        self.doubles.lock().push(double.clone());
        double
    }

    /// Number of doubles owned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.doubles.lock().len()
    }

    /// Returns true if the scope owns no doubles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doubles.lock().is_empty()
    }

    /// Verify every double in creation order.
    ///
    /// Outcomes of all doubles go to `reporter` and are gathered into one
    /// [`Report`].
    pub fn finish(&self, reporter: &dyn Reporter) -> Report {
        let doubles = self.doubles.lock().clone();
        tracing::debug!(doubles = doubles.len(), "finishing test scope");

        let mut report = Report::new();
        for double in &doubles {
            report.extend(double.verify(reporter));
        }
        report
    }
}
