use std::sync::Arc;

use parking_lot::Mutex;

use super::{Outcome, Reporter};

/// A reporter that stores every outcome it receives.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    outcomes: Arc<Mutex<Vec<Outcome>>>,
}

impl CollectingReporter {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    #[must_use]
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.lock().clone()
    }

    /// Outcomes that failed.
    #[must_use]
    pub fn failures(&self) -> Vec<Outcome> {
        self.outcomes
            .lock()
            .iter()
            .filter(|o| !o.passed)
            .cloned()
            .collect()
    }

    /// Number of outcomes received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.lock().len()
    }

    /// Returns true if nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.lock().is_empty()
    }

    /// Forget everything received.
    pub fn clear(&self) {
        self.outcomes.lock().clear();
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, outcome: &Outcome) {
        self.outcomes.lock().push(outcome.clone());
    }
}

/// A reporter that fails the running test on the first failed outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn report(&self, outcome: &Outcome) {
        if !outcome.passed {
            panic!(
                "expectation failed: {}\n  expected: {}\n  got: {}",
                outcome.label, outcome.expected, outcome.actual
            );
        }
    }
}

/// A reporter that logs outcomes: passes at `debug`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, outcome: &Outcome) {
        if outcome.passed {
            tracing::debug!(
                label = %outcome.label,
                expected = %outcome.expected,
                actual = %outcome.actual,
                "expectation passed"
            );
        } else {
            tracing::warn!(
                label = %outcome.label,
                expected = %outcome.expected,
                actual = %outcome.actual,
                "expectation failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Detail;

    fn outcome(passed: bool) -> Outcome {
        Outcome {
            passed,
            expected: "[1, 2, 3]".to_string(),
            actual: "[1, 2]".to_string(),
            label: "Dummy::a_method call #0".to_string(),
            detail: Detail::Arguments {
                operation: "a_method".to_string(),
                sequence: 0,
                pattern: "[1, 2, 3]".to_string(),
                actual: None,
            },
        }
    }

    #[test]
    fn test_collecting_reporter_shares_storage() {
        let reporter = CollectingReporter::new();
        let clone = reporter.clone();
        clone.report(&outcome(true));
        clone.report(&outcome(false));

        assert_eq!(reporter.len(), 2);
        assert_eq!(reporter.failures().len(), 1);

        reporter.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn test_panic_reporter_ignores_passes() {
        PanicReporter.report(&outcome(true));
    }

    #[test]
    #[should_panic(expected = "expectation failed: Dummy::a_method call #0")]
    fn test_panic_reporter_panics_on_failure() {
        PanicReporter.report(&outcome(false));
    }

    #[test]
    fn test_tracing_reporter_does_not_panic() {
        TracingReporter.report(&outcome(true));
        TracingReporter.report(&outcome(false));
    }
}
