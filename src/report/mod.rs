//! Verification results and the sinks that consume them.
//!
//! Verifying a double produces one [`Outcome`] per evaluated expectation.
//! Each outcome is pushed into a [`Reporter`] as it is produced, and the whole
//! batch is also returned as a [`Report`].
//!
//! Rendering outcomes is the reporter's business. Three are provided:
//!
//! - [`CollectingReporter`] - stores outcomes for later inspection
//! - [`PanicReporter`] - panics on the first failed outcome
//!
//! To fail once with every failure listed, finish into a [`Report`] and call
//! [`Report::assert_passed`].
//! - [`TracingReporter`] - logs every outcome through `tracing`

mod sinks;

use std::fmt;

use crate::value::Value;

pub use sinks::{CollectingReporter, PanicReporter, TracingReporter};

/// Sink for verification outcomes.
pub trait Reporter {
    /// Receive one evaluated expectation.
    fn report(&self, outcome: &Outcome);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, outcome: &Outcome) {
        (**self).report(outcome);
    }
}

/// The result of evaluating one expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Whether the expectation held.
    pub passed: bool,
    /// What was expected.
    pub expected: String,
    /// What actually happened.
    pub actual: String,
    /// Which double and operation this is about.
    pub label: String,
    /// Structured form of the same facts.
    pub detail: Detail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "pass" } else { "fail" };
        write!(
            f,
            "[{verdict}] {}: expected {}, got {}",
            self.label, self.expected, self.actual
        )
    }
}

/// Structured facts behind an [`Outcome`].
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    /// A call-count bound.
    CallCount {
        /// The operation.
        operation: String,
        /// Minimum number of calls.
        lower: usize,
        /// Maximum number of calls, `None` when unbounded.
        upper: Option<usize>,
        /// Number of calls recorded.
        actual: usize,
    },
    /// An argument pattern checked against one call.
    Arguments {
        /// The operation.
        operation: String,
        /// Invocation index of the call that was checked.
        sequence: usize,
        /// Description of the expected pattern.
        pattern: String,
        /// Recorded arguments, `None` when the call never happened.
        actual: Option<Vec<Value>>,
    },
}

/// All outcomes of one verification, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    outcomes: Vec<Outcome>,
}

impl Report {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome.
    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Append every outcome of another report.
    pub fn extend(&mut self, other: Report) {
        self.outcomes.extend(other.outcomes);
    }

    /// Returns true if every outcome passed. An empty report passes.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// All outcomes.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Number of outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if nothing was evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Panic listing every failure, if there is one.
    ///
    /// # Panics
    ///
    /// Panics if any outcome failed.
    pub fn assert_passed(&self) {
        if !self.passed() {
            let lines: Vec<_> = self.failures().map(ToString::to_string).collect();
            panic!(
                "{} of {} expectations failed:\n  {}",
                lines.len(),
                self.len(),
                lines.join("\n  ")
            );
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failures().count();
        write!(
            f,
            "{} passed, {} failed",
            self.outcomes.len() - failed,
            failed
        )?;
        for outcome in &self.outcomes {
            write!(f, "\n  {outcome}")?;
        }
        Ok(())
    }
}

impl IntoIterator for Report {
    type Item = Outcome;
    type IntoIter = std::vec::IntoIter<Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(passed: bool) -> Outcome {
        Outcome {
            passed,
            expected: "exactly 1 call".to_string(),
            actual: "2".to_string(),
            label: "Dummy::a_method".to_string(),
            detail: Detail::CallCount {
                operation: "a_method".to_string(),
                lower: 1,
                upper: Some(1),
                actual: 2,
            },
        }
    }

    #[test]
    fn test_empty_report_passes() {
        let report = Report::new();
        assert!(report.passed());
        assert!(report.is_empty());
        report.assert_passed();
    }

    #[test]
    fn test_failures() {
        let mut report = Report::new();
        report.push(outcome(true));
        report.push(outcome(false));
        assert!(!report.passed());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_display() {
        let mut report = Report::new();
        report.push(outcome(false));
        let text = report.to_string();
        assert!(text.starts_with("0 passed, 1 failed"));
        assert!(text.contains("[fail] Dummy::a_method: expected exactly 1 call, got 2"));
    }

    #[test]
    #[should_panic(expected = "1 of 1 expectations failed")]
    fn test_assert_passed_panics_on_failure() {
        let mut report = Report::new();
        report.push(outcome(false));
        report.assert_passed();
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut first = Report::new();
        first.push(outcome(true));
        let mut second = Report::new();
        second.push(outcome(false));
        first.extend(second);
        let passed: Vec<_> = first.outcomes().iter().map(|o| o.passed).collect();
        assert_eq!(passed, vec![true, false]);
    }
}
