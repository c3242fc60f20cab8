//! Call-count and call-order expectations, checked against a recording.
//!
//! Nothing here is evaluated while the double is being exercised. The tally
//! only collects what the test expects; [`Tally::verify`] later reads the
//! [`CallRecorder`] and emits one [`Outcome`] per check.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::expectation::{IntoPattern, ParametersExpectation};
use crate::report::{Detail, Outcome, Report, Reporter};
use crate::value::Value;

use super::{CallRecorder, Contract};

/// Bounds on how many times an operation may be called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallCountExpectation {
    /// The operation.
    pub operation: String,
    /// Minimum number of calls.
    pub lower: usize,
    /// Maximum number of calls, `None` when unbounded.
    pub upper: Option<usize>,
}

impl CallCountExpectation {
    /// Exactly `n` calls.
    pub fn exactly(operation: impl Into<String>, n: usize) -> Self {
        Self::between(operation, n, Some(n))
    }

    /// At least `n` calls.
    pub fn at_least(operation: impl Into<String>, n: usize) -> Self {
        Self::between(operation, n, None)
    }

    /// At most `n` calls.
    pub fn at_most(operation: impl Into<String>, n: usize) -> Self {
        Self::between(operation, 0, Some(n))
    }

    /// Between `lower` and `upper` calls inclusive.
    pub fn between(operation: impl Into<String>, lower: usize, upper: Option<usize>) -> Self {
        Self {
            operation: operation.into(),
            lower,
            upper,
        }
    }

    /// Returns true if `count` lies within the bounds.
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.lower && self.upper.map_or(true, |upper| count <= upper)
    }
}

impl fmt::Display for CallCountExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn calls(n: usize) -> &'static str {
            if n == 1 {
                "call"
            } else {
                "calls"
            }
        }
        match (self.lower, self.upper) {
            (0, Some(0)) => f.write_str("no calls"),
            (lower, Some(upper)) if lower == upper => {
                write!(f, "exactly {lower} {}", calls(lower))
            }
            (0, Some(upper)) => write!(f, "at most {upper} {}", calls(upper)),
            (lower, None) => write!(f, "at least {lower} {}", calls(lower)),
            (lower, Some(upper)) => write!(f, "between {lower} and {upper} calls"),
        }
    }
}

/// Arguments required of one particular call.
#[derive(Debug, Clone)]
pub struct SequencedArgsExpectation {
    /// The operation.
    pub operation: String,
    /// Invocation index of the call.
    pub index: usize,
    /// What the arguments must match.
    pub pattern: ParametersExpectation,
}

/// Arguments required of every call to an operation.
#[derive(Debug, Clone)]
pub struct ArgsExpectation {
    /// The operation.
    pub operation: String,
    /// What the arguments must match.
    pub pattern: ParametersExpectation,
}

#[derive(Debug, Clone)]
enum Entry {
    Count(CallCountExpectation),
    Sequenced(SequencedArgsExpectation),
    EveryCall(ArgsExpectation),
}

/// Collects expectations about how a double is called.
///
/// Every registration is checked against the contract straight away: naming
/// an operation the contract does not have is an
/// [`Error::UnknownOperation`](crate::Error::UnknownOperation), not a failed
/// expectation later on.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use testkit_doubles::mock::{CallRecorder, Contract, Tally};
/// use testkit_doubles::report::CollectingReporter;
///
/// let contract = Arc::new(Contract::new("Dummy", ["a_method"]));
/// let mut tally = Tally::new(contract);
/// tally.expect_maximum_call_count("a_method", 2).unwrap();
///
/// let mut recorder = CallRecorder::new();
/// for _ in 0..3 {
///     recorder.record_call("a_method", vec![]);
/// }
///
/// let report = tally.verify(&recorder, &CollectingReporter::new());
/// assert!(!report.passed());
/// assert_eq!(report.outcomes()[0].actual, "3");
/// ```
#[derive(Debug, Clone)]
pub struct Tally {
    contract: Arc<Contract>,
    label: String,
    entries: Vec<Entry>,
}

impl Tally {
    /// Create an empty tally for a contract, labelled with its name.
    #[must_use]
    pub fn new(contract: Arc<Contract>) -> Self {
        let label = contract.name().to_string();
        Self {
            contract,
            label,
            entries: Vec::new(),
        }
    }

    /// Use `label` instead of the contract name in outcome labels.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// The label used in outcomes.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Register a call-count expectation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperation`](crate::Error::UnknownOperation) if
    /// the operation is not in the contract.
    pub fn expect_call_count_between(&mut self, expectation: CallCountExpectation) -> Result<()> {
        self.contract.ensure(&expectation.operation)?;
        tracing::debug!(
            double = %self.label,
            operation = %expectation.operation,
            bound = %expectation,
            "expecting call count"
        );
        self.entries.push(Entry::Count(expectation));
        Ok(())
    }

    /// Expect exactly `n` calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract.
    pub fn expect_call_count(&mut self, operation: &str, n: usize) -> Result<()> {
        self.expect_call_count_between(CallCountExpectation::exactly(operation, n))
    }

    /// Expect exactly one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract.
    pub fn expect_once(&mut self, operation: &str) -> Result<()> {
        self.expect_call_count(operation, 1)
    }

    /// Expect no calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract.
    pub fn expect_never(&mut self, operation: &str) -> Result<()> {
        self.expect_call_count(operation, 0)
    }

    /// Expect one or more calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract.
    pub fn expect_at_least_once(&mut self, operation: &str) -> Result<()> {
        self.expect_minimum_call_count(operation, 1)
    }

    /// Expect `n` or more calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract.
    pub fn expect_minimum_call_count(&mut self, operation: &str, n: usize) -> Result<()> {
        self.expect_call_count_between(CallCountExpectation::at_least(operation, n))
    }

    /// Expect `n` or fewer calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract.
    pub fn expect_maximum_call_count(&mut self, operation: &str, n: usize) -> Result<()> {
        self.expect_call_count_between(CallCountExpectation::at_most(operation, n))
    }

    /// Expect the call with invocation index `index` to match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract or the
    /// pattern is malformed.
    pub fn expect_at(
        &mut self,
        index: usize,
        operation: &str,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.contract.ensure(operation)?;
        let pattern = ParametersExpectation::new(pattern.into_pattern()?);
        tracing::debug!(
            double = %self.label,
            operation,
            index,
            pattern = %pattern.pattern().describe(),
            "expecting arguments at call"
        );
        self.entries.push(Entry::Sequenced(SequencedArgsExpectation {
            operation: operation.to_string(),
            index,
            pattern,
        }));
        Ok(())
    }

    /// Expect every call to `operation` to match `pattern`.
    ///
    /// Calls that have their own [`expect_at`](Self::expect_at) expectation
    /// are checked against that one instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract or the
    /// pattern is malformed.
    pub fn expect(&mut self, operation: &str, pattern: impl IntoPattern) -> Result<()> {
        self.contract.ensure(operation)?;
        let pattern = ParametersExpectation::new(pattern.into_pattern()?);
        tracing::debug!(
            double = %self.label,
            operation,
            pattern = %pattern.pattern().describe(),
            "expecting arguments on every call"
        );
        self.entries.push(Entry::EveryCall(ArgsExpectation {
            operation: operation.to_string(),
            pattern,
        }));
        Ok(())
    }

    /// Expect exactly one call, made with arguments matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract or the
    /// pattern is malformed. Nothing is registered on error.
    pub fn expect_once_with(&mut self, operation: &str, pattern: impl IntoPattern) -> Result<()> {
        let pattern = pattern.into_pattern()?;
        self.expect_once(operation)?;
        self.expect(operation, pattern)
    }

    /// Expect one or more calls, each with arguments matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is not in the contract or the
    /// pattern is malformed. Nothing is registered on error.
    pub fn expect_at_least_once_with(
        &mut self,
        operation: &str,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        let pattern = pattern.into_pattern()?;
        self.expect_at_least_once(operation)?;
        self.expect(operation, pattern)
    }

    /// Number of registered expectations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is expected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every expectation against `recorder`, in registration order.
    ///
    /// Each outcome goes to `reporter` as soon as it is produced and is also
    /// collected into the returned [`Report`]. The recording is only read.
    pub fn verify(&self, recorder: &CallRecorder, reporter: &dyn Reporter) -> Report {
        let mut report = Report::new();
        let mut emit = |outcome: Outcome| {
            reporter.report(&outcome);
            report.push(outcome);
        };

        for entry in &self.entries {
            match entry {
                Entry::Count(expectation) => emit(self.check_count(expectation, recorder)),
                Entry::Sequenced(expectation) => emit(self.check_args(
                    &expectation.operation,
                    expectation.index,
                    &expectation.pattern,
                    recorder.args_at(&expectation.operation, expectation.index),
                )),
                Entry::EveryCall(expectation) => {
                    let calls = recorder.calls_to(&expectation.operation).filter(|invocation| {
                        !self.is_sequenced(&invocation.operation, invocation.sequence)
                    });
                    for invocation in calls {
                        emit(self.check_args(
                            &expectation.operation,
                            invocation.sequence,
                            &expectation.pattern,
                            Some(invocation.args.as_slice()),
                        ));
                    }
                }
            }
        }

        tracing::debug!(
            double = %self.label,
            outcomes = report.len(),
            failures = report.failures().count(),
            "verified"
        );
        report
    }

    fn is_sequenced(&self, operation: &str, index: usize) -> bool {
        self.entries.iter().any(|entry| {
            matches!(entry, Entry::Sequenced(e) if e.operation == operation && e.index == index)
        })
    }

    fn check_count(&self, expectation: &CallCountExpectation, recorder: &CallRecorder) -> Outcome {
        let actual = recorder.count(&expectation.operation);
        Outcome {
            passed: expectation.accepts(actual),
            expected: expectation.to_string(),
            actual: actual.to_string(),
            label: format!("{}::{} call count", self.label, expectation.operation),
            detail: Detail::CallCount {
                operation: expectation.operation.clone(),
                lower: expectation.lower,
                upper: expectation.upper,
                actual,
            },
        }
    }

    fn check_args(
        &self,
        operation: &str,
        sequence: usize,
        pattern: &ParametersExpectation,
        args: Option<&[Value]>,
    ) -> Outcome {
        let passed = args.is_some_and(|args| pattern.test(args));
        let actual = match args {
            Some(args) if passed => describe_args(args),
            Some(args) => format!(
                "{} ({})",
                describe_args(args),
                pattern.describe_mismatch(args)
            ),
            None => format!("no call #{sequence}"),
        };
        Outcome {
            passed,
            expected: pattern.pattern().describe(),
            actual,
            label: format!("{}::{operation} call #{sequence} arguments", self.label),
            detail: Detail::Arguments {
                operation: operation.to_string(),
                sequence,
                pattern: pattern.pattern().describe(),
                actual: args.map(<[Value]>::to_vec),
            },
        }
    }
}

fn describe_args(args: &[Value]) -> String {
    let parts: Vec<_> = args.iter().map(Value::describe).collect();
    format!("[{}]", parts.join(", "))
}
