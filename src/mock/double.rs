//! The test double: a configurable stand-in for a [`Contract`].
//!
//! A [`Double`] ties the other pieces of this module together. Scripted
//! responses live in a [`CallSchedule`], every call lands in a
//! [`CallRecorder`], and expectations are collected by a [`Tally`] until
//! [`Double::verify`] is called.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::expectation::{IntoPattern, Pattern};
use crate::report::{Report, Reporter};
use crate::value::{Shared, Value};

use super::{
    Action, CallRecorder, CallSchedule, Contract, Fault, Invocation, Severity, Tally, Warning,
    When,
};

/// Configuration for a [`Double`].
#[derive(Debug, Clone)]
pub struct DoubleConfig {
    /// Name used in outcome labels. Defaults to the contract name.
    pub label: Option<String>,
    /// Emit scripted warnings through `tracing` as well as recording them.
    pub log_warnings: bool,
}

impl Default for DoubleConfig {
    fn default() -> Self {
        Self {
            label: None,
            log_warnings: true,
        }
    }
}

impl DoubleConfig {
    /// Create a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label used in outcome labels.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Record scripted warnings without logging them.
    #[must_use]
    pub fn quiet_warnings(mut self) -> Self {
        self.log_warnings = false;
        self
    }
}

#[derive(Debug)]
struct State {
    schedule: CallSchedule,
    recorder: CallRecorder,
    tally: Tally,
    warnings: Vec<Warning>,
    verified: bool,
}

#[derive(Debug)]
struct Inner {
    contract: Arc<Contract>,
    label: String,
    config: DoubleConfig,
    state: Mutex<State>,
}

/// A scriptable, recording stand-in for a [`Contract`].
///
/// Cloning a `Double` gives another handle to the same double, so it can be
/// stored inside a hand-written implementation of the trait under test and
/// still be configured and verified from the test body.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::args;
/// use testkit_doubles::mock::{Contract, Double};
/// use testkit_doubles::report::CollectingReporter;
/// use testkit_doubles::value::Value;
///
/// let double = Double::new(Contract::new("Dummy", ["a_method"]));
/// double.returns_by_value("a_method", "one", args![1]).unwrap();
/// double.returns_by_value("a_method", "any", ()).unwrap();
/// double.expect_once("a_method").unwrap();
///
/// assert_eq!(double.call("a_method", vec![Value::from(1)]).unwrap(), Value::from("one"));
///
/// let report = double.verify(&CollectingReporter::new());
/// assert!(report.passed());
/// ```
#[derive(Debug, Clone)]
pub struct Double {
    inner: Arc<Inner>,
}

impl Double {
    /// Create a double with the default configuration.
    #[must_use]
    pub fn new(contract: impl Into<Arc<Contract>>) -> Self {
        Self::with_config(contract, DoubleConfig::default())
    }

    /// Create a double with an explicit configuration.
    #[must_use]
    pub fn with_config(contract: impl Into<Arc<Contract>>, config: DoubleConfig) -> Self {
        let contract = contract.into();
        let label = config
            .label
            .clone()
            .unwrap_or_else(|| contract.name().to_string());
        let tally = Tally::new(Arc::clone(&contract)).with_label(label.clone());
        Self {
            inner: Arc::new(Inner {
                contract,
                label,
                config,
                state: Mutex::new(State {
                    schedule: CallSchedule::new(),
                    recorder: CallRecorder::new(),
                    tally,
                    warnings: Vec::new(),
                    verified: false,
                }),
            }),
        }
    }

    /// The contract this double stands in for.
    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.inner.contract
    }

    /// The name used in outcome labels.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// The configuration the double was built with.
    #[must_use]
    pub fn config(&self) -> &DoubleConfig {
        &self.inner.config
    }

    /// Call `operation` with `args`.
    ///
    /// The call is recorded first, then answered by the first matching
    /// scripted action. With no action configured, a real handler on the
    /// contract runs if there is one, otherwise the call returns
    /// [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownOperation`] if the contract has no such operation;
    ///   nothing is recorded in that case
    /// - [`Error::Thrown`] if the matching action throws
    /// - whatever a real handler returns
    pub fn call(&self, operation: &str, args: Vec<Value>) -> Result<Value> {
        self.inner.contract.ensure(operation)?;

        let (sequence, action) = {
            let mut state = self.inner.state.lock();
            let sequence = state.recorder.record_call(operation, args.clone());
            let action = state.schedule.respond(sequence, operation, &args).cloned();
            (sequence, action)
        };

        tracing::trace!(
            double = %self.inner.label,
            operation,
            sequence,
            action = action.as_ref().map_or("none", Action::kind),
            "dispatching call"
        );

        match action {
            Some(Action::ReturnValue(value)) => Ok(value.deep_copy()),
            Some(Action::ReturnShared(shared)) => Ok(Value::Shared(shared)),
            Some(Action::ThrowError(fault)) => Err(Error::Thrown(fault)),
            Some(Action::EmitWarning { message, severity }) => {
                let warning = Warning {
                    operation: operation.to_string(),
                    sequence,
                    message,
                    severity,
                };
                if self.inner.config.log_warnings {
                    tracing::warn!(double = %self.inner.label, "{warning}");
                }
                self.inner.state.lock().warnings.push(warning);
                Ok(Value::Null)
            }
            None => match self.inner.contract.handler(operation) {
                Some(handler) => handler(args.as_slice()),
                None => Ok(Value::Null),
            },
        }
    }

    /// Start configuring a response for `operation`.
    ///
    /// ```rust
    /// use testkit_doubles::args;
    /// use testkit_doubles::mock::{Contract, Double};
    /// use testkit_doubles::value::Value;
    ///
    /// let double = Double::new(Contract::new("Dummy", ["a_method"]));
    /// double.when("a_method").at(1).with(args![]).returns_by_value(2).unwrap();
    /// double.when("a_method").returns_by_value(1).unwrap();
    ///
    /// assert_eq!(double.call("a_method", vec![]).unwrap(), Value::from(1));
    /// assert_eq!(double.call("a_method", vec![]).unwrap(), Value::from(2));
    /// assert_eq!(double.call("a_method", vec![]).unwrap(), Value::from(1));
    /// ```
    #[must_use]
    pub fn when(&self, operation: impl Into<String>) -> Stub<'_> {
        Stub {
            double: self,
            operation: operation.into(),
            when: When::Always,
            pattern: Ok(Pattern::MatchAll),
        }
    }

    /// Register `action` for every call to `operation` matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn register(&self, operation: &str, pattern: impl IntoPattern, action: Action) -> Result<()> {
        self.register_when(When::Always, operation, pattern, action)
    }

    /// Register `action` for call number `index` to `operation` when it
    /// matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn register_at(
        &self,
        index: usize,
        operation: &str,
        pattern: impl IntoPattern,
        action: Action,
    ) -> Result<()> {
        self.register_when(When::At(index), operation, pattern, action)
    }

    /// Register `action` with an explicit [`When`].
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed. Nothing is registered on error.
    pub fn register_when(
        &self,
        when: When,
        operation: &str,
        pattern: impl IntoPattern,
        action: Action,
    ) -> Result<()> {
        self.inner.contract.ensure(operation)?;
        let pattern = pattern.into_pattern()?;
        tracing::debug!(
            double = %self.inner.label,
            operation,
            %when,
            pattern = %pattern.describe(),
            action = action.kind(),
            "registered action"
        );
        self.inner
            .state
            .lock()
            .schedule
            .register_when(when, operation, pattern, action);
        Ok(())
    }

    /// Return a copy of `value` whenever `pattern` matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn returns_by_value(
        &self,
        operation: &str,
        value: impl Into<Value>,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register(operation, pattern, Action::by_value(value))
    }

    /// Return a copy of `value` on call number `index` when `pattern` matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn returns_by_value_at(
        &self,
        index: usize,
        operation: &str,
        value: impl Into<Value>,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register_at(index, operation, pattern, Action::by_value(value))
    }

    /// Return the same `shared` instance whenever `pattern` matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn returns_shared(
        &self,
        operation: &str,
        shared: &Shared,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register(operation, pattern, Action::shared(shared.clone()))
    }

    /// Return the same `shared` instance on call number `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn returns_shared_at(
        &self,
        index: usize,
        operation: &str,
        shared: &Shared,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register_at(index, operation, pattern, Action::shared(shared.clone()))
    }

    /// Return `value` by handle: shared values are handed out as the same
    /// instance, anything else is copied.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn returns(
        &self,
        operation: &str,
        value: impl Into<Value>,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register(operation, pattern, Action::returns(value))
    }

    /// Like [`returns`](Self::returns), for call number `index` only.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn returns_at(
        &self,
        index: usize,
        operation: &str,
        value: impl Into<Value>,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register_at(index, operation, pattern, Action::returns(value))
    }

    /// Fail matching calls with `fault`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn throws_error(
        &self,
        operation: &str,
        fault: impl Into<Fault>,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register(operation, pattern, Action::throw(fault))
    }

    /// Fail call number `index` with `fault` when it matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn throws_error_at(
        &self,
        index: usize,
        operation: &str,
        fault: impl Into<Fault>,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register_at(index, operation, pattern, Action::throw(fault))
    }

    /// Emit a warning on matching calls, which then return [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn throws_warning(
        &self,
        operation: &str,
        message: impl Into<String>,
        severity: Severity,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register(operation, pattern, Action::warn(message, severity))
    }

    /// Emit a warning on call number `index` when it matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn throws_warning_at(
        &self,
        index: usize,
        operation: &str,
        message: impl Into<String>,
        severity: Severity,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        self.register_at(index, operation, pattern, Action::warn(message, severity))
    }

    /// Fail every call to `operation`, with `fault` or a generic one.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn throw_on(&self, operation: &str, fault: Option<Fault>) -> Result<()> {
        let fault = fault.unwrap_or_else(|| Fault::for_operation(operation));
        self.throws_error(operation, fault, Pattern::MatchAll)
    }

    /// Fail call number `index` to `operation`, with `fault` or a generic one.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn throw_at(&self, index: usize, operation: &str, fault: Option<Fault>) -> Result<()> {
        let fault = fault.unwrap_or_else(|| Fault::for_operation(operation));
        self.throws_error_at(index, operation, fault, Pattern::MatchAll)
    }

    /// Warn on every call to `operation`. Severity defaults to
    /// [`Severity::Warning`].
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn error_on(
        &self,
        operation: &str,
        message: impl Into<String>,
        severity: Option<Severity>,
    ) -> Result<()> {
        self.throws_warning(operation, message, severity.unwrap_or_default(), Pattern::MatchAll)
    }

    /// Warn on call number `index` to `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn error_at(
        &self,
        index: usize,
        operation: &str,
        message: impl Into<String>,
        severity: Option<Severity>,
    ) -> Result<()> {
        self.throws_warning_at(
            index,
            operation,
            message,
            severity.unwrap_or_default(),
            Pattern::MatchAll,
        )
    }

    /// Expect exactly `n` calls to `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn expect_call_count(&self, operation: &str, n: usize) -> Result<()> {
        self.with_tally(|tally| tally.expect_call_count(operation, n))
    }

    /// Expect exactly one call to `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn expect_once(&self, operation: &str) -> Result<()> {
        self.with_tally(|tally| tally.expect_once(operation))
    }

    /// Expect no calls to `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn expect_never(&self, operation: &str) -> Result<()> {
        self.with_tally(|tally| tally.expect_never(operation))
    }

    /// Expect one or more calls to `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn expect_at_least_once(&self, operation: &str) -> Result<()> {
        self.with_tally(|tally| tally.expect_at_least_once(operation))
    }

    /// Expect `n` or more calls to `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn expect_minimum_call_count(&self, operation: &str, n: usize) -> Result<()> {
        self.with_tally(|tally| tally.expect_minimum_call_count(operation, n))
    }

    /// Expect `n` or fewer calls to `operation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown.
    pub fn expect_maximum_call_count(&self, operation: &str, n: usize) -> Result<()> {
        self.with_tally(|tally| tally.expect_maximum_call_count(operation, n))
    }

    /// Expect call number `index` to `operation` to match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn expect_at(&self, index: usize, operation: &str, pattern: impl IntoPattern) -> Result<()> {
        let pattern = pattern.into_pattern()?;
        self.with_tally(|tally| tally.expect_at(index, operation, pattern))
    }

    /// Expect every call to `operation` to match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn expect(&self, operation: &str, pattern: impl IntoPattern) -> Result<()> {
        let pattern = pattern.into_pattern()?;
        self.with_tally(|tally| tally.expect(operation, pattern))
    }

    /// Expect exactly one call to `operation`, matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn expect_once_with(&self, operation: &str, pattern: impl IntoPattern) -> Result<()> {
        let pattern = pattern.into_pattern()?;
        self.with_tally(|tally| tally.expect_once_with(operation, pattern))
    }

    /// Expect one or more calls to `operation`, each matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn expect_at_least_once_with(
        &self,
        operation: &str,
        pattern: impl IntoPattern,
    ) -> Result<()> {
        let pattern = pattern.into_pattern()?;
        self.with_tally(|tally| tally.expect_at_least_once_with(operation, pattern))
    }

    /// Evaluate every expectation against the calls made so far.
    ///
    /// Outcomes go to `reporter` and are returned as a [`Report`]. The
    /// recording is left untouched, so verifying twice gives the same
    /// answer; a second verification is logged at `warn` level since it
    /// usually means a double was verified both by hand and at teardown.
    pub fn verify(&self, reporter: &dyn Reporter) -> Report {
        let (tally, recorder) = {
            let mut state = self.inner.state.lock();
            if state.verified {
                tracing::warn!(double = %self.inner.label, "double verified more than once");
            }
            state.verified = true;
            (state.tally.clone(), state.recorder.clone())
        };
        tally.verify(&recorder, reporter)
    }

    /// Warnings emitted so far, oldest first.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.inner.state.lock().warnings.clone()
    }

    /// Number of calls made to `operation`.
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        self.inner.state.lock().recorder.count(operation)
    }

    /// Every call made so far, in arrival order.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner.state.lock().recorder.invocations().to_vec()
    }

    /// Arguments of call number `index` to `operation`, if it happened.
    #[must_use]
    pub fn args_at(&self, operation: &str, index: usize) -> Option<Vec<Value>> {
        self.inner
            .state
            .lock()
            .recorder
            .args_at(operation, index)
            .map(<[Value]>::to_vec)
    }

    fn with_tally<R>(&self, f: impl FnOnce(&mut Tally) -> R) -> R {
        f(&mut self.inner.state.lock().tally)
    }
}

/// A response being configured through [`Double::when`].
///
/// Defaults to every call with any arguments. A malformed pattern given to
/// [`with`](Self::with) is reported by the terminal method.
#[must_use = "a stub does nothing until a response is chosen"]
pub struct Stub<'a> {
    double: &'a Double,
    operation: String,
    when: When,
    pattern: Result<Pattern>,
}

impl Stub<'_> {
    /// Only match calls whose arguments match `pattern`.
    pub fn with(mut self, pattern: impl IntoPattern) -> Self {
        self.pattern = pattern.into_pattern();
        self
    }

    /// Only apply to call number `index`.
    pub fn at(mut self, index: usize) -> Self {
        self.when = When::At(index);
        self
    }

    /// Finish with an explicit action.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is unknown or the pattern is
    /// malformed.
    pub fn then(self, action: Action) -> Result<()> {
        let pattern = self.pattern?;
        self.double
            .register_when(self.when, &self.operation, pattern, action)
    }

    /// Return a copy of `value`.
    ///
    /// # Errors
    ///
    /// See [`then`](Self::then).
    pub fn returns_by_value(self, value: impl Into<Value>) -> Result<()> {
        self.then(Action::by_value(value))
    }

    /// Return the same `shared` instance.
    ///
    /// # Errors
    ///
    /// See [`then`](Self::then).
    pub fn returns_shared(self, shared: &Shared) -> Result<()> {
        self.then(Action::shared(shared.clone()))
    }

    /// Return `value` by handle.
    ///
    /// # Errors
    ///
    /// See [`then`](Self::then).
    pub fn returns(self, value: impl Into<Value>) -> Result<()> {
        self.then(Action::returns(value))
    }

    /// Fail with `fault`.
    ///
    /// # Errors
    ///
    /// See [`then`](Self::then).
    pub fn throws_error(self, fault: impl Into<Fault>) -> Result<()> {
        self.then(Action::throw(fault))
    }

    /// Emit a warning.
    ///
    /// # Errors
    ///
    /// See [`then`](Self::then).
    pub fn throws_warning(self, message: impl Into<String>, severity: Severity) -> Result<()> {
        self.then(Action::warn(message, severity))
    }
}

/// Build a `Vec<Value>` argument list.
///
/// ```rust
/// use testkit_doubles::values;
/// use testkit_doubles::value::Value;
///
/// assert_eq!(values![1, "a"], vec![Value::from(1), Value::from("a")]);
/// ```
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::value::Value::from($value)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::report::CollectingReporter;

    fn dummy() -> Double {
        Double::new(Contract::new("Dummy", ["a_method", "another_method"]))
    }

    #[test]
    fn test_unconfigured_call_returns_null() {
        let double = dummy();
        assert_eq!(double.call("a_method", vec![]).unwrap(), Value::Null);
        assert_eq!(double.call_count("a_method"), 1);
    }

    #[test]
    fn test_unknown_operation_is_not_recorded() {
        let double = dummy();
        let err = double.call("a_missing_method", vec![]).unwrap_err();
        assert!(matches!(err, Error::UnknownOperation { .. }));
        assert!(double.invocations().is_empty());
    }

    #[test]
    fn test_registration_rejects_unknown_operation() {
        let double = dummy();
        assert!(double
            .returns_by_value("a_missing_method", 1, ())
            .unwrap_err()
            .is_configuration());
        assert!(double.expect_once("a_missing_method").is_err());
    }

    #[test]
    fn test_by_value_returns_fresh_copies() {
        let double = dummy();
        let shared = Shared::new(1);
        double.returns_by_value("a_method", shared.clone(), ()).unwrap();

        let first = double.call("a_method", vec![]).unwrap();
        let second = double.call("a_method", vec![]).unwrap();
        let first_handle = first.as_shared().unwrap();
        let second_handle = second.as_shared().unwrap();
        assert!(first.is_equal(&second));
        assert!(!Shared::ptr_eq(first_handle, second_handle));
        assert!(!Shared::ptr_eq(first_handle, &shared));

        shared.set(2);
        assert_eq!(first_handle.get(), Value::from(1));
    }

    #[test]
    fn test_shared_returns_same_instance() {
        let double = dummy();
        let shared = Shared::new(1);
        double.returns_shared("a_method", &shared, ()).unwrap();

        let first = double.call("a_method", vec![]).unwrap();
        let second = double.call("a_method", vec![]).unwrap();
        assert!(Shared::ptr_eq(first.as_shared().unwrap(), second.as_shared().unwrap()));
        assert!(Shared::ptr_eq(first.as_shared().unwrap(), &shared));
    }

    #[test]
    fn test_returns_picks_mode_from_value() {
        let double = dummy();
        let shared = Shared::new("s");
        double.returns("a_method", shared.clone(), ()).unwrap();
        double.returns("another_method", "copy", ()).unwrap();

        let value = double.call("a_method", vec![]).unwrap();
        assert!(Shared::ptr_eq(value.as_shared().unwrap(), &shared));
        assert_eq!(double.call("another_method", vec![]).unwrap(), Value::from("copy"));
    }

    #[test]
    fn test_thrown_fault_is_still_recorded() {
        let double = dummy();
        double.throw_on("a_method", None).unwrap();

        let err = double.call("a_method", vec![]).unwrap_err();
        assert_eq!(err.to_string(), "Scripted failure from `a_method`");
        assert_eq!(double.call_count("a_method"), 1);
    }

    #[test]
    fn test_warning_continues_with_null() {
        let double = Double::with_config(
            Contract::new("Dummy", ["a_method"]),
            DoubleConfig::new().quiet_warnings(),
        );
        double.error_at(1, "a_method", "Ouch!", None).unwrap();

        assert_eq!(double.call("a_method", vec![]).unwrap(), Value::Null);
        assert_eq!(double.call("a_method", vec![]).unwrap(), Value::Null);
        let warnings = double.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].sequence, 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_stub_builder() {
        let double = dummy();
        double
            .when("a_method")
            .with(args![1])
            .returns_by_value("one")
            .unwrap();
        double.when("a_method").at(0).returns_by_value("first").unwrap();

        assert_eq!(double.call("a_method", values![1]).unwrap(), Value::from("first"));
        assert_eq!(double.call("a_method", values![1]).unwrap(), Value::from("one"));
        assert_eq!(double.call("a_method", values![2]).unwrap(), Value::Null);
    }

    #[test]
    fn test_stub_reports_malformed_pattern() {
        let double = dummy();
        let err = double
            .when("a_method")
            .with(Value::from(5))
            .returns_by_value(1)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedPattern(_)));
    }

    #[test]
    fn test_partial_double_delegates_to_handler() {
        let contract = Contract::new("Dummy", ["a_method"])
            .with_handler("real", |args| Ok(Value::from(args.len())));
        let double = Double::new(contract);
        double.returns_by_value_at(0, "real", "mocked", ()).unwrap();

        assert_eq!(double.call("real", values![1, 2]).unwrap(), Value::from("mocked"));
        assert_eq!(double.call("real", values![1, 2]).unwrap(), Value::from(2));
    }

    #[test]
    fn test_handler_may_call_back_into_double() {
        let slot: Arc<Mutex<Option<Double>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let contract = Contract::new("Dummy", ["a_method"]).with_handler("outer", move |_| {
            let double = inner.lock().clone();
            match double {
                Some(double) => double.call("a_method", vec![]),
                None => Ok(Value::Null),
            }
        });
        let double = Double::new(contract);
        double.returns_by_value("a_method", 7, ()).unwrap();
        *slot.lock() = Some(double.clone());

        assert_eq!(double.call("outer", vec![]).unwrap(), Value::from(7));
        assert_eq!(double.call_count("a_method"), 1);
        *slot.lock() = None;
    }

    #[test]
    fn test_verify_uses_label() {
        let double = Double::with_config(
            Contract::new("Dummy", ["a_method"]),
            DoubleConfig::new().label("MockDummy"),
        );
        double.expect_once("a_method").unwrap();
        let report = double.verify(&CollectingReporter::new());
        assert!(!report.passed());
        assert_eq!(report.outcomes()[0].label, "MockDummy::a_method call count");
        assert_eq!(double.label(), "MockDummy");
    }

    #[test]
    fn test_verify_twice_gives_same_report() {
        let double = dummy();
        double.expect_once("a_method").unwrap();
        double.call("a_method", vec![]).unwrap();
        let reporter = CollectingReporter::new();
        assert_eq!(double.verify(&reporter), double.verify(&reporter));
        assert_eq!(reporter.len(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let double = dummy();
        let clone = double.clone();
        clone.call("a_method", values!["x"]).unwrap();
        assert_eq!(double.args_at("a_method", 0), Some(values!["x"]));
        assert_eq!(double.args_at("a_method", 1), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = DoubleConfig::default();
        assert!(config.log_warnings);
        assert_eq!(config.label, None);
    }
}
