// Allow must_use_candidate for expectation factory functions since returning the
// expectation without using it is the common pattern for test setup
#![allow(clippy::must_use_candidate)]

//! Predicates over single values and over argument lists.
//!
//! This module provides the matching vocabulary of the engine:
//!
//! - [`Expectation`] trait for custom predicates
//! - Built-in expectations: [`anything`], [`equal`], [`identical`],
//!   [`pattern`], [`instance_of`], [`member`], and friends
//! - Combinators: [`all_of`], [`any_of`], [`not`]
//! - [`Pattern`] and [`ParametersExpectation`] for whole argument lists
//!
//! # Example
//!
//! ```rust
//! use testkit_doubles::expectation::{equal, identical, instance_of, Expectation};
//! use testkit_doubles::value::{Object, Value};
//!
//! assert!(equal(1).matches(&Value::from(1.0)));
//! assert!(!identical(1).matches(&Value::from(1.0)));
//!
//! let dummy = Value::from(Object::new("Dummy"));
//! assert!(instance_of("Dummy").matches(&dummy));
//! ```

mod parameters;

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::Result;
use crate::value::{Shared, Value};

pub use parameters::{Arg, IntoPattern, ParametersExpectation, Pattern};

/// A predicate over one value.
///
/// # Implementing Custom Expectations
///
/// ```rust
/// use testkit_doubles::expectation::Expectation;
/// use testkit_doubles::value::Value;
///
/// struct IsEven;
///
/// impl Expectation for IsEven {
///     fn matches(&self, value: &Value) -> bool {
///         value.as_int().is_some_and(|i| i % 2 == 0)
///     }
///
///     fn describe(&self) -> String {
///         "is even".to_string()
///     }
/// }
///
/// assert!(IsEven.matches(&Value::from(4)));
/// assert!(!IsEven.matches(&Value::from(3)));
/// ```
pub trait Expectation: Send + Sync {
    /// Check if the value matches.
    fn matches(&self, value: &Value) -> bool;

    /// Describe what this expectation expects.
    fn describe(&self) -> String;

    /// Describe why a value didn't match.
    fn describe_mismatch(&self, value: &Value) -> String {
        format!("{} does not satisfy: {}", value.describe(), self.describe())
    }
}

/// Assert that a value satisfies an expectation.
///
/// # Panics
///
/// Panics with a descriptive message if the value doesn't match.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::{assert_that, expectation::equal, value::Value};
///
/// assert_that!(Value::from(42), equal(42));
/// ```
#[macro_export]
macro_rules! assert_that {
    ($value:expr, $expectation:expr) => {{
        let value = &$value;
        let expectation = &$expectation;
        if !$crate::expectation::Expectation::matches(expectation, value) {
            panic!(
                "assertion failed: {}\n  expected: {}\n  got: {}",
                $crate::expectation::Expectation::describe_mismatch(expectation, value),
                $crate::expectation::Expectation::describe(expectation),
                value.describe()
            );
        }
    }};
    ($value:expr, $expectation:expr, $($arg:tt)+) => {{
        let value = &$value;
        let expectation = &$expectation;
        if !$crate::expectation::Expectation::matches(expectation, value) {
            panic!(
                "assertion failed: {}\n  expected: {}\n  got: {}\n  message: {}",
                $crate::expectation::Expectation::describe_mismatch(expectation, value),
                $crate::expectation::Expectation::describe(expectation),
                value.describe(),
                format_args!($($arg)+)
            );
        }
    }};
}

// =============================================================================
// Built-in Expectations
// =============================================================================

/// Create an expectation that matches every value, including `Null`.
pub fn anything() -> Anything {
    Anything
}

/// Expectation that matches anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anything;

impl Expectation for Anything {
    fn matches(&self, _value: &Value) -> bool {
        true
    }

    fn describe(&self) -> String {
        "anything".to_string()
    }
}

/// Create a structural equality expectation.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::expectation::{Expectation, equal};
/// use testkit_doubles::value::Value;
///
/// let e = equal(2);
/// assert!(e.matches(&Value::from(2.0)));
/// assert!(!e.matches(&Value::from(3)));
/// ```
pub fn equal(expected: impl Into<Value>) -> Equal {
    Equal {
        expected: expected.into(),
    }
}

/// Expectation for structural equality.
#[derive(Debug, Clone)]
pub struct Equal {
    expected: Value,
}

impl Expectation for Equal {
    fn matches(&self, value: &Value) -> bool {
        value.is_equal(&self.expected)
    }

    fn describe(&self) -> String {
        format!("equals {}", self.expected.describe())
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        format!(
            "{} does not equal {}",
            value.describe(),
            self.expected.describe()
        )
    }
}

/// Create an expectation that fails on structural equality.
pub fn not_equal(unexpected: impl Into<Value>) -> NotEqual {
    NotEqual {
        unexpected: unexpected.into(),
    }
}

/// Expectation for structural inequality.
#[derive(Debug, Clone)]
pub struct NotEqual {
    unexpected: Value,
}

impl Expectation for NotEqual {
    fn matches(&self, value: &Value) -> bool {
        !value.is_equal(&self.unexpected)
    }

    fn describe(&self) -> String {
        format!("does not equal {}", self.unexpected.describe())
    }
}

/// Create a strict identity expectation.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::expectation::{Expectation, identical};
/// use testkit_doubles::value::Value;
///
/// let e = identical("0");
/// assert!(e.matches(&Value::from("0")));
/// assert!(!e.matches(&Value::from(0)));
/// ```
pub fn identical(expected: impl Into<Value>) -> Identical {
    Identical {
        expected: expected.into(),
    }
}

/// Expectation for strict identity.
#[derive(Debug, Clone)]
pub struct Identical {
    expected: Value,
}

impl Expectation for Identical {
    fn matches(&self, value: &Value) -> bool {
        value.is_identical(&self.expected)
    }

    fn describe(&self) -> String {
        format!(
            "identical to {} [{}]",
            self.expected.describe(),
            self.expected.type_name()
        )
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        format!(
            "{} [{}] is not identical to {} [{}]",
            value.describe(),
            value.type_name(),
            self.expected.describe(),
            self.expected.type_name()
        )
    }
}

/// Create an expectation that fails on strict identity.
pub fn not_identical(unexpected: impl Into<Value>) -> NotIdentical {
    NotIdentical {
        unexpected: unexpected.into(),
    }
}

/// Expectation for strict non-identity.
#[derive(Debug, Clone)]
pub struct NotIdentical {
    unexpected: Value,
}

impl Expectation for NotIdentical {
    fn matches(&self, value: &Value) -> bool {
        !value.is_identical(&self.unexpected)
    }

    fn describe(&self) -> String {
        format!("not identical to {}", self.unexpected.describe())
    }
}

/// Create an expectation that matches the stringified value against a
/// regular expression.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`](crate::Error::InvalidPattern) if the
/// regular expression does not compile.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::expectation::{Expectation, pattern};
/// use testkit_doubles::value::Value;
///
/// let e = pattern("(?i)hello").unwrap();
/// assert!(e.matches(&Value::from("Hello")));
/// assert!(!e.matches(&Value::from("Goodbye")));
/// ```
pub fn pattern(regex: &str) -> Result<PatternExpectation> {
    Ok(PatternExpectation {
        regex: Regex::new(regex)?,
    })
}

/// Expectation for a regular expression match on the stringified value.
#[derive(Debug, Clone)]
pub struct PatternExpectation {
    regex: Regex,
}

impl Expectation for PatternExpectation {
    fn matches(&self, value: &Value) -> bool {
        self.regex.is_match(&value.to_string())
    }

    fn describe(&self) -> String {
        format!("matches pattern /{}/", self.regex.as_str())
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        format!(
            "{} does not match pattern /{}/",
            value.describe(),
            self.regex.as_str()
        )
    }
}

/// Create an expectation that fails when the stringified value matches a
/// regular expression.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`](crate::Error::InvalidPattern) if the
/// regular expression does not compile.
pub fn no_pattern(regex: &str) -> Result<NoPattern> {
    Ok(NoPattern {
        regex: Regex::new(regex)?,
    })
}

/// Expectation that the stringified value does not match a regular expression.
#[derive(Debug, Clone)]
pub struct NoPattern {
    regex: Regex,
}

impl Expectation for NoPattern {
    fn matches(&self, value: &Value) -> bool {
        !self.regex.is_match(&value.to_string())
    }

    fn describe(&self) -> String {
        format!("does not match pattern /{}/", self.regex.as_str())
    }
}

/// Create a runtime type expectation.
///
/// See [`Value::is_instance_of`] for what counts as satisfying a type name.
pub fn instance_of(type_name: impl Into<String>) -> InstanceOf {
    InstanceOf {
        type_name: type_name.into(),
    }
}

/// Expectation for the runtime type of a value.
#[derive(Debug, Clone)]
pub struct InstanceOf {
    type_name: String,
}

impl Expectation for InstanceOf {
    fn matches(&self, value: &Value) -> bool {
        value.is_instance_of(&self.type_name)
    }

    fn describe(&self) -> String {
        format!("is a [{}]", self.type_name)
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        format!(
            "{} is a [{}], not a [{}]",
            value.describe(),
            value.type_name(),
            self.type_name
        )
    }
}

/// Create an expectation on a named field of an object.
///
/// A literal is compared by strict identity; an expectation is delegated to.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::expectation::{Expectation, member, instance_of};
/// use testkit_doubles::value::{Object, Value};
///
/// let tally = Value::from(Object::new("Tally").with_field("count", 2));
/// assert!(member("count", 2).matches(&tally));
/// assert!(member("count", instance_of("int")).matches(&tally));
/// assert!(!member("missing", 2).matches(&tally));
/// ```
pub fn member(field: impl Into<String>, expected: impl Into<Arg>) -> Member {
    Member {
        field: field.into(),
        expected: expected.into(),
    }
}

/// Expectation on a projected object field.
#[derive(Debug, Clone)]
pub struct Member {
    field: String,
    expected: Arg,
}

impl Expectation for Member {
    fn matches(&self, value: &Value) -> bool {
        value
            .field(&self.field)
            .is_some_and(|field| self.expected.matches(&field))
    }

    fn describe(&self) -> String {
        format!("member [{}] {}", self.field, self.expected.describe())
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        match value.field(&self.field) {
            Some(field) => format!(
                "member [{}] of {}: {}",
                self.field,
                value.describe(),
                self.expected.describe_mismatch(&field)
            ),
            None => format!("{} has no member [{}]", value.describe(), self.field),
        }
    }
}

/// Create an expectation for a number within `margin` of `expected`.
pub fn within_margin(expected: f64, margin: f64) -> WithinMargin {
    WithinMargin { expected, margin }
}

/// Expectation for approximate numeric equality.
#[derive(Debug, Clone, Copy)]
pub struct WithinMargin {
    expected: f64,
    margin: f64,
}

impl Expectation for WithinMargin {
    fn matches(&self, value: &Value) -> bool {
        value
            .as_float()
            .is_some_and(|x| (x - self.expected).abs() <= self.margin)
    }

    fn describe(&self) -> String {
        format!("within {} of {}", self.margin, self.expected)
    }
}

/// Create an expectation for one particular shared instance.
///
/// Unlike [`identical`], which compares contents, this only matches a handle
/// to the very same instance.
pub fn same_instance(shared: &Shared) -> SameInstance {
    SameInstance {
        shared: shared.clone(),
    }
}

/// Expectation for pointer identity of a shared value.
#[derive(Debug, Clone)]
pub struct SameInstance {
    shared: Shared,
}

impl Expectation for SameInstance {
    fn matches(&self, value: &Value) -> bool {
        value
            .as_shared()
            .is_some_and(|other| Shared::ptr_eq(&self.shared, other))
    }

    fn describe(&self) -> String {
        format!("same instance as {}", self.shared.get().describe())
    }
}

/// Create a predicate-based expectation.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::expectation::{Expectation, satisfies};
/// use testkit_doubles::value::Value;
///
/// let e = satisfies(|v| v.as_int().is_some_and(|i| i > 10), "is greater than 10");
/// assert!(e.matches(&Value::from(11)));
/// assert!(!e.matches(&Value::from(3)));
/// ```
pub fn satisfies<F>(predicate: F, description: &str) -> Predicate<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    Predicate {
        predicate,
        description: description.to_string(),
    }
}

/// Expectation based on a predicate function.
pub struct Predicate<F> {
    predicate: F,
    description: String,
}

impl<F: Fn(&Value) -> bool + Send + Sync> Expectation for Predicate<F> {
    fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Combinators
// =============================================================================

/// Create an expectation that matches when every inner expectation matches.
pub fn all_of(expectations: Vec<Arc<dyn Expectation>>) -> AllOf {
    AllOf { expectations }
}

/// Expectation that requires all inner expectations to match.
#[derive(Clone)]
pub struct AllOf {
    expectations: Vec<Arc<dyn Expectation>>,
}

impl Expectation for AllOf {
    fn matches(&self, value: &Value) -> bool {
        self.expectations.iter().all(|e| e.matches(value))
    }

    fn describe(&self) -> String {
        let descriptions: Vec<_> = self.expectations.iter().map(|e| e.describe()).collect();
        format!("all of [{}]", descriptions.join(", "))
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        let failures: Vec<_> = self
            .expectations
            .iter()
            .filter(|e| !e.matches(value))
            .map(|e| e.describe_mismatch(value))
            .collect();
        format!("failed: {}", failures.join("; "))
    }
}

/// Create an expectation that matches when any inner expectation matches.
pub fn any_of(expectations: Vec<Arc<dyn Expectation>>) -> AnyOf {
    AnyOf { expectations }
}

/// Expectation that requires at least one inner expectation to match.
#[derive(Clone)]
pub struct AnyOf {
    expectations: Vec<Arc<dyn Expectation>>,
}

impl Expectation for AnyOf {
    fn matches(&self, value: &Value) -> bool {
        self.expectations.iter().any(|e| e.matches(value))
    }

    fn describe(&self) -> String {
        let descriptions: Vec<_> = self.expectations.iter().map(|e| e.describe()).collect();
        format!("any of [{}]", descriptions.join(", "))
    }
}

/// Create an expectation that inverts another.
pub fn not<E: Expectation + 'static>(inner: E) -> Not {
    Not {
        inner: Arc::new(inner),
    }
}

/// Expectation that matches when its inner expectation does not.
#[derive(Clone)]
pub struct Not {
    inner: Arc<dyn Expectation>,
}

impl Expectation for Not {
    fn matches(&self, value: &Value) -> bool {
        !self.inner.matches(value)
    }

    fn describe(&self) -> String {
        format!("not ({})", self.inner.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn test_anything_matches_everything() {
        let e = anything();
        assert!(e.matches(&Value::from(33)));
        assert!(e.matches(&Value::from(false)));
        assert!(e.matches(&Value::Null));
    }

    #[test]
    fn test_equal_versus_identical() {
        assert!(equal(1).matches(&Value::from(1.0)));
        assert!(!identical(1).matches(&Value::from(1.0)));
        assert!(identical("0").matches(&Value::from("0")));
        assert!(!identical("0").matches(&Value::from(0)));
        assert!(not_equal(1).matches(&Value::from(2)));
        assert!(not_identical(1).matches(&Value::from(1.0)));
    }

    #[test]
    fn test_pattern_expectation() {
        let e = pattern("(?i)hello").unwrap();
        assert!(e.matches(&Value::from("hello")));
        assert!(e.matches(&Value::from("Hello")));
        assert!(!e.matches(&Value::from("Goodbye")));
        assert!(pattern("^4").unwrap().matches(&Value::from(42)));
        assert!(no_pattern("hello").unwrap().matches(&Value::from("Goodbye")));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(pattern("(unclosed").is_err());
    }

    #[test]
    fn test_instance_of_expectation() {
        let dummy = Value::from(Object::new("Dummy"));
        assert!(instance_of("Dummy").matches(&dummy));
        assert!(!instance_of("Other").matches(&dummy));
        assert!(!instance_of("Dummy").matches(&Value::Null));
    }

    #[test]
    fn test_member_expectation() {
        let object = Value::from(Object::new("Tally").with_field("count", 2));
        assert!(member("count", 2).matches(&object));
        assert!(!member("count", 3).matches(&object));
        assert!(member("count", equal(2.0)).matches(&object));
        assert!(!member("count", 2).matches(&Value::from(2)));
    }

    #[test]
    fn test_within_margin() {
        let e = within_margin(1.0, 0.1);
        assert!(e.matches(&Value::from(1.05)));
        assert!(e.matches(&Value::from(1)));
        assert!(!e.matches(&Value::from(1.2)));
        assert!(!e.matches(&Value::from("1.0")));
    }

    #[test]
    fn test_same_instance() {
        let shared = Shared::new(1);
        let e = same_instance(&shared);
        assert!(e.matches(&Value::from(shared.clone())));
        assert!(!e.matches(&Value::from(Shared::new(1))));
        assert!(!e.matches(&Value::from(1)));
    }

    #[test]
    fn test_combinators() {
        let between: AllOf = all_of(vec![
            Arc::new(satisfies(|v| v.as_int().is_some_and(|i| i > 0), "positive")),
            Arc::new(satisfies(|v| v.as_int().is_some_and(|i| i < 10), "below ten")),
        ]);
        assert!(between.matches(&Value::from(5)));
        assert!(!between.matches(&Value::from(15)));
        assert_eq!(between.describe(), "all of [positive, below ten]");

        let either = any_of(vec![Arc::new(identical(1)), Arc::new(identical("one"))]);
        assert!(either.matches(&Value::from("one")));
        assert!(!either.matches(&Value::from(2)));

        assert!(not(identical(0)).matches(&Value::from(1)));
    }

    #[test]
    fn test_describe_mismatch() {
        let mismatch = equal(42).describe_mismatch(&Value::from(0));
        assert_eq!(mismatch, "0 does not equal 42");

        let mismatch = identical("0").describe_mismatch(&Value::from(0));
        assert!(mismatch.contains("[int]"));
        assert!(mismatch.contains("[string]"));
    }

    #[test]
    fn test_assert_that_macro() {
        assert_that!(Value::from(42), equal(42));
        assert_that!(Value::from("hello"), pattern("ell").unwrap(), "greeting");
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_that_fails() {
        assert_that!(Value::from(1), identical(2));
    }
}
