//! Argument-list patterns.

use std::fmt;
use std::sync::Arc;

use super::{anything, Expectation};
use crate::error::{Error, Result};
use crate::value::{Object, Shared, Value};

/// One position of a [`Pattern`].
///
/// A literal is compared by strict identity, so `"0"` and `0` never match
/// each other. An expectation decides for itself.
#[derive(Clone)]
pub enum Arg {
    /// A literal value compared with [`Value::is_identical`].
    Literal(Value),
    /// An expectation consulted with [`Expectation::matches`].
    Expect(Arc<dyn Expectation>),
}

impl Arg {
    /// Wrap an expectation.
    pub fn expect(expectation: impl Expectation + 'static) -> Self {
        Self::Expect(Arc::new(expectation))
    }

    /// Check one argument against this position.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Literal(expected) => value.is_identical(expected),
            Self::Expect(expectation) => expectation.matches(value),
        }
    }

    /// Describe this position for reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(expected) => expected.describe(),
            Self::Expect(expectation) => expectation.describe(),
        }
    }

    /// Describe why `value` does not fit this position.
    #[must_use]
    pub fn describe_mismatch(&self, value: &Value) -> String {
        match self {
            Self::Literal(expected) => format!(
                "{} is not identical to {}",
                value.describe(),
                expected.describe()
            ),
            Self::Expect(expectation) => expectation.describe_mismatch(value),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Expect(expectation) => f
                .debug_tuple("Expect")
                .field(&expectation.describe())
                .finish(),
        }
    }
}

impl<E: Expectation + 'static> From<E> for Arg {
    fn from(expectation: E) -> Self {
        Self::expect(expectation)
    }
}

macro_rules! impl_literal_arg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Self::Literal(Value::from(value))
                }
            }
        )*
    };
}

impl_literal_arg!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    &str,
    String,
    Object,
    Shared
);

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

/// Build a [`Pattern`] from literals and expectations.
///
/// Each element goes through [`Arg::from`]: plain values become strict
/// literals, expectations are kept as they are. `args![]` is the pattern for
/// a call with no arguments.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::args;
/// use testkit_doubles::expectation::anything;
/// use testkit_doubles::value::Value;
///
/// let pattern = args!["0", 0, anything(), false];
/// assert!(pattern.matches(&[Value::from("0"), Value::from(0), Value::from(37), Value::from(false)]));
/// assert!(!pattern.matches(&[Value::from("0"), Value::from(0), Value::from(37)]));
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        $crate::expectation::Pattern::Args(::std::vec![$($crate::expectation::Arg::from($arg)),*])
    };
}

/// A call signature: the arguments a registration or expectation accepts.
#[derive(Clone, Debug, Default)]
pub enum Pattern {
    /// Any argument list of any length, including none.
    #[default]
    MatchAll,
    /// Exactly these positions, in order.
    Args(Vec<Arg>),
}

impl Pattern {
    /// The match-all sentinel.
    #[must_use]
    pub fn any() -> Self {
        Self::MatchAll
    }

    /// The pattern of a call with no arguments.
    #[must_use]
    pub fn none() -> Self {
        Self::Args(Vec::new())
    }

    /// Build a pattern from anything convertible to [`Arg`].
    pub fn args<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        Self::Args(args.into_iter().map(Into::into).collect())
    }

    /// Build a pattern of literals where the string `"*"` stands for
    /// [`anything`].
    ///
    /// ```rust
    /// use testkit_doubles::expectation::Pattern;
    /// use testkit_doubles::value::Value;
    ///
    /// let p = Pattern::wildcards(vec![Value::from("*"), Value::from(123), Value::from("*")]);
    /// assert!(p.matches(&[Value::from(100), Value::from(123), Value::from(101)]));
    /// ```
    pub fn wildcards<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Args(
            values
                .into_iter()
                .map(|v| match v.into() {
                    Value::Str(s) if s == "*" => Arg::from(anything()),
                    other => Arg::Literal(other),
                })
                .collect(),
        )
    }

    /// Returns true for the match-all sentinel.
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::MatchAll)
    }

    /// Number of positions, or `None` for the match-all sentinel.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::MatchAll => None,
            Self::Args(args) => Some(args.len()),
        }
    }

    /// Check an argument list.
    ///
    /// Lengths must be equal. A missing trailing argument is a plain
    /// non-match.
    #[must_use]
    pub fn matches(&self, args: &[Value]) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Args(expected) => {
                expected.len() == args.len()
                    && expected.iter().zip(args).all(|(e, a)| e.matches(a))
            }
        }
    }

    /// Describe the pattern for reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::MatchAll => "any arguments".to_string(),
            Self::Args(args) => {
                let parts: Vec<_> = args.iter().map(Arg::describe).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

impl From<Vec<Arg>> for Pattern {
    fn from(args: Vec<Arg>) -> Self {
        Self::Args(args)
    }
}

impl From<Vec<Value>> for Pattern {
    fn from(values: Vec<Value>) -> Self {
        Self::Args(values.into_iter().map(Arg::Literal).collect())
    }
}

/// `()` is shorthand for the match-all sentinel.
impl From<()> for Pattern {
    fn from((): ()) -> Self {
        Self::MatchAll
    }
}

/// Dynamic patterns: `Null` is the match-all sentinel, a `List` is a literal
/// argument list, anything else is malformed.
impl TryFrom<Value> for Pattern {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::MatchAll),
            Value::List(items) => Ok(Self::from(items)),
            other => Err(Error::malformed_pattern(format!(
                "{} [{}]",
                other.describe(),
                other.type_name()
            ))),
        }
    }
}

/// Anything that can become a [`Pattern`], possibly failing.
///
/// Implemented for [`Pattern`] itself, for lists of [`Arg`] or [`Value`], and
/// for a dynamic [`Value`] (where a non-list is a
/// [`MalformedPattern`](Error::MalformedPattern) error).
pub trait IntoPattern {
    /// Convert into a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not describe an argument list.
    fn into_pattern(self) -> Result<Pattern>;
}

impl<P> IntoPattern for P
where
    P: TryInto<Pattern>,
    Error: From<P::Error>,
{
    fn into_pattern(self) -> Result<Pattern> {
        self.try_into().map_err(Error::from)
    }
}

/// A composite predicate over a whole argument list.
#[derive(Clone, Debug, Default)]
pub struct ParametersExpectation {
    pattern: Pattern,
}

impl ParametersExpectation {
    /// Create a parameters expectation from a pattern.
    pub fn new(pattern: impl Into<Pattern>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Check an argument list against the pattern.
    #[must_use]
    pub fn test(&self, args: &[Value]) -> bool {
        self.pattern.matches(args)
    }

    /// The underlying pattern.
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Describe why `args` fail the pattern, position by position.
    #[must_use]
    pub fn describe_mismatch(&self, args: &[Value]) -> String {
        let Pattern::Args(expected) = &self.pattern else {
            return "matches any arguments".to_string();
        };
        if expected.len() != args.len() {
            return format!(
                "expected {} arguments {} but got {}",
                expected.len(),
                self.pattern.describe(),
                args.len()
            );
        }
        let failures: Vec<_> = expected
            .iter()
            .zip(args)
            .enumerate()
            .filter(|(_, (e, a))| !e.matches(a))
            .map(|(i, (e, a))| format!("parameter {}: {}", i + 1, e.describe_mismatch(a)))
            .collect();
        failures.join("; ")
    }
}

impl From<Pattern> for ParametersExpectation {
    fn from(pattern: Pattern) -> Self {
        Self { pattern }
    }
}

impl Expectation for ParametersExpectation {
    fn matches(&self, value: &Value) -> bool {
        value.as_list().is_some_and(|args| self.test(args))
    }

    fn describe(&self) -> String {
        format!("parameters {}", self.pattern.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectation::{instance_of, pattern};

    fn v<T: Into<Value>>(value: T) -> Value {
        value.into()
    }

    #[test]
    fn test_empty_match() {
        let e = ParametersExpectation::new(args![]);
        assert!(e.test(&[]));
        assert!(!e.test(&[v(33)]));
    }

    #[test]
    fn test_single_match() {
        let e = ParametersExpectation::new(args![0]);
        assert!(!e.test(&[v(1)]));
        assert!(e.test(&[v(0)]));
    }

    #[test]
    fn test_any_match() {
        let e = ParametersExpectation::new(Pattern::MatchAll);
        assert!(e.test(&[]));
        assert!(e.test(&[v(1), v(2)]));
    }

    #[test]
    fn test_missing_parameter() {
        let e = ParametersExpectation::new(args![0]);
        assert!(!e.test(&[]));
    }

    #[test]
    fn test_null_parameter() {
        let e = ParametersExpectation::new(args![Value::Null]);
        assert!(e.test(&[Value::Null]));
        assert!(!e.test(&[]));
    }

    #[test]
    fn test_anything_expectations() {
        let e = ParametersExpectation::new(args![anything()]);
        assert!(!e.test(&[]));
        assert!(e.test(&[Value::Null]));
        assert!(e.test(&[v(13)]));
    }

    #[test]
    fn test_other_expectations() {
        let e = ParametersExpectation::new(args![pattern("(?i)hello").unwrap()]);
        assert!(!e.test(&[v("Goodbye")]));
        assert!(e.test(&[v("hello")]));
        assert!(e.test(&[v("Hello")]));
    }

    #[test]
    fn test_identity_only() {
        let e = ParametersExpectation::new(args!["0"]);
        assert!(!e.test(&[v(0)]));
        assert!(e.test(&[v("0")]));
    }

    #[test]
    fn test_long_list() {
        let e = ParametersExpectation::new(args!["0", 0, anything(), false]);
        assert!(e.test(&[v("0"), v(0), v(37), v(false)]));
        assert!(!e.test(&[v("0"), v(0), v(37), v(true)]));
        assert!(!e.test(&[v("0"), v(0), v(37)]));
    }

    #[test]
    fn test_wildcards_become_anything() {
        let p = Pattern::wildcards(vec![v("*"), v(123), v("*")]);
        assert!(p.matches(&[v(100), v(123), v(101)]));
        assert!(!p.matches(&[v(100), v(124), v(101)]));
        assert_eq!(p.describe(), "[anything, 123, anything]");
    }

    #[test]
    fn test_value_patterns() {
        assert!(Pattern::try_from(Value::Null).unwrap().is_match_all());
        let p = Pattern::try_from(v(vec![1, 2])).unwrap();
        assert_eq!(p.len(), Some(2));
        let err = Pattern::try_from(v("foo")).unwrap_err();
        assert!(matches!(err, Error::MalformedPattern(_)));
    }

    #[test]
    fn test_into_pattern_accepts_static_and_dynamic_forms() {
        assert!(Pattern::MatchAll.into_pattern().unwrap().is_match_all());
        assert_eq!(vec![v(1)].into_pattern().unwrap().len(), Some(1));
        assert_eq!(v(vec![1, 2]).into_pattern().unwrap().len(), Some(2));
        assert!(v(3).into_pattern().is_err());
    }

    #[test]
    fn test_describe_mismatch_names_position() {
        let e = ParametersExpectation::new(args![1, instance_of("string")]);
        let mismatch = e.describe_mismatch(&[v(1), v(2)]);
        assert!(mismatch.starts_with("parameter 2:"));
        let mismatch = e.describe_mismatch(&[v(1)]);
        assert!(mismatch.contains("expected 2 arguments"));
    }

    #[test]
    fn test_as_value_expectation() {
        let e = ParametersExpectation::new(args![1, 2]);
        assert!(e.matches(&v(vec![1, 2])));
        assert!(!e.matches(&v(1)));
    }
}
