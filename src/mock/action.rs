//! Scripted behaviours a double performs for a matching call.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::value::{Shared, Value};

/// What a double does when a registration matches a call.
#[derive(Debug, Clone)]
pub enum Action {
    /// Return a fresh copy of the value on every call.
    ReturnValue(Value),
    /// Return the same shared instance on every call.
    ReturnShared(Shared),
    /// Fail the call with this fault.
    ThrowError(Fault),
    /// Emit a warning and let the call carry on.
    EmitWarning {
        /// Warning text.
        message: String,
        /// How loud the warning is.
        severity: Severity,
    },
}

impl Action {
    /// Return `value` by copy.
    pub fn by_value(value: impl Into<Value>) -> Self {
        Self::ReturnValue(value.into())
    }

    /// Return `shared` by handle.
    #[must_use]
    pub fn shared(shared: Shared) -> Self {
        Self::ReturnShared(shared)
    }

    /// Return a value the way its kind suggests: a [`Value::Shared`] is handed
    /// out as the same instance, anything else is copied.
    pub fn returns(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Shared(shared) => Self::ReturnShared(shared),
            other => Self::ReturnValue(other),
        }
    }

    /// Fail with `fault`.
    pub fn throw(fault: impl Into<Fault>) -> Self {
        Self::ThrowError(fault.into())
    }

    /// Emit a warning.
    pub fn warn(message: impl Into<String>, severity: Severity) -> Self {
        Self::EmitWarning {
            message: message.into(),
            severity,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReturnValue(_) => "return_value",
            Self::ReturnShared(_) => "return_shared",
            Self::ThrowError(_) => "throw_error",
            Self::EmitWarning { .. } => "emit_warning",
        }
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ReturnValue(a), Self::ReturnValue(b)) => a.is_identical(b),
            (Self::ReturnShared(a), Self::ReturnShared(b)) => Shared::ptr_eq(a, b),
            (Self::ThrowError(a), Self::ThrowError(b)) => a == b,
            (
                Self::EmitWarning {
                    message: m1,
                    severity: s1,
                },
                Self::EmitWarning {
                    message: m2,
                    severity: s2,
                },
            ) => m1 == m2 && s1 == s2,
            _ => false,
        }
    }
}

/// An error a double has been scripted to raise.
///
/// Wraps any `std::error::Error`, so a hand-written implementation of a
/// trait can recover the original type with [`Fault::downcast_ref`] and
/// return it through its own error channel.
#[derive(Clone)]
pub struct Fault {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl Fault {
    /// Create a fault carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Message(message.into())),
        }
    }

    /// Wrap an existing error.
    pub fn from_error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// The fault used when none is given.
    #[must_use]
    pub fn for_operation(operation: &str) -> Self {
        Self::new(format!("Scripted failure from `{operation}`"))
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    /// Recover the wrapped error type.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fault").field(&self.inner).finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for Fault {}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.message() == other.message()
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

/// Severity of a scripted warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// Informational.
    Notice,
    /// Something the caller should look at.
    #[default]
    Warning,
    /// Use of something slated for removal.
    Deprecated,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notice => f.write_str("notice"),
            Self::Warning => f.write_str("warning"),
            Self::Deprecated => f.write_str("deprecated"),
        }
    }
}

/// A warning emitted by a double during a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Operation whose call emitted the warning.
    pub operation: String,
    /// Invocation index of that call.
    pub sequence: usize,
    /// Warning text.
    pub message: String,
    /// Warning severity.
    pub severity: Severity,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from `{}` call #{}: {}",
            self.severity, self.operation, self.sequence, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ouch;

    impl fmt::Display for Ouch {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Ouch")
        }
    }

    impl StdError for Ouch {}

    #[test]
    fn test_returns_picks_semantics_from_value() {
        let shared = Shared::new(5);
        assert_eq!(
            Action::returns(shared.clone()),
            Action::ReturnShared(shared)
        );
        assert_eq!(Action::returns(5), Action::ReturnValue(Value::from(5)));
    }

    #[test]
    fn test_fault_downcast() {
        let fault = Fault::from_error(Ouch);
        assert_eq!(fault.downcast_ref::<Ouch>(), Some(&Ouch));
        assert_eq!(fault.message(), "Ouch");

        let plain = Fault::new("plain");
        assert!(plain.downcast_ref::<Ouch>().is_none());
    }

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::by_value("1, 2"), Action::by_value("1, 2"));
        assert_ne!(Action::by_value("1, 2"), Action::by_value("1, 3"));
        assert_ne!(Action::shared(Shared::new(1)), Action::shared(Shared::new(1)));
        assert_eq!(Action::throw("Ouch"), Action::throw(Fault::from_error(Ouch)));
        assert_eq!(
            Action::warn("Ouch", Severity::Warning),
            Action::warn("Ouch", Severity::Warning)
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning {
            operation: "a_method".to_string(),
            sequence: 2,
            message: "Ouch!".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(warning.to_string(), "warning from `a_method` call #2: Ouch!");
    }
}
