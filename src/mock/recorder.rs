//! Append-only log of calls made on a double.

use std::collections::HashMap;

use crate::value::Value;

/// A record of a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// The operation that was called.
    pub operation: String,
    /// The arguments passed to the call.
    pub args: Vec<Value>,
    /// 0-based count of earlier calls to the same operation.
    pub sequence: usize,
}

/// Records every call in arrival order.
///
/// Records are never changed or removed once appended. Each one is stamped
/// with its per-operation sequence number at the moment it is recorded.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::mock::CallRecorder;
/// use testkit_doubles::value::Value;
///
/// let mut recorder = CallRecorder::new();
/// assert_eq!(recorder.record_call("a_method", vec![]), 0);
/// assert_eq!(recorder.record_call("another_method", vec![]), 0);
/// assert_eq!(recorder.record_call("a_method", vec![Value::from(1)]), 1);
///
/// assert_eq!(recorder.count("a_method"), 2);
/// assert_eq!(recorder.args_at("a_method", 1), Some(&[Value::from(1)][..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    invocations: Vec<Invocation>,
    counts: HashMap<String, usize>,
}

impl CallRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call and return its sequence number.
    pub fn record_call(&mut self, operation: &str, args: Vec<Value>) -> usize {
        let count = self.counts.entry(operation.to_string()).or_insert(0);
        let sequence = *count;
        *count += 1;
        self.invocations.push(Invocation {
            operation: operation.to_string(),
            args,
            sequence,
        });
        sequence
    }

    /// Number of calls recorded for `operation`.
    #[must_use]
    pub fn count(&self, operation: &str) -> usize {
        self.counts.get(operation).copied().unwrap_or(0)
    }

    /// Arguments of call number `sequence` to `operation`, if it happened.
    #[must_use]
    pub fn args_at(&self, operation: &str, sequence: usize) -> Option<&[Value]> {
        self.invocations
            .iter()
            .find(|i| i.operation == operation && i.sequence == sequence)
            .map(|i| i.args.as_slice())
    }

    /// Calls to `operation` in order.
    pub fn calls_to<'a>(&'a self, operation: &'a str) -> impl Iterator<Item = &'a Invocation> {
        self.invocations
            .iter()
            .filter(move |invocation| invocation.operation == operation)
    }

    /// Every call in arrival order.
    #[must_use]
    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// Total number of calls across all operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    /// Returns true if nothing was called.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_numbers_are_per_operation() {
        let mut recorder = CallRecorder::new();
        assert_eq!(recorder.record_call("a", vec![]), 0);
        assert_eq!(recorder.record_call("b", vec![]), 0);
        assert_eq!(recorder.record_call("a", vec![]), 1);
        assert_eq!(recorder.record_call("a", vec![]), 2);

        assert_eq!(recorder.count("a"), 3);
        assert_eq!(recorder.count("b"), 1);
        assert_eq!(recorder.count("c"), 0);
        assert_eq!(recorder.len(), 4);
    }

    #[test]
    fn test_invocations_keep_arrival_order() {
        let mut recorder = CallRecorder::new();
        recorder.record_call("a", vec![Value::from(1)]);
        recorder.record_call("b", vec![Value::from(2)]);

        let order: Vec<_> = recorder
            .invocations()
            .iter()
            .map(|i| i.operation.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_args_at_missing_call_is_none() {
        let mut recorder = CallRecorder::new();
        recorder.record_call("a", vec![]);
        assert_eq!(recorder.args_at("a", 0), Some(&[][..]));
        assert_eq!(recorder.args_at("a", 1), None);
        assert_eq!(recorder.args_at("b", 0), None);
    }

    #[test]
    fn test_args_at_outlives_operation_name() {
        let mut recorder = CallRecorder::new();
        recorder.record_call("a", vec![Value::from(7)]);

        let args = {
            let operation = String::from("a");
            recorder.args_at(&operation, 0)
        };
        assert_eq!(args, Some(&[Value::from(7)][..]));
    }

    #[test]
    fn test_calls_to_filters_by_operation() {
        let mut recorder = CallRecorder::new();
        recorder.record_call("a", vec![Value::from(1)]);
        recorder.record_call("b", vec![]);
        recorder.record_call("a", vec![Value::from(2)]);

        let sequences: Vec<_> = recorder.calls_to("a").map(|i| i.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
        assert!(!recorder.is_empty());
    }
}
