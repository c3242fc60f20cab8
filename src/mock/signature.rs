//! Ordered (pattern → action) registry.
//!
//! Lookups are first-match, not best-match: a broad pattern registered early
//! shadows any narrower pattern registered after it. Register specific
//! signatures first and catch-alls last.

use crate::expectation::{ParametersExpectation, Pattern};
use crate::value::Value;

use super::Action;

/// Append-only list of signatures and what to do when each one matches.
///
/// Generic over the stored action so the matching rules can be reused for
/// anything keyed by call signature.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::args;
/// use testkit_doubles::expectation::Pattern;
/// use testkit_doubles::mock::SignatureMap;
/// use testkit_doubles::value::Value;
///
/// let mut map = SignatureMap::new();
/// map.add(args![1], "one");
/// map.add(Pattern::MatchAll, "default");
///
/// assert_eq!(map.find_first_action(&[Value::from(1)]), Some(&"one"));
/// assert_eq!(map.find_first_action(&[Value::from(2)]), Some(&"default"));
/// ```
#[derive(Debug, Clone)]
pub struct SignatureMap<A = Action> {
    entries: Vec<(ParametersExpectation, A)>,
}

impl<A> SignatureMap<A> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a registration. Earlier registrations are never replaced.
    pub fn add(&mut self, pattern: impl Into<Pattern>, action: A) {
        self.entries
            .push((ParametersExpectation::new(pattern.into()), action));
    }

    /// The action of the first registration whose pattern accepts `args`.
    #[must_use]
    pub fn find_first_action(&self, args: &[Value]) -> Option<&A> {
        self.entries
            .iter()
            .find(|(signature, _)| signature.test(args))
            .map(|(_, action)| action)
    }

    /// Returns true if any registration accepts `args`.
    #[must_use]
    pub fn is_match(&self, args: &[Value]) -> bool {
        self.find_first_action(args).is_some()
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registrations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, &A)> {
        self.entries
            .iter()
            .map(|(signature, action)| (signature.pattern(), action))
    }
}

impl<A> Default for SignatureMap<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::expectation::anything;

    fn v<T: Into<Value>>(value: T) -> Value {
        value.into()
    }

    #[test]
    fn test_empty() {
        let map: SignatureMap = SignatureMap::new();
        assert!(!map.is_match(&[]));
        assert!(map.find_first_action(&[]).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_different_call_signatures_can_have_different_actions() {
        let mut map = SignatureMap::new();
        map.add(args![0], "Fred");
        map.add(args!["0"], "jim");
        assert_eq!(map.find_first_action(&[v(0)]), Some(&"Fred"));
        assert_eq!(map.find_first_action(&[v("0")]), Some(&"jim"));
    }

    #[test]
    fn test_wildcard() {
        let mut map = SignatureMap::new();
        map.add(args![anything(), 1, 3], "Fred");
        assert!(map.is_match(&[v(2), v(1), v(3)]));
        assert_eq!(map.find_first_action(&[v(2), v(1), v(3)]), Some(&"Fred"));
    }

    #[test]
    fn test_all_wildcard() {
        let mut map = SignatureMap::new();
        assert!(!map.is_match(&[v(2), v(1), v(3)]));
        map.add(Pattern::MatchAll, "Fred");
        assert!(map.is_match(&[v(2), v(1), v(3)]));
        assert_eq!(map.find_first_action(&[v(2), v(1), v(3)]), Some(&"Fred"));
    }

    #[test]
    fn test_ordering() {
        let mut map = SignatureMap::new();
        map.add(args![1, 2], Action::by_value("1, 2"));
        map.add(args![1, 3], Action::by_value("1, 3"));
        map.add(args![1], Action::by_value("1"));
        map.add(args![1, 4], Action::by_value("1, 4"));
        map.add(args![anything()], Action::by_value("Any"));
        map.add(args![2], Action::by_value("2"));
        map.add(Pattern::MatchAll, Action::by_value("Default"));
        map.add(args![], Action::by_value("None"));

        let found = |args: &[Value]| map.find_first_action(args).cloned();
        assert_eq!(found(&[v(1), v(2)]), Some(Action::by_value("1, 2")));
        assert_eq!(found(&[v(1), v(3)]), Some(Action::by_value("1, 3")));
        assert_eq!(found(&[v(1), v(4)]), Some(Action::by_value("1, 4")));
        assert_eq!(found(&[v(1)]), Some(Action::by_value("1")));
        assert_eq!(found(&[v(2)]), Some(Action::by_value("Any")));
        assert_eq!(found(&[v(3)]), Some(Action::by_value("Any")));
        assert_eq!(found(&[]), Some(Action::by_value("Default")));
    }

    #[test]
    fn test_broad_pattern_shadows_later_narrow_one() {
        let mut map = SignatureMap::new();
        map.add(Pattern::MatchAll, "any");
        map.add(args![1], "one");
        assert_eq!(map.find_first_action(&[v(1)]), Some(&"any"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut map = SignatureMap::new();
        map.add(args![2], "b");
        map.add(args![1], "a");
        let order: Vec<_> = map.iter().map(|(_, action)| *action).collect();
        assert_eq!(order, vec!["b", "a"]);
    }
}
