//! Time-aware response lookup.
//!
//! Every operation has two tiers of registrations: "always" entries and
//! entries pinned to one invocation index. When the Nth call comes in, the
//! entries pinned to N are consulted first and the "always" entries second,
//! each tier in registration order with the first match winning.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::expectation::Pattern;
use crate::value::Value;

use super::{Action, SignatureMap};

/// When a registration applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum When {
    /// On every call.
    Always,
    /// Only on the call with this 0-based invocation index.
    At(usize),
}

impl fmt::Display for When {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::At(index) => write!(f, "at call #{index}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Timeline {
    always: SignatureMap<Action>,
    at: BTreeMap<usize, SignatureMap<Action>>,
}

/// Per-operation schedule of scripted responses.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::expectation::Pattern;
/// use testkit_doubles::mock::{Action, CallSchedule};
///
/// let mut schedule = CallSchedule::new();
/// schedule.register_at(0, "a_method", Pattern::MatchAll, Action::by_value("first"));
/// schedule.register("a_method", Pattern::MatchAll, Action::by_value("later"));
///
/// assert_eq!(schedule.respond(0, "a_method", &[]), Some(&Action::by_value("first")));
/// assert_eq!(schedule.respond(1, "a_method", &[]), Some(&Action::by_value("later")));
/// assert_eq!(schedule.respond(0, "another_method", &[]), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallSchedule {
    timelines: HashMap<String, Timeline>,
}

impl CallSchedule {
    /// Create an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action for every call to `operation` matching `pattern`.
    pub fn register(&mut self, operation: &str, pattern: impl Into<Pattern>, action: Action) {
        self.timeline(operation).always.add(pattern, action);
    }

    /// Register an action for the call to `operation` with invocation index
    /// `index`, when its arguments match `pattern`.
    pub fn register_at(
        &mut self,
        index: usize,
        operation: &str,
        pattern: impl Into<Pattern>,
        action: Action,
    ) {
        self.timeline(operation)
            .at
            .entry(index)
            .or_default()
            .add(pattern, action);
    }

    /// Register with an explicit [`When`].
    pub fn register_when(
        &mut self,
        when: When,
        operation: &str,
        pattern: impl Into<Pattern>,
        action: Action,
    ) {
        match when {
            When::Always => self.register(operation, pattern, action),
            When::At(index) => self.register_at(index, operation, pattern, action),
        }
    }

    /// The action for call number `index` to `operation` with `args`, or
    /// `None` when nothing is configured for it.
    #[must_use]
    pub fn respond(&self, index: usize, operation: &str, args: &[Value]) -> Option<&Action> {
        let timeline = self.timelines.get(operation)?;
        timeline
            .at
            .get(&index)
            .and_then(|pinned| pinned.find_first_action(args))
            .or_else(|| timeline.always.find_first_action(args))
    }

    /// Returns true if anything is registered for `operation`.
    #[must_use]
    pub fn has_registrations(&self, operation: &str) -> bool {
        self.timelines
            .get(operation)
            .is_some_and(|t| !t.always.is_empty() || t.at.values().any(|m| !m.is_empty()))
    }

    fn timeline(&mut self, operation: &str) -> &mut Timeline {
        self.timelines.entry(operation.to_string()).or_default()
    }
}
