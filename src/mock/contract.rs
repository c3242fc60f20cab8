//! The set of operations a double stands in for.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

/// Real behaviour behind an operation of a partial double.
pub type Handler = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A named, finite set of operations, optionally with real handlers.
///
/// The contract is the dispatch table of a double: it decides which names
/// may be configured or called, and for operations with a handler, what runs
/// when no scripted action applies.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::mock::Contract;
/// use testkit_doubles::value::Value;
///
/// let contract = Contract::new("Dummy", ["a_method", "another_method"])
///     .with_handler("echo", |args| Ok(args.first().cloned().unwrap_or_default()));
///
/// assert!(contract.has_operation("a_method"));
/// assert!(contract.has_operation("echo"));
/// assert!(!contract.has_operation("a_missing_method"));
/// ```
#[derive(Clone)]
pub struct Contract {
    name: String,
    operations: Vec<String>,
    handlers: HashMap<String, Handler>,
}

impl Contract {
    /// Create a contract with the given operations and no handlers.
    pub fn new<I, S>(name: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut contract = Self {
            name: name.into(),
            operations: Vec::new(),
            handlers: HashMap::new(),
        };
        for operation in operations {
            contract.add_operation(operation.into());
        }
        contract
    }

    /// Add an operation with no real behaviour.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.add_operation(operation.into());
        self
    }

    /// Add an operation backed by real behaviour.
    #[must_use]
    pub fn with_handler<F>(mut self, operation: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let operation = operation.into();
        self.add_operation(operation.clone());
        self.handlers.insert(operation, Arc::new(handler));
        self
    }

    /// The contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operation names in declaration order.
    #[must_use]
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    /// Returns true if `operation` is part of the contract.
    #[must_use]
    pub fn has_operation(&self, operation: &str) -> bool {
        self.operations.iter().any(|o| o == operation)
    }

    /// Reject names outside the contract.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperation`] if `operation` is not declared.
    pub fn ensure(&self, operation: &str) -> Result<()> {
        if self.has_operation(operation) {
            Ok(())
        } else {
            Err(Error::unknown_operation(&self.name, operation))
        }
    }

    /// The real handler of `operation`, if it has one.
    #[must_use]
    pub fn handler(&self, operation: &str) -> Option<&Handler> {
        self.handlers.get(operation)
    }

    fn add_operation(&mut self, operation: String) {
        if !self.has_operation(&operation) {
            self.operations.push(operation);
        }
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handled: Vec<_> = self.handlers.keys().collect();
        handled.sort();
        f.debug_struct("Contract")
            .field("name", &self.name)
            .field("operations", &self.operations)
            .field("handled", &handled)
            .finish()
    }
}
