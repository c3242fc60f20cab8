//! # testkit-doubles 🧰
//!
//! > Scriptable test doubles with call verification
//!
//! **testkit-doubles** lets a test stand a [`Double`](mock::Double) in for a
//! collaborator, script what each call returns, record every call, and check
//! afterwards that the collaborator was called the way the test expected.
//!
//! ## Quick Start
//!
//! ```rust
//! use testkit_doubles::prelude::*;
//!
//! let double = Double::new(Contract::new("Dummy", ["a_method", "another_method"]));
//!
//! double.returns_by_value("a_method", "one", args![1]).unwrap();
//! double.throw_on("another_method", None).unwrap();
//! double.expect_once_with("a_method", args![1]).unwrap();
//!
//! assert_eq!(double.call("a_method", values![1]).unwrap(), Value::from("one"));
//! assert!(double.call("another_method", values![]).is_err());
//!
//! double.verify(&CollectingReporter::new()).assert_passed();
//! ```
//!
//! With the `macros` feature, `#[testkit_doubles::test]` hands the test a
//! [`TestScope`](scope::TestScope) and verifies every double created through
//! it once the body returns:
//!
//! ```rust,ignore
//! use testkit_doubles::prelude::*;
//!
//! #[testkit_doubles::test]
//! fn test_reads_config(scope: TestScope) {
//!     let store = scope.double(Contract::new("Store", ["get"]));
//!     store.expect_once("get").unwrap();
//!     store.call("get", values!["key"]).unwrap();
//! }
//! ```
//!
//! ## Features
//!
//! - 🎭 **Scripted responses** - by value, by shared handle, faults and warnings
//! - ⏱️ **Call-indexed responses** - answer the Nth call differently
//! - 🔍 **Argument expectations** - literals, wildcards and composable matchers
//! - 🧮 **Call counts** - exact, minimum and maximum bounds
//! - 📋 **Pluggable reporting** - collect, panic or log verification outcomes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod expectation;
pub mod mock;
pub mod report;
pub mod scope;
pub mod value;

/// Prelude for convenient imports
///
/// ```rust
/// use testkit_doubles::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::expectation::{
        anything, equal, identical, instance_of, not, pattern, within_margin, Expectation,
        Pattern,
    };
    pub use crate::mock::{Action, Contract, Double, DoubleConfig, Fault, Severity};
    pub use crate::report::{CollectingReporter, PanicReporter, Report, Reporter, TracingReporter};
    pub use crate::scope::TestScope;
    pub use crate::value::{Object, Shared, Value};
    pub use crate::{args, values};
}

// Re-exports
pub use error::{Error, Result};

// Re-export the test macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use testkit_doubles_macros::test;
