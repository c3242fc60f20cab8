//! Test doubles and the machinery behind them.
//!
//! - [`Double`] - a configurable stand-in for a [`Contract`]
//! - [`CallSchedule`] - which [`Action`] answers which call
//! - [`CallRecorder`] - every call made, in order
//! - [`Tally`] - call-count and argument expectations, checked at verify time
//!
//! # Scripting responses
//!
//! ```rust
//! use testkit_doubles::args;
//! use testkit_doubles::mock::{Contract, Double};
//! use testkit_doubles::value::Value;
//!
//! let double = Double::new(Contract::new("Dummy", ["a_method"]));
//! double.returns_by_value_at(0, "a_method", "first", ()).unwrap();
//! double.returns_by_value("a_method", "one", args![1]).unwrap();
//!
//! assert_eq!(double.call("a_method", vec![Value::from(1)]).unwrap(), Value::from("first"));
//! assert_eq!(double.call("a_method", vec![Value::from(1)]).unwrap(), Value::from("one"));
//! assert_eq!(double.call("a_method", vec![]).unwrap(), Value::Null);
//! ```
//!
//! # Verifying calls
//!
//! ```rust
//! use testkit_doubles::mock::{Contract, Double};
//! use testkit_doubles::report::CollectingReporter;
//!
//! let double = Double::new(Contract::new("Dummy", ["a_method"]));
//! double.expect_maximum_call_count("a_method", 2).unwrap();
//! for _ in 0..3 {
//!     double.call("a_method", vec![]).unwrap();
//! }
//!
//! let report = double.verify(&CollectingReporter::new());
//! assert!(!report.passed());
//! ```

mod action;
mod contract;
mod double;
mod recorder;
mod schedule;
mod signature;
mod tally;

pub use action::{Action, Fault, Severity, Warning};
pub use contract::{Contract, Handler};
pub use double::{Double, DoubleConfig, Stub};
pub use recorder::{CallRecorder, Invocation};
pub use schedule::{CallSchedule, When};
pub use signature::SignatureMap;
pub use tally::{ArgsExpectation, CallCountExpectation, SequencedArgsExpectation, Tally};
