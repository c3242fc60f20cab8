use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Value;

/// A handle to a single mutable value.
///
/// Cloning the handle does not copy the value: every clone observes
/// mutations made through any other. This is what a double hands out when a
/// response is registered with shared-reference semantics.
///
/// # Example
///
/// ```rust
/// use testkit_doubles::value::{Shared, Value};
///
/// let a = Shared::new(1);
/// let b = a.clone();
/// b.set(2);
///
/// assert_eq!(a.get(), Value::from(2));
/// assert!(Shared::ptr_eq(&a, &b));
/// ```
#[derive(Clone, Default)]
pub struct Shared {
    inner: Arc<Mutex<Value>>,
}

impl Shared {
    /// Wrap a value in a new shared instance.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value.into())),
        }
    }

    /// Snapshot of the current contents.
    #[must_use]
    pub fn get(&self) -> Value {
        self.inner.lock().clone()
    }

    /// Replace the contents.
    pub fn set(&self, value: impl Into<Value>) {
        *self.inner.lock() = value.into();
    }

    /// Mutate the contents in place.
    ///
    /// The lock is held while `f` runs, so `f` must not touch this handle.
    pub fn update<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Returns true if both handles point at the same instance.
    #[must_use]
    pub fn ptr_eq(a: &Shared, b: &Shared) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(value) => f.debug_tuple("Shared").field(&*value).finish(),
            None => f.write_str("Shared(<locked>)"),
        }
    }
}
