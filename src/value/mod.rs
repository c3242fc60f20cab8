//! Dynamic values passed through a double.
//!
//! A double sits between a test and code that expects some real collaborator,
//! so arguments and return values have to travel through the engine without
//! the engine knowing their static types. [`Value`] is that common currency.
//!
//! Two comparison rules exist:
//!
//! - [`Value::is_identical`] is strict: same variant and same value at every
//!   level, so `"0"` and `0` differ and so do `1` and `1.0`.
//! - [`Value::is_equal`] is structural: numbers compare numerically across
//!   `Int` and `Float`, and shared handles compare by their current contents.
//!
//! `PartialEq` on [`Value`] uses the strict rule.
//!
//! # Example
//!
//! ```rust
//! use testkit_doubles::value::{Object, Value};
//!
//! let a = Value::from("0");
//! let b = Value::from(0);
//! assert!(!a.is_identical(&b));
//!
//! let one = Value::from(1);
//! assert!(one.is_equal(&Value::from(1.0)));
//!
//! let dummy = Object::new("Dummy").with_field("count", 2);
//! assert_eq!(Value::from(dummy).field("count"), Some(Value::from(2)));
//! ```

mod shared;

use std::collections::BTreeMap;
use std::fmt;

pub use shared::Shared;

/// A dynamically typed argument or return value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A structured object with a class name and named fields.
    Object(Object),
    /// A single mutable instance observed by every holder of the handle.
    Shared(Shared),
}

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number as a float if this is an `Int` or a `Float`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string slice if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the object if this is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the shared handle if this is a `Shared`.
    #[must_use]
    pub fn as_shared(&self) -> Option<&Shared> {
        match self {
            Self::Shared(shared) => Some(shared),
            _ => None,
        }
    }

    /// Name of the runtime type: `null`, `bool`, `int`, `float`, `string`,
    /// `list`, or the class name of an object.
    ///
    /// A shared handle reports the type of its current contents.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Str(_) => "string".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Object(object) => object.class().to_string(),
            Self::Shared(shared) => shared.get().type_name(),
        }
    }

    /// Returns true if the runtime type satisfies `type_name`.
    ///
    /// Objects satisfy their own class, every class they were declared to
    /// extend or implement, and `object`. Scalars satisfy their
    /// [`type_name`](Self::type_name).
    #[must_use]
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        match self {
            Self::Object(object) => type_name == "object" || object.is_a(type_name),
            Self::Shared(shared) => shared.get().is_instance_of(type_name),
            other => other.type_name() == type_name,
        }
    }

    /// Projects a named field out of an object (looking through shared
    /// handles). Returns `None` for non-objects and missing fields.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Self::Object(object) => object.field(name).cloned(),
            Self::Shared(shared) => shared.get().field(name),
            _ => None,
        }
    }

    /// Strict comparison.
    #[must_use]
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_identical(y))
            }
            (Self::Object(a), Self::Object(b)) => a.compare(b, Value::is_identical),
            (Self::Shared(a), Self::Shared(b)) => {
                Shared::ptr_eq(a, b) || a.get().is_identical(&b.get())
            }
            _ => false,
        }
    }

    /// Structural comparison.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Shared(a), Self::Shared(b)) if Shared::ptr_eq(a, b) => true,
            (Self::Shared(a), b) => a.get().is_equal(b),
            (a, Self::Shared(b)) => a.is_equal(&b.get()),
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => *a as f64 == *b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_equal(y))
            }
            (Self::Object(a), Self::Object(b)) => a.compare(b, Value::is_equal),
            (a, b) => a.is_identical(b),
        }
    }

    /// Copy with every shared handle detached into a fresh instance.
    ///
    /// The copy is equal to the original but shares nothing with it, so
    /// mutations made through one are never seen through the other.
    #[must_use]
    pub fn deep_copy(&self) -> Value {
        match self {
            Self::List(items) => Self::List(items.iter().map(Value::deep_copy).collect()),
            Self::Object(object) => Self::Object(object.deep_copy()),
            Self::Shared(shared) => Self::Shared(Shared::new(shared.get().deep_copy())),
            other => other.clone(),
        }
    }

    /// Renders the value for reports: like `Display`, but strings are quoted.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Str(s) => format!("{s:?}"),
            Self::Shared(shared) => shared.get().describe(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is_identical(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.describe())?;
                }
                f.write_str("]")
            }
            Self::Object(object) => write!(f, "{object}"),
            Self::Shared(shared) => write!(f, "{}", shared.get()),
        }
    }
}

/// A structured value: class name, the classes it "is a", and named fields.
#[derive(Debug, Clone, Default)]
pub struct Object {
    class: String,
    ancestors: Vec<String>,
    fields: BTreeMap<String, Value>,
}

impl Object {
    /// Create an object of the given class with no fields.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ancestors: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Declare a parent class or implemented interface.
    #[must_use]
    pub fn extends(mut self, class: impl Into<String>) -> Self {
        self.ancestors.push(class.into());
        self
    }

    /// Set a field, replacing any previous value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field in place.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// The class name.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns true if the object is of, extends, or implements `class`.
    #[must_use]
    pub fn is_a(&self, class: &str) -> bool {
        self.class == class || self.ancestors.iter().any(|a| a == class)
    }

    /// Look up a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterate over fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn compare(&self, other: &Object, same: fn(&Value, &Value) -> bool) -> bool {
        self.class == other.class
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.fields.get(name).is_some_and(|o| same(value, o)))
    }

    fn deep_copy(&self) -> Object {
        Object {
            class: self.class.clone(),
            ancestors: self.ancestors.clone(),
            fields: self
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.deep_copy()))
                .collect(),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return f.write_str(&self.class);
        }
        write!(f, "{} {{ ", self.class)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {}", value.describe())?;
        }
        f.write_str(" }")
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Self::Int(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Self::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Self::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

impl From<Shared> for Value {
    fn from(shared: Shared) -> Self {
        Self::Shared(shared)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}
