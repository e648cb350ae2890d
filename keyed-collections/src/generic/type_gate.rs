//! Runtime type checks applied before a value enters a
//! [`TypedCollection`](crate::TypedCollection).
//!
//! A [`TypeGate`] names the type it requires and decides whether a value
//! satisfies it. Three gates ship with the crate:
//!
//! - [`InstanceOf<T>`] admits [`Object`] handles whose concrete type is `T`.
//! - `JsonKind` admits `serde_json::Value`s of one kind (`serde` feature).
//! - [`Predicate`] pairs a type name with an arbitrary check.

use std::{
    any::{self, Any},
    borrow::Cow,
    fmt,
    marker::PhantomData,
    sync::Arc,
};

use tracing::debug;

use crate::{
    equality::LooseEq,
    error::{CollectionError, Result},
};

/// A check performed before insertion that rejects values not satisfying a
/// required type.
///
/// # Examples
///
/// ```rust
/// use std::borrow::Cow;
///
/// use keyed_collections::TypeGate;
///
/// struct Positive;
///
/// impl TypeGate<i64> for Positive {
///     fn type_name(&self) -> Cow<'_, str> {
///         Cow::Borrowed("positive integer")
///     }
///
///     fn admits(&self, value: &i64) -> bool {
///         *value > 0
///     }
/// }
///
/// assert!(Positive.check(&3).is_ok());
/// assert_eq!(
///     Positive.check(&-3).unwrap_err().to_string(),
///     "Value must be instance of positive integer"
/// );
/// ```
pub trait TypeGate<V> {
    /// Name of the required type, used in error messages.
    fn type_name(&self) -> Cow<'_, str>;

    /// Returns `true` if `value` satisfies the required type.
    fn admits(&self, value: &V) -> bool;

    /// Describes the actual type of a rejected `value`.
    fn describe(&self, value: &V) -> String {
        let _ = value;
        any::type_name::<V>().to_string()
    }

    /// Returns [`CollectionError::InvalidValueType`] unless `value` is admitted.
    fn check(&self, value: &V) -> Result<()> {
        if self.admits(value) {
            return Ok(());
        }

        let expected = self.type_name().into_owned();
        let found = self.describe(value);
        debug!(%expected, %found, "type gate rejected value");
        Err(CollectionError::InvalidValueType { expected, found })
    }
}

/// A shared handle to a value of any type, remembering that type's name.
///
/// Cloning an `Object` clones the handle, not the value. Both strict and
/// loose equality are identity: two handles are equal when they point at the
/// same allocation.
///
/// ```rust
/// use keyed_collections::Object;
///
/// struct Widget(u32);
///
/// let widget = Object::new(Widget(7));
/// let alias = widget.clone();
///
/// assert!(widget.is::<Widget>());
/// assert_eq!(alias.downcast_ref::<Widget>().map(|w| w.0), Some(7));
/// assert_eq!(widget, alias);
/// assert_ne!(widget, Object::new(Widget(7)));
/// ```
#[derive(Clone)]
pub struct Object {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Object {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: any::type_name::<T>(),
        }
    }

    /// Full path of the concrete type behind the handle.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Eq for Object {}

impl LooseEq for Object {}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.type_name).finish()
    }
}

/// Admits [`Object`]s whose concrete type is `T`.
pub struct InstanceOf<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> InstanceOf<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for InstanceOf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InstanceOf<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for InstanceOf<T> {}

impl<T> fmt::Debug for InstanceOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceOf<{}>", any::type_name::<T>())
    }
}

impl<T: Any> TypeGate<Object> for InstanceOf<T> {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(any::type_name::<T>())
    }

    fn admits(&self, value: &Object) -> bool {
        value.is::<T>()
    }

    fn describe(&self, value: &Object) -> String {
        value.type_name().to_string()
    }
}

/// Admits the values for which a stored check holds.
///
/// ```rust
/// use keyed_collections::{Predicate, TypeGate};
///
/// let word = Predicate::new("word", |text: &String| text.chars().all(char::is_alphabetic));
/// assert!(word.admits(&"hello".to_string()));
/// assert!(!word.admits(&"hello world".to_string()));
/// ```
pub struct Predicate<V> {
    name: String,
    check: Arc<dyn Fn(&V) -> bool + Send + Sync>,
}

impl<V> Predicate<V> {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }
}

impl<V> Clone for Predicate<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

impl<V> fmt::Debug for Predicate<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<V> TypeGate<V> for Predicate<V> {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name.as_str())
    }

    fn admits(&self, value: &V) -> bool {
        (self.check)(value)
    }
}

#[cfg(feature = "serde")]
pub use json::JsonKind;

#[cfg(feature = "serde")]
mod json {
    use std::borrow::Cow;

    use serde_json::Value;

    use super::TypeGate;

    /// Admits `serde_json::Value`s of a single kind.
    ///
    /// ```rust
    /// use keyed_collections::{JsonKind, TypeGate};
    /// use serde_json::json;
    ///
    /// assert!(JsonKind::Number.admits(&json!(1.5)));
    /// assert!(!JsonKind::Number.admits(&json!("1.5")));
    /// assert_eq!(JsonKind::of(&json!([1])), JsonKind::Array);
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum JsonKind {
        Null,
        Bool,
        Number,
        String,
        Array,
        Object,
    }

    impl JsonKind {
        pub fn of(value: &Value) -> Self {
            match value {
                Value::Null => JsonKind::Null,
                Value::Bool(_) => JsonKind::Bool,
                Value::Number(_) => JsonKind::Number,
                Value::String(_) => JsonKind::String,
                Value::Array(_) => JsonKind::Array,
                Value::Object(_) => JsonKind::Object,
            }
        }

        pub fn as_str(&self) -> &'static str {
            match self {
                JsonKind::Null => "null",
                JsonKind::Bool => "bool",
                JsonKind::Number => "number",
                JsonKind::String => "string",
                JsonKind::Array => "array",
                JsonKind::Object => "object",
            }
        }
    }

    impl TypeGate<Value> for JsonKind {
        fn type_name(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.as_str())
        }

        fn admits(&self, value: &Value) -> bool {
            JsonKind::of(value) == *self
        }

        fn describe(&self, value: &Value) -> String {
            JsonKind::of(value).as_str().to_string()
        }
    }
}
