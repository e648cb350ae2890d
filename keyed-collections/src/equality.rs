//! Strict and loose value equality.
//!
//! Strict equality is plain [`PartialEq`]. Loose equality is the [`LooseEq`]
//! capability: it falls back to strict equality unless a type knows how to
//! coerce between its own representations, which is the case for dynamically
//! typed values such as `serde_json::Value` (where `2` and `"2"` are loosely
//! equal).

/// Equality with type coercion.
///
/// The provided method is strict equality, so statically typed values opt in
/// with an empty impl:
///
/// ```rust
/// use keyed_collections::LooseEq;
///
/// #[derive(PartialEq)]
/// struct Widget(u32);
///
/// impl LooseEq for Widget {}
///
/// assert!(Widget(1).loose_eq(&Widget(1)));
/// ```
pub trait LooseEq: PartialEq {
    fn loose_eq(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! impl_strict_loose_eq {
    ($($ty:ty),*) => {
        $(impl LooseEq for $ty {})*
    };
}

impl_strict_loose_eq!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String
);

impl LooseEq for &str {}

impl<T: LooseEq> LooseEq for Option<T> {
    fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.loose_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: LooseEq> LooseEq for Vec<T> {
    fn loose_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.loose_eq(b))
    }
}

#[cfg(feature = "serde")]
mod json {
    use serde_json::{Number, Value};

    use super::LooseEq;

    /// A number or numeric text, kept exact while it is an integer.
    #[derive(Clone, Copy, Debug)]
    enum Numeric {
        Int(i128),
        Float(f64),
    }

    impl Numeric {
        fn of_number(number: &Number) -> Option<Self> {
            if let Some(int) = number.as_i64() {
                return Some(Numeric::Int(int.into()));
            }
            if let Some(int) = number.as_u64() {
                return Some(Numeric::Int(int.into()));
            }
            number.as_f64().map(Numeric::Float)
        }

        /// Blank or non-finite text is not numeric.
        fn of_text(text: &str) -> Option<Self> {
            let text = text.trim();
            if let Ok(int) = text.parse::<i128>() {
                return Some(Numeric::Int(int));
            }
            text.parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Numeric::Float)
        }

        fn as_f64(self) -> f64 {
            match self {
                Numeric::Int(int) => int as f64,
                Numeric::Float(float) => float,
            }
        }
    }

    impl PartialEq for Numeric {
        fn eq(&self, other: &Self) -> bool {
            match (self, other) {
                (Numeric::Int(a), Numeric::Int(b)) => a == b,
                _ => self.as_f64() == other.as_f64(),
            }
        }
    }

    fn truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
            Value::String(text) => !(text.is_empty() || text == "0"),
            Value::Array(items) => !items.is_empty(),
            Value::Object(_) => true,
        }
    }

    impl LooseEq for Value {
        fn loose_eq(&self, other: &Self) -> bool {
            match (self, other) {
                (Value::Number(a), Value::Number(b)) => {
                    Numeric::of_number(a).is_some_and(|left| Numeric::of_number(b) == Some(left))
                }
                (Value::Number(number), Value::String(text))
                | (Value::String(text), Value::Number(number)) => Numeric::of_text(text)
                    .is_some_and(|parsed| Numeric::of_number(number) == Some(parsed)),
                (Value::String(a), Value::String(b)) => {
                    match (Numeric::of_text(a), Numeric::of_text(b)) {
                        (Some(left), Some(right)) => left == right,
                        _ => a == b,
                    }
                }
                (Value::Bool(flag), value) | (value, Value::Bool(flag)) => *flag == truthy(value),
                (Value::Null, value) | (value, Value::Null) => !truthy(value),
                (Value::Array(a), Value::Array(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
                }
                (Value::Object(a), Value::Object(b)) => {
                    a.len() == b.len()
                        && a.iter().all(|(key, x)| b.get(key).is_some_and(|y| x.loose_eq(y)))
                }
                _ => self == other,
            }
        }
    }
}
