//! Keys of a [`Collection`](crate::Collection).
//!
//! A key is either an integer or a string. Integer keys are what list-like
//! collections use (`0..n`) and what [`Collection::push`](crate::Collection::push)
//! hands out; string keys name entries of map-like collections.

use std::fmt;

/// A collection key: an integer or a string.
///
/// Strings that spell a canonical integer are converted to [`Key::Int`], so
/// `"2"` and `2` address the same entry while `"02"` stays a string key. See
/// [`Key::from_canonical`]. Building `Key::Str` directly skips that step and
/// gives a key no JSON decoder will produce.
///
/// # Examples
///
/// ```rust
/// use keyed_collections::Key;
///
/// assert_eq!(Key::from(3), Key::Int(3));
/// assert_eq!(Key::from("three"), Key::Str("three".to_string()));
/// assert_eq!(Key::from(3), Key::from("3"));
/// assert_ne!(Key::from(3), Key::from("03"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Parses a textual key, turning canonical decimal integers into [`Key::Int`].
    ///
    /// A string is canonical when printing the parsed integer gives back the
    /// exact same text, so `"12"` and `"-4"` become integers while `"012"`,
    /// `"+1"`, `"-0"` and `" 1"` stay strings.
    ///
    /// ```rust
    /// use keyed_collections::Key;
    ///
    /// assert_eq!(Key::from_canonical("42"), Key::Int(42));
    /// assert_eq!(Key::from_canonical("042"), Key::from("042"));
    /// ```
    pub fn from_canonical(text: &str) -> Self {
        match canonical_int(text) {
            Some(int) => Key::Int(int),
            None => Key::Str(text.to_string()),
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Key::Int(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(int) => Some(*int),
            Key::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Str(text) => Some(text),
        }
    }
}

fn canonical_int(text: &str) -> Option<i64> {
    text.parse::<i64>().ok().filter(|int| int.to_string() == text)
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(int) => write!(f, "{int}"),
            Key::Str(text) => f.write_str(text),
        }
    }
}

macro_rules! impl_int_key {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Key {
                fn from(int: $int) -> Self {
                    Key::Int(int as i64)
                }
            }
        )*
    };
}

impl_int_key!(i8, i16, i32, i64, u8, u16, u32, isize, usize);

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Key::from_canonical(text)
    }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        match canonical_int(&text) {
            Some(int) => Key::Int(int),
            None => Key::Str(text),
        }
    }
}

impl From<&String> for Key {
    fn from(text: &String) -> Self {
        Key::from_canonical(text)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}
