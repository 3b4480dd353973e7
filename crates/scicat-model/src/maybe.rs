//! Three-state optional values.
//!
//! The catalog service distinguishes a field that was omitted from one that
//! was sent as `null`. `Option<T>` collapses both, so every optional record
//! field uses [`Maybe`] instead:
//!
//! | Wire | `Maybe` |
//! |---|---|
//! | key missing | `Absent` |
//! | `null` | `Null` |
//! | any other value | `Present(v)` |
//!
//! Fields must be declared with
//! `#[serde(default, skip_serializing_if = "Maybe::is_absent")]` so that an
//! absent value is never written.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An optional field value that remembers whether it was omitted or null.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Maybe<T> {
    /// The key was not present.
    #[default]
    Absent,
    /// The key was present with an explicit `null`.
    Null,
    /// The key was present with a value.
    Present(T),
}

impl<T> Maybe<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Maybe::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Maybe::Null)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Maybe::Present(_))
    }

    /// The value if present.
    pub fn get(&self) -> Option<&T> {
        match self {
            Maybe::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Collapse into `Option`, losing the absent/null distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            Maybe::Present(value) => Some(value),
            _ => None,
        }
    }

    /// `None` becomes an explicit null.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Maybe::Present(value),
            None => Maybe::Null,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Maybe<U> {
        match self {
            Maybe::Absent => Maybe::Absent,
            Maybe::Null => Maybe::Null,
            Maybe::Present(value) => Maybe::Present(f(value)),
        }
    }
}

impl<T: Copy> Maybe<T> {
    /// The value if present, otherwise `default`.
    pub fn or(&self, default: T) -> T {
        match self {
            Maybe::Present(value) => *value,
            _ => default,
        }
    }
}

impl<T> From<T> for Maybe<T> {
    fn from(value: T) -> Self {
        Maybe::Present(value)
    }
}

impl<T: Serialize> Serialize for Maybe<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Maybe::Present(value) => value.serialize(serializer),
            // Absent is skipped at the field level; if it slips through it
            // serializes like null.
            Maybe::Absent | Maybe::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Maybe<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Maybe::from_option)
    }
}
