//! Three-state attribute values.
//!
//! An attribute in a plan or state is either absent from configuration,
//! not yet known (to be computed by the provider), or carries a value.
//! [`AttrValue`] models those states explicitly instead of overloading
//! `Option`.
//!
//! On the wire `null` decodes to [`AttrValue::Unset`] and the unknown
//! sentinel string [`UNKNOWN_VALUE`] decodes to [`AttrValue::Computed`].

use std::collections::{BTreeMap, BTreeSet};

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Sentinel the orchestrator uses for values that are only known after apply.
pub const UNKNOWN_VALUE: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// A plan/state attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue<T> {
    /// Not present in configuration.
    Unset,
    /// Unknown until the provider computes it.
    Computed,
    /// A concrete value.
    Value(T),
}

impl<T> Default for AttrValue<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> From<T> for AttrValue<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T> AttrValue<T> {
    /// `None` becomes [`AttrValue::Unset`].
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Value)
    }

    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    #[must_use]
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed)
    }

    /// True when the attribute carries a concrete value.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Treats unset and computed alike ("null or unknown").
    #[must_use]
    pub const fn is_null_or_unknown(&self) -> bool {
        !self.is_known()
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Computed => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Computed => None,
        }
    }

    pub fn value_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> AttrValue<U> {
        match self {
            Self::Unset => AttrValue::Unset,
            Self::Computed => AttrValue::Computed,
            Self::Value(v) => AttrValue::Value(f(v)),
        }
    }
}

impl<T: Default> AttrValue<T> {
    /// The value, or `T::default()` for unset and computed attributes.
    pub fn value_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

impl<T: Clone> AttrValue<T> {
    /// Keeps a known value, otherwise falls back to `other`.
    #[must_use]
    pub fn or_known(&self, other: &Self) -> Self {
        if self.is_known() {
            self.clone()
        } else {
            other.clone()
        }
    }
}

/// Collection attributes (sets, lists, maps) that can be empty.
pub trait Collection: Default {
    fn is_empty_collection(&self) -> bool;
}

impl<T> Collection for Vec<T> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Ord> Collection for BTreeSet<T> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Ord, V> Collection for BTreeMap<K, V> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

/// Builds the state value of a collection attribute from its remote value.
///
/// A non-empty remote collection is always carried. An empty or missing one
/// stays unset unless `prior` held a known value, so that an attribute that
/// was never configured does not flip between absent and empty.
pub fn collection_from_remote<C: Collection>(prior: &AttrValue<C>, remote: Option<C>) -> AttrValue<C> {
    match remote {
        Some(c) if !c.is_empty_collection() => AttrValue::Value(c),
        other if prior.is_known() => AttrValue::Value(other.unwrap_or_default()),
        _ => AttrValue::Unset,
    }
}

impl<T: Serialize> Serialize for AttrValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset => serializer.serialize_none(),
            Self::Computed => serializer.serialize_str(UNKNOWN_VALUE),
            Self::Value(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for AttrValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::Unset),
            Value::String(s) if s == UNKNOWN_VALUE => Ok(Self::Computed),
            other => serde_json::from_value(other)
                .map(Self::Value)
                .map_err(D::Error::custom),
        }
    }
}
