//! Lookups by uniqueness key or name.

use auxo_sdk::{Location, ProtectSurface};

use super::error::DomainError;

/// Selector for objects addressable by uniqueness key or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    UniquenessKey(String),
    Name(String),
}

impl Lookup {
    /// Builds a lookup from optional inputs; empty strings count as unset.
    ///
    /// # Errors
    ///
    /// `Validation` unless exactly one of the two is set.
    pub fn from_inputs(
        uniqueness_key: Option<String>,
        name: Option<String>,
    ) -> Result<Self, DomainError> {
        let uniqueness_key = uniqueness_key.filter(|s| !s.is_empty());
        let name = name.filter(|s| !s.is_empty());
        match (uniqueness_key, name) {
            (Some(key), None) => Ok(Self::UniquenessKey(key)),
            (None, Some(name)) => Ok(Self::Name(name)),
            _ => Err(DomainError::validation(
                "uniqueness_key",
                "Either uniqueness_key OR name must be set",
            )),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::UniquenessKey(k) | Self::Name(k) => k,
        }
    }
}

/// Objects that can be found by uniqueness key or name.
pub trait Keyed {
    const ENTITY: &'static str;

    fn uniqueness_key(&self) -> &str;
    fn name(&self) -> &str;
}

impl Keyed for ProtectSurface {
    const ENTITY: &'static str = "protectsurface";

    fn uniqueness_key(&self) -> &str {
        &self.uniqueness_key
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Keyed for Location {
    const ENTITY: &'static str = "location";

    fn uniqueness_key(&self) -> &str {
        &self.uniqueness_key
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Picks the single item matching `lookup`.
///
/// # Errors
///
/// - `AmbiguousName` when more than one item carries the requested name
/// - `NotFound` when nothing matches
pub fn select_one<T: Keyed>(items: Vec<T>, lookup: &Lookup) -> Result<T, DomainError> {
    let mut matches = items.into_iter().filter(|item| match lookup {
        Lookup::UniquenessKey(key) => item.uniqueness_key() == key,
        Lookup::Name(name) => item.name() == name,
    });

    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        return Err(DomainError::ambiguous_name(T::ENTITY, lookup.key()));
    }
    first.ok_or_else(|| match lookup {
        Lookup::UniquenessKey(key) => DomainError::not_found(T::ENTITY, format!("uniqueness_key {key}")),
        Lookup::Name(name) => DomainError::not_found(T::ENTITY, format!("name {name}")),
    })
}
