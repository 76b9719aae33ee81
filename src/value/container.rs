//! Multiple/ordered containers and records.
//!
//! A [`Container`] backs both the `multiple` and the `ordered` cardinality;
//! which equality law applies is decided by the [`Value`](crate::value::Value)
//! variant wrapping it. Elements may individually be null.

use crate::value::{BaseType, Scalar, ValueError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Elements of a multiple or ordered value, all sharing one base type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    base_type: BaseType,
    items: Vec<Option<Scalar>>,
}

impl Container {
    /// Create an empty container
    pub fn new(base_type: BaseType) -> Self {
        Self {
            base_type,
            items: Vec::new(),
        }
    }

    /// Create a container from non-null elements
    ///
    /// Elements are trusted to match `base_type`; use [`Container::try_from_items`]
    /// for untrusted input.
    pub fn with_items(base_type: BaseType, items: impl IntoIterator<Item = Scalar>) -> Self {
        Self {
            base_type,
            items: items.into_iter().map(Some).collect(),
        }
    }

    /// Create a container whose elements may be null
    pub fn with_nullable_items(
        base_type: BaseType,
        items: impl IntoIterator<Item = Option<Scalar>>,
    ) -> Self {
        Self {
            base_type,
            items: items.into_iter().collect(),
        }
    }

    /// Create a container, checking every non-null element against `base_type`
    pub fn try_from_items(
        base_type: BaseType,
        items: impl IntoIterator<Item = Option<Scalar>>,
    ) -> Result<Self, ValueError> {
        let mut container = Self::new(base_type);
        for item in items {
            container.try_push(item)?;
        }
        Ok(container)
    }

    pub fn base_type(&self) -> BaseType {
        self.base_type
    }

    pub fn items(&self) -> &[Option<Scalar>] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Option<Scalar>> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<Scalar>> {
        self.items.iter()
    }

    /// Append an element, checking its base type
    pub fn try_push(&mut self, item: Option<Scalar>) -> Result<(), ValueError> {
        if let Some(scalar) = &item {
            if scalar.base_type() != self.base_type {
                return Err(ValueError::BaseTypeMismatch {
                    expected: self.base_type,
                    found: scalar.base_type(),
                });
            }
        }
        self.items.push(item);
        Ok(())
    }

    /// Number of elements equal to `item`
    pub fn occurrences(&self, item: &Option<Scalar>) -> usize {
        self.items.iter().filter(|i| *i == item).count()
    }

    pub fn contains(&self, item: &Option<Scalar>) -> bool {
        self.items.iter().any(|i| i == item)
    }

    /// Sequence equality: same length, position-wise equal elements
    pub fn positional_eq(&self, other: &Container) -> bool {
        self.base_type == other.base_type && self.items == other.items
    }

    /// Bag equality: same elements with the same counts, in any order
    pub fn multiset_eq(&self, other: &Container) -> bool {
        if self.base_type != other.base_type || self.len() != other.len() {
            return false;
        }
        self.items
            .iter()
            .all(|item| self.occurrences(item) == other.occurrences(item))
    }
}

impl IntoIterator for Container {
    type Item = Option<Scalar>;
    type IntoIter = std::vec::IntoIter<Option<Scalar>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Named scalar fields, each carrying its own base type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: BTreeMap<String, Option<Scalar>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, value: Option<Scalar>) {
        self.fields.insert(identifier.into(), value);
    }

    /// Field value; `None` when the field is missing, `Some(None)` when it is null
    pub fn get(&self, identifier: &str) -> Option<&Option<Scalar>> {
        self.fields.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Option<Scalar>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<Scalar>)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, Option<Scalar>)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
