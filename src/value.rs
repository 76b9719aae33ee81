//! Typed value algebra.
//!
//! This module provides:
//!
//! - **BaseType / Cardinality**: the two tags describing any value
//! - **Scalar**: a single typed datum (integer, float, point, pair, ...)
//! - **Container / Record**: the multiple, ordered and record shapes
//! - **Value**: a non-null value of any cardinality
//!
//! Null is never a `Value`: an absent value is `None` in an `Option<Value>`,
//! which keeps it distinct from an empty container.

pub mod base_type;
pub mod container;
pub mod scalar;
pub mod shape;

pub use base_type::{BaseType, Cardinality};
pub use container::{Container, Record};
pub use scalar::{DirectedPair, FileValue, IntOrIdentifier, Pair, Point, Scalar};
pub use shape::{Coords, Shape};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while building values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("A {found} value cannot be stored in a container of {expected} values")]
    BaseTypeMismatch { expected: BaseType, found: BaseType },

    #[error("Invalid coordinate count {found} for shape {shape}")]
    InvalidCoords { shape: Shape, found: usize },
}

/// A non-null value of any cardinality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Single(Scalar),
    Multiple(Container),
    Ordered(Container),
    Record(Record),
}

impl Value {
    pub fn boolean(value: bool) -> Self {
        Value::Single(Scalar::Boolean(value))
    }

    pub fn integer(value: i32) -> Self {
        Value::Single(Scalar::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        Value::Single(Scalar::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::Single(Scalar::String(value.into()))
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Value::Single(Scalar::Identifier(value.into()))
    }

    pub fn uri(value: impl Into<String>) -> Self {
        Value::Single(Scalar::Uri(value.into()))
    }

    pub fn point(x: i32, y: i32) -> Self {
        Value::Single(Scalar::Point(Point::new(x, y)))
    }

    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Value::Single(Scalar::Pair(Pair::new(first, second)))
    }

    pub fn directed_pair(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Value::Single(Scalar::DirectedPair(DirectedPair::new(source, destination)))
    }

    pub fn duration(value: Duration) -> Self {
        Value::Single(Scalar::Duration(value))
    }

    /// Create a multiple value from non-null elements
    pub fn multiple(base_type: BaseType, items: impl IntoIterator<Item = Scalar>) -> Self {
        Value::Multiple(Container::with_items(base_type, items))
    }

    /// Create an ordered value from non-null elements
    pub fn ordered(base_type: BaseType, items: impl IntoIterator<Item = Scalar>) -> Self {
        Value::Ordered(Container::with_items(base_type, items))
    }

    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Option<Scalar>)>) -> Self {
        Value::Record(fields.into_iter().collect())
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Value::Single(_) => Cardinality::Single,
            Value::Multiple(_) => Cardinality::Multiple,
            Value::Ordered(_) => Cardinality::Ordered,
            Value::Record(_) => Cardinality::Record,
        }
    }

    /// Get the base type of this value; records have none
    pub fn base_type(&self) -> Option<BaseType> {
        match self {
            Value::Single(s) => Some(s.base_type()),
            Value::Multiple(c) | Value::Ordered(c) => Some(c.base_type()),
            Value::Record(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Single(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Value::Multiple(c) | Value::Ordered(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Extract every scalar element into one sequence
    ///
    /// A single value yields one element, containers yield their elements
    /// in order (null elements included) and records yield their field
    /// values in identifier order.
    pub fn flatten(&self) -> Vec<Option<Scalar>> {
        match self {
            Value::Single(s) => vec![Some(s.clone())],
            Value::Multiple(c) | Value::Ordered(c) => c.items().to_vec(),
            Value::Record(r) => r.iter().map(|(_, v)| v.clone()).collect(),
        }
    }

    /// Check whether QTI treats this value like NULL: empty containers,
    /// empty records and empty strings
    pub fn is_null_like(&self) -> bool {
        match self {
            Value::Single(Scalar::String(s)) => s.is_empty(),
            Value::Single(_) => false,
            Value::Multiple(c) | Value::Ordered(c) => c.is_empty(),
            Value::Record(r) => r.is_empty(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Single(a), Value::Single(b)) => a == b,
            (Value::Multiple(a), Value::Multiple(b)) => a.multiset_eq(b),
            (Value::Ordered(a), Value::Ordered(b)) => a.positional_eq(b),
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Single(value)
    }
}
