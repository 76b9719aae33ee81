//! Scalar values carried by every cardinality.

use crate::value::BaseType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A point on a 2D plane, in integer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Unordered pair of identifiers: `(A, B)` equals `(B, A)`
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub first: String,
    pub second: String,
}

impl Pair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

/// Ordered pair of identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectedPair {
    pub source: String,
    pub destination: String,
}

impl DirectedPair {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Content of a `file` value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValue {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub filename: Option<String>,
}

/// Either an integer or an identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntOrIdentifier {
    Int(i32),
    Identifier(String),
}

/// A single typed value
///
/// Floats compare by value except that NaN equals NaN, so container
/// equality stays reflexive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    Identifier(String),
    Boolean(bool),
    Integer(i32),
    Float(f64),
    String(String),
    Point(Point),
    Pair(Pair),
    DirectedPair(DirectedPair),
    Duration(Duration),
    File(FileValue),
    Uri(String),
    IntOrIdentifier(IntOrIdentifier),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Identifier(a), Scalar::Identifier(b)) => a == b,
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a == b,
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Point(a), Scalar::Point(b)) => a == b,
            (Scalar::Pair(a), Scalar::Pair(b)) => a == b,
            (Scalar::DirectedPair(a), Scalar::DirectedPair(b)) => a == b,
            (Scalar::Duration(a), Scalar::Duration(b)) => a == b,
            (Scalar::File(a), Scalar::File(b)) => a == b,
            (Scalar::Uri(a), Scalar::Uri(b)) => a == b,
            (Scalar::IntOrIdentifier(a), Scalar::IntOrIdentifier(b)) => a == b,
            _ => false,
        }
    }
}

impl Scalar {
    /// Get the base type of this scalar
    pub fn base_type(&self) -> BaseType {
        match self {
            Scalar::Identifier(_) => BaseType::Identifier,
            Scalar::Boolean(_) => BaseType::Boolean,
            Scalar::Integer(_) => BaseType::Integer,
            Scalar::Float(_) => BaseType::Float,
            Scalar::String(_) => BaseType::String,
            Scalar::Point(_) => BaseType::Point,
            Scalar::Pair(_) => BaseType::Pair,
            Scalar::DirectedPair(_) => BaseType::DirectedPair,
            Scalar::Duration(_) => BaseType::Duration,
            Scalar::File(_) => BaseType::File,
            Scalar::Uri(_) => BaseType::Uri,
            Scalar::IntOrIdentifier(_) => BaseType::IntOrIdentifier,
        }
    }

    /// Numeric view of an integer or float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(f64::from(*i)),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Text of a string, identifier or uri
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) | Scalar::Identifier(s) | Scalar::Uri(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Scalar::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Scalar::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<Point> for Scalar {
    fn from(value: Point) -> Self {
        Scalar::Point(value)
    }
}

impl From<Duration> for Scalar {
    fn from(value: Duration) -> Self {
        Scalar::Duration(value)
    }
}
