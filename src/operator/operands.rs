//! Evaluated operands handed to an operator.

use crate::value::{BaseType, Scalar, Value};

/// Ordered results of an operator's sub-expressions, `None` being NULL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operands(Vec<Option<Value>>);

impl Operands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operand: Option<Value>) {
        self.0.push(operand);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Operand at `position`; `None` when NULL or out of range
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.0.get(position).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<Value>> {
        self.0.iter()
    }

    /// Non-null operands with their position
    pub fn non_null(&self) -> impl Iterator<Item = (usize, &Value)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i, v)))
    }

    pub fn contains_null(&self) -> bool {
        self.0.iter().any(Option::is_none)
    }

    /// Any operand NULL, an empty container or an empty string
    pub fn contains_null_like(&self) -> bool {
        self.0
            .iter()
            .any(|v| v.as_ref().map_or(true, Value::is_null_like))
    }

    /// Scalars of every operand, containers flattened; `None` for NULL operands
    pub fn flatten(&self) -> Vec<Option<Scalar>> {
        self.0
            .iter()
            .flat_map(|v| match v {
                Some(value) => value.flatten(),
                None => vec![None],
            })
            .collect()
    }

    /// Check whether every non-null operand is an integer
    pub fn all_integer(&self) -> bool {
        self.non_null()
            .all(|(_, v)| v.base_type() == Some(BaseType::Integer))
    }

    pub fn into_inner(self) -> Vec<Option<Value>> {
        self.0
    }
}

impl From<Vec<Option<Value>>> for Operands {
    fn from(operands: Vec<Option<Value>>) -> Self {
        Self(operands)
    }
}

impl FromIterator<Option<Value>> for Operands {
    fn from_iter<T: IntoIterator<Item = Option<Value>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Operands {
    type Item = &'a Option<Value>;
    type IntoIter = std::slice::Iter<'a, Option<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
