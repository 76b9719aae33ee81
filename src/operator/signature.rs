//! Operator signatures: arity bounds and per-operand constraints.

use crate::expression::{ExpressionError, ExpressionResult};
use crate::operator::Operands;
use crate::value::{BaseType, Cardinality};
use std::fmt;

/// Allowed operand count, `max` unbounded when `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "exactly {}", max),
            Some(max) => write!(f, "between {} and {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Base types accepted for one operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseTypes {
    Any,
    Only(&'static [BaseType]),
}

impl BaseTypes {
    pub fn accepts(&self, base_type: BaseType) -> bool {
        match self {
            BaseTypes::Any => true,
            BaseTypes::Only(allowed) => allowed.contains(&base_type),
        }
    }
}

/// Cardinalities and base types accepted for one operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub cardinalities: &'static [Cardinality],
    pub base_types: BaseTypes,
}

impl Constraint {
    pub const fn new(cardinalities: &'static [Cardinality], base_types: BaseTypes) -> Self {
        Self {
            cardinalities,
            base_types,
        }
    }
}

/// Constraints applied to operand positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraints {
    /// Same constraint for every position
    Uniform(Constraint),
    /// One constraint per position
    Positional(&'static [Constraint]),
}

impl Constraints {
    fn at(&self, position: usize) -> Option<&Constraint> {
        match self {
            Constraints::Uniform(constraint) => Some(constraint),
            Constraints::Positional(constraints) => constraints.get(position),
        }
    }
}

/// The validation contract of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub arity: Arity,
    pub constraints: Constraints,
}

impl Signature {
    pub const fn new(arity: Arity, constraint: Constraint) -> Self {
        Self {
            arity,
            constraints: Constraints::Uniform(constraint),
        }
    }

    pub const fn positional(arity: Arity, constraints: &'static [Constraint]) -> Self {
        Self {
            arity,
            constraints: Constraints::Positional(constraints),
        }
    }

    /// Check the operand count
    pub fn check_arity(&self, operator: &'static str, count: usize) -> ExpressionResult<()> {
        if self.arity.accepts(count) {
            Ok(())
        } else {
            Err(ExpressionError::Arity {
                operator,
                expected: self.arity,
                actual: count,
            })
        }
    }

    /// Check cardinality and base type of every non-null operand
    pub fn check_operands(&self, operator: &'static str, operands: &Operands) -> ExpressionResult<()> {
        for (position, value) in operands.non_null() {
            let Some(constraint) = self.constraints.at(position) else {
                continue;
            };
            let cardinality = value.cardinality();
            if !constraint.cardinalities.contains(&cardinality) {
                return Err(ExpressionError::WrongCardinality {
                    operator,
                    position,
                    found: cardinality,
                });
            }
            if let Some(base_type) = value.base_type() {
                if !constraint.base_types.accepts(base_type) {
                    return Err(ExpressionError::WrongBaseType {
                        operator,
                        position,
                        found: base_type,
                    });
                }
            }
        }
        Ok(())
    }
}
