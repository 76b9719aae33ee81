//! Operator library.
//!
//! Every built-in operator declares a [`Signature`]: its arity bounds plus the
//! cardinalities and base types it accepts per operand. The
//! [`OperatorProcessor`] checks the signature and then dispatches to the
//! operator's implementation in one of the submodules below.

pub mod arithmetic;
pub mod comparison;
pub mod container;
pub mod custom;
pub mod geometry;
pub mod logic;
pub mod operands;
pub mod processor;
pub mod signature;
pub mod text;

pub use custom::{
    CustomOperator, CustomOperatorContext, CustomOperatorRegistry, CustomOperatorResolver,
};
pub use operands::Operands;
pub use processor::{evaluate, OperatorProcessor};
pub use signature::{Arity, BaseTypes, Constraint, Constraints, Signature};

use crate::expression::{MathFunction, Operator};
use crate::value::{BaseType, Cardinality};

const SINGLE: &[Cardinality] = &[Cardinality::Single];

const SINGLE_BOOLEAN: Constraint = Constraint::new(SINGLE, BaseTypes::Only(&[BaseType::Boolean]));
const SINGLE_NUMERIC: Constraint = Constraint::new(SINGLE, BaseTypes::Only(&BaseType::NUMERIC));
const SINGLE_INTEGER: Constraint = Constraint::new(SINGLE, BaseTypes::Only(&[BaseType::Integer]));
const SINGLE_STRING: Constraint = Constraint::new(SINGLE, BaseTypes::Only(&[BaseType::String]));
const SINGLE_DURATION: Constraint =
    Constraint::new(SINGLE, BaseTypes::Only(&[BaseType::Duration]));

const FLAT_NUMERIC: Constraint = Constraint::new(
    &Cardinality::FLATTENABLE,
    BaseTypes::Only(&BaseType::NUMERIC),
);
const FLAT_INTEGER: Constraint = Constraint::new(
    &Cardinality::FLATTENABLE,
    BaseTypes::Only(&[BaseType::Integer]),
);
const FLAT_POINT: Constraint =
    Constraint::new(&Cardinality::FLATTENABLE, BaseTypes::Only(&[BaseType::Point]));
const FLAT_ANY: Constraint = Constraint::new(&Cardinality::FLATTENABLE, BaseTypes::Any);
const CONTAINER_NUMERIC: Constraint = Constraint::new(
    &Cardinality::CONTAINERS,
    BaseTypes::Only(&BaseType::NUMERIC),
);
const CONTAINER_ANY: Constraint = Constraint::new(&Cardinality::CONTAINERS, BaseTypes::Any);
const ANYTHING: Constraint = Constraint::new(&Cardinality::ALL, BaseTypes::Any);

/// Every base type except duration
const NOT_DURATION: BaseTypes = BaseTypes::Only(&[
    BaseType::Identifier,
    BaseType::Boolean,
    BaseType::Integer,
    BaseType::Float,
    BaseType::String,
    BaseType::Point,
    BaseType::Pair,
    BaseType::DirectedPair,
    BaseType::File,
    BaseType::Uri,
    BaseType::IntOrIdentifier,
]);
const MEMBERSHIP: &[Constraint] = &[
    Constraint::new(SINGLE, NOT_DURATION),
    Constraint::new(&Cardinality::CONTAINERS, NOT_DURATION),
];

/// The validation contract of `operator`
pub fn signature(operator: &Operator) -> Signature {
    use Operator::*;

    match operator {
        And | Or | AnyN { .. } => Signature::new(Arity::at_least(1), SINGLE_BOOLEAN),
        Not => Signature::new(Arity::exactly(1), SINGLE_BOOLEAN),

        Sum | Product | Max | Min => Signature::new(Arity::at_least(1), FLAT_NUMERIC),
        Subtract | Divide | Power => Signature::new(Arity::exactly(2), SINGLE_NUMERIC),
        IntegerDivide | IntegerModulus => Signature::new(Arity::exactly(2), SINGLE_INTEGER),
        Truncate | Round | RoundTo { .. } => Signature::new(Arity::exactly(1), SINGLE_NUMERIC),
        IntegerToFloat => Signature::new(Arity::exactly(1), SINGLE_INTEGER),
        Gcd | Lcm => Signature::new(Arity::at_least(1), FLAT_INTEGER),
        MathOperator {
            name: MathFunction::Atan2,
        } => Signature::new(Arity::exactly(2), SINGLE_NUMERIC),
        MathOperator { .. } => Signature::new(Arity::exactly(1), SINGLE_NUMERIC),
        StatsOperator { .. } => Signature::new(Arity::exactly(1), CONTAINER_NUMERIC),

        Gt | Lt | Gte | Lte | Equal { .. } | EqualRounded { .. } => {
            Signature::new(Arity::exactly(2), SINGLE_NUMERIC)
        }
        Match => Signature::new(Arity::exactly(2), ANYTHING),
        DurationLt | DurationGte => Signature::new(Arity::exactly(2), SINGLE_DURATION),

        StringMatch { .. } | Substring { .. } => Signature::new(Arity::exactly(2), SINGLE_STRING),
        PatternMatch { .. } => Signature::new(Arity::exactly(1), SINGLE_STRING),

        Multiple => Signature::new(
            Arity::at_least(0),
            Constraint::new(&[Cardinality::Single, Cardinality::Multiple], BaseTypes::Any),
        ),
        Ordered => Signature::new(
            Arity::at_least(0),
            Constraint::new(&[Cardinality::Single, Cardinality::Ordered], BaseTypes::Any),
        ),
        ContainerSize | Random => Signature::new(Arity::exactly(1), CONTAINER_ANY),
        IsNull => Signature::new(Arity::exactly(1), ANYTHING),
        Index { .. } => Signature::new(
            Arity::exactly(1),
            Constraint::new(&[Cardinality::Ordered], BaseTypes::Any),
        ),
        FieldValue { .. } => Signature::new(
            Arity::exactly(1),
            Constraint::new(&[Cardinality::Record], BaseTypes::Any),
        ),
        Member | Delete => Signature::positional(Arity::exactly(2), MEMBERSHIP),
        Contains => Signature::new(
            Arity::exactly(2),
            Constraint::new(&Cardinality::CONTAINERS, NOT_DURATION),
        ),
        Repeat { .. } => Signature::new(Arity::at_least(1), FLAT_ANY),

        Inside { .. } => Signature::new(Arity::exactly(1), FLAT_POINT),

        Custom(_) => Signature::new(Arity::at_least(0), ANYTHING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_operator_arity() {
        let atan2 = Operator::MathOperator {
            name: MathFunction::Atan2,
        };
        assert_eq!(signature(&atan2).arity, Arity::exactly(2));
        let sin = Operator::MathOperator {
            name: MathFunction::Sin,
        };
        assert_eq!(signature(&sin).arity, Arity::exactly(1));
    }

    #[test]
    fn test_membership_is_positional() {
        let signature = signature(&Operator::Member);
        assert_eq!(signature.constraints, Constraints::Positional(MEMBERSHIP));
    }

    #[test]
    fn test_constructors_accept_no_operands() {
        assert!(signature(&Operator::Multiple).arity.accepts(0));
        assert!(signature(&Operator::Ordered).arity.accepts(0));
        assert!(!signature(&Operator::Or).arity.accepts(0));
    }
}
