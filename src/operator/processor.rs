//! Operator processor: validates operands and dispatches to the operator.

use crate::expression::{ExpressionError, ExpressionResult, Operator};
use crate::operator::{
    arithmetic, comparison, container, custom, geometry, logic, signature, text,
    CustomOperatorResolver, Operands,
};
use crate::value::Value;
use rand::RngCore;
use std::fmt;

/// An operator bound to its evaluated operands
///
/// Construction checks the operand count; [`OperatorProcessor::process`]
/// checks cardinalities and base types before computing the result.
pub struct OperatorProcessor<'a> {
    operator: &'a Operator,
    operands: Operands,
    resolver: Option<&'a dyn CustomOperatorResolver>,
    rng: Option<&'a mut dyn RngCore>,
}

fn check_binding(operator: &Operator, operands: &Operands) -> ExpressionResult<()> {
    if let Operator::Custom(attributes) = operator {
        if attributes.class.is_none() {
            return Err(ExpressionError::MissingImplementationReference);
        }
    }
    signature(operator).check_arity(operator.name(), operands.len())
}

impl<'a> OperatorProcessor<'a> {
    pub fn new(operator: &'a Operator, operands: Operands) -> ExpressionResult<Self> {
        check_binding(operator, &operands)?;
        Ok(Self {
            operator,
            operands,
            resolver: None,
            rng: None,
        })
    }

    /// Resolve `customOperator` implementations through `resolver`
    pub fn with_resolver(mut self, resolver: &'a dyn CustomOperatorResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Draw random choices from `rng` instead of the thread-local generator
    pub fn with_rng(mut self, rng: &'a mut dyn RngCore) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn operator(&self) -> &Operator {
        self.operator
    }

    pub fn operands(&self) -> &Operands {
        &self.operands
    }

    /// Replace the operands, keeping the current ones if the count is rejected
    pub fn rebind_operands(&mut self, operands: Operands) -> ExpressionResult<()> {
        check_binding(self.operator, &operands)?;
        self.operands = operands;
        Ok(())
    }

    /// Replace the operator, keeping the current one if the operands do not fit it
    pub fn rebind_operator(&mut self, operator: &'a Operator) -> ExpressionResult<()> {
        check_binding(operator, &self.operands)?;
        self.operator = operator;
        Ok(())
    }

    pub fn process(&mut self) -> ExpressionResult<Option<Value>> {
        let Self {
            operator,
            operands,
            resolver,
            rng,
        } = self;
        let operator: &Operator = operator;
        signature(operator).check_operands(operator.name(), operands)?;

        match operator {
            Operator::And => logic::and(operands),
            Operator::Or => logic::or(operands),
            Operator::Not => logic::not(operands),
            Operator::AnyN { min, max } => logic::any_n(operands, *min, *max),

            Operator::Sum => arithmetic::sum(operands),
            Operator::Product => arithmetic::product(operands),
            Operator::Subtract => arithmetic::subtract(operands),
            Operator::Divide => arithmetic::divide(operands),
            Operator::Power => arithmetic::power(operands),
            Operator::IntegerDivide => arithmetic::integer_divide(operands),
            Operator::IntegerModulus => arithmetic::integer_modulus(operands),
            Operator::Truncate => arithmetic::truncate(operands),
            Operator::Round => arithmetic::round(operands),
            Operator::IntegerToFloat => arithmetic::integer_to_float(operands),
            Operator::RoundTo {
                rounding_mode,
                figures,
            } => arithmetic::round_to(operands, *rounding_mode, *figures),
            Operator::Max => arithmetic::max(operands),
            Operator::Min => arithmetic::min(operands),
            Operator::Gcd => arithmetic::gcd(operands),
            Operator::Lcm => arithmetic::lcm(operands),
            Operator::MathOperator { name } => arithmetic::math_operator(operands, *name),
            Operator::StatsOperator { name } => arithmetic::stats_operator(operands, *name),

            Operator::Gt => comparison::gt(operands),
            Operator::Lt => comparison::lt(operands),
            Operator::Gte => comparison::gte(operands),
            Operator::Lte => comparison::lte(operands),
            Operator::Equal {
                tolerance_mode,
                tolerance,
                include_lower_bound,
                include_upper_bound,
            } => comparison::equal(
                operands,
                *tolerance_mode,
                tolerance,
                *include_lower_bound,
                *include_upper_bound,
            ),
            Operator::EqualRounded {
                rounding_mode,
                figures,
            } => comparison::equal_rounded(operands, *rounding_mode, *figures),
            Operator::Match => comparison::matches(operands),
            Operator::DurationLt => comparison::duration_lt(operands),
            Operator::DurationGte => comparison::duration_gte(operands),

            Operator::StringMatch {
                case_sensitive,
                substring,
            } => text::string_match(operands, *case_sensitive, *substring),
            Operator::Substring { case_sensitive } => text::substring(operands, *case_sensitive),
            Operator::PatternMatch { pattern } => text::pattern_match(operands, pattern),

            Operator::Multiple => container::multiple(operands),
            Operator::Ordered => container::ordered(operands),
            Operator::ContainerSize => container::container_size(operands),
            Operator::IsNull => container::is_null(operands),
            Operator::Index { n } => container::index(operands, *n),
            Operator::FieldValue { field_identifier } => {
                container::field_value(operands, field_identifier)
            }
            Operator::Member => container::member(operands),
            Operator::Delete => container::delete(operands),
            Operator::Contains => container::contains(operands),
            Operator::Random => match rng.as_deref_mut() {
                Some(rng) => container::random(operands, rng),
                None => container::random(operands, &mut rand::thread_rng()),
            },
            Operator::Repeat { number_repeats } => container::repeat(operands, *number_repeats),

            Operator::Inside { coords } => geometry::inside(operands, coords),

            Operator::Custom(attributes) => custom::process(attributes, *resolver, operands),
        }
    }
}

impl fmt::Debug for OperatorProcessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorProcessor")
            .field("operator", &self.operator.name())
            .field("operands", &self.operands)
            .finish()
    }
}

/// Check and process `operator` over `operands` in one step
pub fn evaluate(operator: &Operator, operands: Operands) -> ExpressionResult<Option<Value>> {
    OperatorProcessor::new(operator, operands)?.process()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{CustomAttributes, ErrorKind};
    use crate::value::{BaseType, Scalar};

    fn ops(values: Vec<Option<Value>>) -> Operands {
        Operands::from(values)
    }

    #[test]
    fn test_arity_checked_at_construction() {
        let err = OperatorProcessor::new(&Operator::Gt, ops(vec![Some(Value::integer(1))]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);

        let err = OperatorProcessor::new(&Operator::Or, Operands::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
    }

    #[test]
    fn test_types_checked_at_process() {
        let operands = ops(vec![Some(Value::point(1, 2)), Some(Value::boolean(true))]);
        let mut processor = OperatorProcessor::new(&Operator::Or, operands).unwrap();
        let err = processor.process().unwrap_err();
        assert!(matches!(
            err,
            ExpressionError::WrongBaseType {
                operator: "or",
                position: 0,
                found: BaseType::Point,
            }
        ));

        let operands = ops(vec![
            Some(Value::multiple(BaseType::Boolean, [Scalar::Boolean(true)])),
        ]);
        let err = evaluate(&Operator::Not, operands).unwrap_err();
        assert!(matches!(err, ExpressionError::WrongCardinality { .. }));
    }

    #[test]
    fn test_null_operand_is_not_type_checked() {
        let operands = ops(vec![None, Some(Value::boolean(false))]);
        assert_eq!(evaluate(&Operator::Or, operands).unwrap(), None);
    }

    #[test]
    fn test_rebind() {
        let gt = Operator::Gt;
        let not = Operator::Not;
        let mut processor = OperatorProcessor::new(
            &gt,
            ops(vec![Some(Value::integer(2)), Some(Value::integer(1))]),
        )
        .unwrap();
        assert_eq!(processor.process().unwrap(), Some(Value::boolean(true)));

        assert!(processor.rebind_operator(&not).is_err());
        assert_eq!(processor.operator(), &Operator::Gt);

        assert!(processor.rebind_operands(ops(vec![None])).is_err());
        assert_eq!(processor.operands().len(), 2);

        processor
            .rebind_operands(ops(vec![Some(Value::integer(0)), Some(Value::integer(1))]))
            .unwrap();
        assert_eq!(processor.process().unwrap(), Some(Value::boolean(false)));
    }

    #[test]
    fn test_custom_without_class() {
        let operator = Operator::Custom(CustomAttributes::default());
        let err = OperatorProcessor::new(&operator, Operands::new()).unwrap_err();
        assert!(matches!(err, ExpressionError::MissingImplementationReference));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_random_with_seeded_rng() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let operator = Operator::Random;
        let container = Value::ordered(BaseType::Integer, [Scalar::Integer(9)]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut processor = OperatorProcessor::new(&operator, ops(vec![Some(container)]))
            .unwrap()
            .with_rng(&mut rng);
        assert_eq!(processor.process().unwrap(), Some(Value::integer(9)));
    }
}
