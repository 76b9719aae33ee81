//! Comparison operators.

use crate::expression::{ExpressionError, ExpressionResult, RoundingMode, ToleranceMode};
use crate::operator::{arithmetic, Operands};
use crate::value::{Scalar, Value};
use std::cmp::Ordering;
use std::time::Duration;

fn number_pair(operands: &Operands) -> Option<(f64, f64)> {
    if operands.contains_null_like() {
        return None;
    }
    let a = operands.get(0)?.as_scalar()?.as_f64()?;
    let b = operands.get(1)?.as_scalar()?.as_f64()?;
    Some((a, b))
}

fn compare_numbers<F>(operands: &Operands, cmp_fn: F) -> ExpressionResult<Option<Value>>
where
    F: FnOnce(Ordering) -> bool,
{
    Ok(number_pair(operands)
        .and_then(|(a, b)| a.partial_cmp(&b))
        .map(|ordering| Value::boolean(cmp_fn(ordering))))
}

pub fn gt(operands: &Operands) -> ExpressionResult<Option<Value>> {
    compare_numbers(operands, Ordering::is_gt)
}

pub fn lt(operands: &Operands) -> ExpressionResult<Option<Value>> {
    compare_numbers(operands, Ordering::is_lt)
}

pub fn gte(operands: &Operands) -> ExpressionResult<Option<Value>> {
    compare_numbers(operands, Ordering::is_ge)
}

pub fn lte(operands: &Operands) -> ExpressionResult<Option<Value>> {
    compare_numbers(operands, Ordering::is_le)
}

fn tolerances(tolerance: &[f64]) -> ExpressionResult<(f64, f64)> {
    let (lower, upper) = match tolerance {
        [t0] => (*t0, *t0),
        [t0, t1] => (*t0, *t1),
        _ => {
            return Err(ExpressionError::InvalidAttribute {
                operator: "equal",
                message: format!("expected 1 or 2 tolerance values, {} given", tolerance.len()),
            })
        }
    };
    if lower < 0.0 || upper < 0.0 || lower.is_nan() || upper.is_nan() {
        return Err(ExpressionError::InvalidAttribute {
            operator: "equal",
            message: "tolerance values must be non-negative".to_string(),
        });
    }
    Ok((lower, upper))
}

/// Equality of two numbers, exact or within a tolerance window around the first
///
/// In absolute mode the second operand must lie in `[x - t0, x + t1]`; in
/// relative mode in `[x * (1 - t0 / 100), x * (1 + t1 / 100)]`.
pub fn equal(
    operands: &Operands,
    mode: ToleranceMode,
    tolerance: &[f64],
    include_lower_bound: bool,
    include_upper_bound: bool,
) -> ExpressionResult<Option<Value>> {
    let Some((x, y)) = number_pair(operands) else {
        return Ok(None);
    };
    let (lower, upper) = match mode {
        ToleranceMode::Exact => return Ok(Some(Value::boolean(x == y))),
        ToleranceMode::Absolute => {
            let (t0, t1) = tolerances(tolerance)?;
            (x - t0, x + t1)
        }
        ToleranceMode::Relative => {
            let (t0, t1) = tolerances(tolerance)?;
            (x * (1.0 - t0 / 100.0), x * (1.0 + t1 / 100.0))
        }
    };
    let above_lower = if include_lower_bound { y >= lower } else { y > lower };
    let below_upper = if include_upper_bound { y <= upper } else { y < upper };
    Ok(Some(Value::boolean(above_lower && below_upper)))
}

pub fn equal_rounded(
    operands: &Operands,
    mode: RoundingMode,
    figures: i32,
) -> ExpressionResult<Option<Value>> {
    let Some((x, y)) = number_pair(operands) else {
        return Ok(None);
    };
    let x = arithmetic::round_to_figures("equalRounded", x, mode, figures)?;
    let y = arithmetic::round_to_figures("equalRounded", y, mode, figures)?;
    Ok(Some(Value::boolean(x == y)))
}

/// Value equality between operands of identical cardinality and base type
pub fn matches(operands: &Operands) -> ExpressionResult<Option<Value>> {
    if operands.contains_null_like() {
        return Ok(None);
    }
    let (Some(a), Some(b)) = (operands.get(0), operands.get(1)) else {
        return Ok(None);
    };
    if a.cardinality() != b.cardinality() {
        return Err(ExpressionError::MixedCardinalities {
            operator: "match",
            position: 1,
            expected: a.cardinality(),
            found: b.cardinality(),
        });
    }
    if let (Some(expected), Some(found)) = (a.base_type(), b.base_type()) {
        if expected != found {
            return Err(ExpressionError::MixedBaseTypes {
                operator: "match",
                position: 1,
                expected,
                found,
            });
        }
    }
    Ok(Some(Value::boolean(a == b)))
}

fn durations(operands: &Operands) -> Option<(Duration, Duration)> {
    let a = operands.get(0)?.as_scalar().and_then(Scalar::as_duration)?;
    let b = operands.get(1)?.as_scalar().and_then(Scalar::as_duration)?;
    Some((a, b))
}

pub fn duration_lt(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(durations(operands).map(|(a, b)| Value::boolean(a < b)))
}

pub fn duration_gte(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(durations(operands).map(|(a, b)| Value::boolean(a >= b)))
}
