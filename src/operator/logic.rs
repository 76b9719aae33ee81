//! Boolean operators: and, or, not, anyN.

use crate::expression::ExpressionResult;
use crate::operator::Operands;
use crate::value::{Scalar, Value};

fn truth(operand: &Option<Value>) -> Option<bool> {
    operand
        .as_ref()
        .and_then(Value::as_scalar)
        .and_then(Scalar::as_bool)
}

/// False if any operand is false, else NULL if any is NULL, else true
pub fn and(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let mut saw_null = false;
    for operand in operands {
        match truth(operand) {
            Some(false) => return Ok(Some(Value::boolean(false))),
            Some(true) => {}
            None => saw_null = true,
        }
    }
    Ok((!saw_null).then(|| Value::boolean(true)))
}

/// True if any operand is true, else NULL if any is NULL, else false
pub fn or(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let mut saw_null = false;
    for operand in operands {
        match truth(operand) {
            Some(true) => return Ok(Some(Value::boolean(true))),
            Some(false) => {}
            None => saw_null = true,
        }
    }
    Ok((!saw_null).then(|| Value::boolean(false)))
}

pub fn not(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(operands.iter().next().and_then(truth).map(|b| Value::boolean(!b)))
}

/// True when the number of true operands lies in `[min, max]`
///
/// NULL operands may still turn true, so the result is NULL whenever the
/// count could still reach the window and false once it cannot.
pub fn any_n(operands: &Operands, min: i32, max: i32) -> ExpressionResult<Option<Value>> {
    let mut trues: i64 = 0;
    let mut nulls: i64 = 0;
    for operand in operands {
        match truth(operand) {
            Some(true) => trues += 1,
            Some(false) => {}
            None => nulls += 1,
        }
    }
    let (min, max) = (i64::from(min), i64::from(max));
    if trues >= min && trues <= max {
        Ok(Some(Value::boolean(true)))
    } else if trues < min && trues + nulls >= min && trues <= max {
        Ok(None)
    } else {
        Ok(Some(Value::boolean(false)))
    }
}
