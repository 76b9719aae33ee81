//! String operators.

use crate::expression::{ExpressionError, ExpressionResult};
use crate::operator::Operands;
use crate::value::{Scalar, Value};
use regex::Regex;
use std::borrow::Cow;

fn text(operands: &Operands, position: usize) -> Option<&str> {
    operands.get(position)?.as_scalar().and_then(Scalar::as_str)
}

fn fold_case(s: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.to_lowercase())
    }
}

/// Byte-wise equality, or containment when `substring` is set
pub fn string_match(
    operands: &Operands,
    case_sensitive: bool,
    substring: bool,
) -> ExpressionResult<Option<Value>> {
    if operands.contains_null_like() {
        return Ok(None);
    }
    let (Some(a), Some(b)) = (text(operands, 0), text(operands, 1)) else {
        return Ok(None);
    };
    let (a, b) = (fold_case(a, case_sensitive), fold_case(b, case_sensitive));
    let result = if substring {
        b.contains(a.as_ref())
    } else {
        a.as_bytes() == b.as_bytes()
    };
    Ok(Some(Value::boolean(result)))
}

/// Check whether the first string occurs in the second
pub fn substring(operands: &Operands, case_sensitive: bool) -> ExpressionResult<Option<Value>> {
    if operands.contains_null() {
        return Ok(None);
    }
    let (Some(needle), Some(haystack)) = (text(operands, 0), text(operands, 1)) else {
        return Ok(None);
    };
    let needle = fold_case(needle, case_sensitive);
    let haystack = fold_case(haystack, case_sensitive);
    Ok(Some(Value::boolean(haystack.contains(needle.as_ref()))))
}

/// Match the whole string against `pattern`
pub fn pattern_match(operands: &Operands, pattern: &str) -> ExpressionResult<Option<Value>> {
    let Some(subject) = text(operands, 0) else {
        return Ok(None);
    };
    let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        ExpressionError::InvalidAttribute {
            operator: "patternMatch",
            message: format!("invalid pattern '{}': {}", pattern, e),
        }
    })?;
    Ok(Some(Value::boolean(regex.is_match(subject))))
}
