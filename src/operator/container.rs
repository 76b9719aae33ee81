//! Container operators.
//!
//! Construction (`multiple`, `ordered`, `repeat`), inspection (`containerSize`,
//! `isNull`, `index`, `fieldValue`, `random`) and membership (`member`,
//! `delete`, `contains`).

use crate::expression::{ExpressionError, ExpressionResult};
use crate::operator::Operands;
use crate::value::{BaseType, Cardinality, Container, Scalar, Value};
use rand::{Rng, RngCore};

/// Find the base type shared by every non-null-like operand
fn shared_base_type(
    operator: &'static str,
    operands: &Operands,
) -> ExpressionResult<Option<BaseType>> {
    let mut shared: Option<BaseType> = None;
    for (position, value) in operands.non_null() {
        if value.is_null_like() {
            continue;
        }
        let Some(found) = value.base_type() else {
            continue;
        };
        match shared {
            None => shared = Some(found),
            Some(expected) if expected != found => {
                return Err(ExpressionError::MixedBaseTypes {
                    operator,
                    position,
                    expected,
                    found,
                })
            }
            Some(_) => {}
        }
    }
    Ok(shared)
}

fn gather(
    operator: &'static str,
    operands: &Operands,
    cardinality: Cardinality,
) -> ExpressionResult<Option<Value>> {
    let Some(base_type) = shared_base_type(operator, operands)? else {
        return Ok(None);
    };
    let items = operands
        .non_null()
        .filter(|(_, v)| !v.is_null_like())
        .flat_map(|(_, v)| v.flatten());
    let container = Container::with_nullable_items(base_type, items);
    Ok(Some(match cardinality {
        Cardinality::Ordered => Value::Ordered(container),
        _ => Value::Multiple(container),
    }))
}

/// Gather singles and multiples into one multiple container
pub fn multiple(operands: &Operands) -> ExpressionResult<Option<Value>> {
    gather("multiple", operands, Cardinality::Multiple)
}

/// Gather singles and ordered containers into one ordered container
pub fn ordered(operands: &Operands) -> ExpressionResult<Option<Value>> {
    gather("ordered", operands, Cardinality::Ordered)
}

pub fn container_size(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let size = operands
        .get(0)
        .and_then(Value::as_container)
        .map_or(0, Container::len);
    let size = i32::try_from(size).map_err(|_| ExpressionError::Evaluation {
        operator: "containerSize",
        message: format!("container size {} does not fit an integer", size),
    })?;
    Ok(Some(Value::integer(size)))
}

pub fn is_null(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let null = operands.get(0).map_or(true, Value::is_null_like);
    Ok(Some(Value::boolean(null)))
}

/// Get the `n`th element (1-based) of an ordered container
pub fn index(operands: &Operands, n: i32) -> ExpressionResult<Option<Value>> {
    let Some(container) = operands.get(0).and_then(Value::as_container) else {
        return Ok(None);
    };
    let Some(position) = usize::try_from(n).ok().and_then(|n| n.checked_sub(1)) else {
        return Ok(None);
    };
    Ok(container
        .items()
        .get(position)
        .cloned()
        .flatten()
        .map(Value::Single))
}

pub fn field_value(operands: &Operands, field_identifier: &str) -> ExpressionResult<Option<Value>> {
    Ok(operands
        .get(0)
        .and_then(Value::as_record)
        .and_then(|record| record.get(field_identifier))
        .cloned()
        .flatten()
        .map(Value::Single))
}

/// Scalar and container operands of `member` and `delete`, base types checked
fn scalar_and_container<'a>(
    operator: &'static str,
    operands: &'a Operands,
) -> ExpressionResult<Option<(&'a Scalar, &'a Value)>> {
    if operands.contains_null_like() {
        return Ok(None);
    }
    let (Some(item), Some(container)) = (
        operands.get(0).and_then(Value::as_scalar),
        operands.get(1),
    ) else {
        return Ok(None);
    };
    if let Some(expected) = container.base_type() {
        if item.base_type() != expected {
            return Err(ExpressionError::MixedBaseTypes {
                operator,
                position: 0,
                expected,
                found: item.base_type(),
            });
        }
    }
    Ok(Some((item, container)))
}

pub fn member(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let Some((item, container)) = scalar_and_container("member", operands)? else {
        return Ok(None);
    };
    let found = container
        .as_container()
        .map_or(false, |c| c.contains(&Some(item.clone())));
    Ok(Some(Value::boolean(found)))
}

/// Remove every occurrence of the first operand from the second
pub fn delete(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let Some((item, value)) = scalar_and_container("delete", operands)? else {
        return Ok(None);
    };
    let Some(container) = value.as_container() else {
        return Ok(None);
    };
    let kept = container
        .iter()
        .filter(|i| i.as_ref() != Some(item))
        .cloned();
    let container = Container::with_nullable_items(container.base_type(), kept);
    Ok(Some(match value.cardinality() {
        Cardinality::Ordered => Value::Ordered(container),
        _ => Value::Multiple(container),
    }))
}

fn is_subsequence(haystack: &[Option<Scalar>], needle: &[Option<Scalar>]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

fn is_sub_multiset(haystack: &Container, needle: &Container) -> bool {
    needle
        .iter()
        .all(|item| needle.occurrences(item) <= haystack.occurrences(item))
}

/// Check whether the second container is contained in the first
///
/// For ordered containers the elements must appear as one contiguous run;
/// for multiple containers every element must appear at least as often.
pub fn contains(operands: &Operands) -> ExpressionResult<Option<Value>> {
    if operands.contains_null_like() {
        return Ok(None);
    }
    let (Some(a), Some(b)) = (operands.get(0), operands.get(1)) else {
        return Ok(None);
    };
    if a.cardinality() != b.cardinality() {
        return Err(ExpressionError::MixedCardinalities {
            operator: "contains",
            position: 1,
            expected: a.cardinality(),
            found: b.cardinality(),
        });
    }
    let (Some(haystack), Some(needle)) = (a.as_container(), b.as_container()) else {
        return Ok(None);
    };
    if haystack.base_type() != needle.base_type() {
        return Err(ExpressionError::MixedBaseTypes {
            operator: "contains",
            position: 1,
            expected: haystack.base_type(),
            found: needle.base_type(),
        });
    }
    let result = match a.cardinality() {
        Cardinality::Ordered => is_subsequence(haystack.items(), needle.items()),
        _ => is_sub_multiset(haystack, needle),
    };
    Ok(Some(Value::boolean(result)))
}

/// Pick one element of a container at random
pub fn random(operands: &Operands, rng: &mut dyn RngCore) -> ExpressionResult<Option<Value>> {
    let Some(container) = operands.get(0).and_then(Value::as_container) else {
        return Ok(None);
    };
    if container.is_empty() {
        return Ok(None);
    }
    let position = rng.gen_range(0..container.len());
    Ok(container
        .items()
        .get(position)
        .cloned()
        .flatten()
        .map(Value::Single))
}

/// Concatenate the flattened operands `number_repeats` times
///
/// NULL and empty operands are skipped; the result is NULL when nothing
/// remains to repeat.
pub fn repeat(operands: &Operands, number_repeats: i32) -> ExpressionResult<Option<Value>> {
    let Ok(times) = usize::try_from(number_repeats) else {
        return Ok(None);
    };
    if times == 0 {
        return Ok(None);
    }
    let Some(base_type) = shared_base_type("repeat", operands)? else {
        return Ok(None);
    };
    let once: Vec<Option<Scalar>> = operands
        .non_null()
        .filter(|(_, v)| !v.is_null_like())
        .flat_map(|(_, v)| v.flatten())
        .collect();
    if once.is_empty() {
        return Ok(None);
    }
    let items = std::iter::repeat(once).take(times).flatten();
    Ok(Some(Value::Ordered(Container::with_nullable_items(
        base_type, items,
    ))))
}
