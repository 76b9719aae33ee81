//! Numeric operators.
//!
//! Integer results use checked arithmetic; a result that does not fit the
//! integer range, or a float result that is not finite, yields NULL.

use crate::expression::{ExpressionError, ExpressionResult, MathFunction, RoundingMode, StatsFunction};
use crate::operator::Operands;
use crate::value::{Scalar, Value};

/// Number view of every flattened operand element; `None` if any element
/// is NULL or nothing remains
fn numbers(operands: &Operands) -> Option<Vec<Scalar>> {
    if operands.contains_null_like() {
        return None;
    }
    let values: Option<Vec<Scalar>> = operands.flatten().into_iter().collect();
    values.filter(|v| !v.is_empty())
}

fn single_number(operands: &Operands, position: usize) -> Option<&Scalar> {
    operands.get(position).and_then(Value::as_scalar)
}

fn finite(value: f64) -> Option<Value> {
    value.is_finite().then(|| Value::float(value))
}

/// Integer value of an already integral float, if it fits
fn float_to_integer(value: f64) -> Option<Value> {
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Some(Value::integer(value as i32))
    } else {
        None
    }
}

fn fold_numbers(
    values: &[Scalar],
    int_op: fn(i32, i32) -> Option<i32>,
    float_op: fn(f64, f64) -> f64,
) -> Option<Value> {
    if values.iter().all(|v| matches!(v, Scalar::Integer(_))) {
        values
            .iter()
            .filter_map(Scalar::as_integer)
            .try_fold(None, |acc: Option<i32>, v| match acc {
                None => Some(Some(v)),
                Some(acc) => int_op(acc, v).map(Some),
            })
            .flatten()
            .map(Value::integer)
    } else {
        values
            .iter()
            .filter_map(Scalar::as_f64)
            .reduce(float_op)
            .and_then(finite)
    }
}

pub fn sum(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(numbers(operands).and_then(|v| fold_numbers(&v, i32::checked_add, |a, b| a + b)))
}

pub fn product(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(numbers(operands).and_then(|v| fold_numbers(&v, i32::checked_mul, |a, b| a * b)))
}

pub fn max(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(numbers(operands).and_then(|v| fold_numbers(&v, |a, b| Some(a.max(b)), f64::max)))
}

pub fn min(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(numbers(operands).and_then(|v| fold_numbers(&v, |a, b| Some(a.min(b)), f64::min)))
}

pub fn subtract(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let (Some(a), Some(b)) = (single_number(operands, 0), single_number(operands, 1)) else {
        return Ok(None);
    };
    Ok(match (a, b) {
        (Scalar::Integer(a), Scalar::Integer(b)) => a.checked_sub(*b).map(Value::integer),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => finite(a - b),
            _ => None,
        },
    })
}

/// Always a float; division by zero is NULL
pub fn divide(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let (Some(a), Some(b)) = (
        single_number(operands, 0).and_then(Scalar::as_f64),
        single_number(operands, 1).and_then(Scalar::as_f64),
    ) else {
        return Ok(None);
    };
    if b == 0.0 {
        return Ok(None);
    }
    Ok(finite(a / b))
}

pub fn power(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let (Some(base), Some(exponent)) = (
        single_number(operands, 0).and_then(Scalar::as_f64),
        single_number(operands, 1).and_then(Scalar::as_f64),
    ) else {
        return Ok(None);
    };
    Ok(finite(base.powf(exponent)))
}

fn integer_pair(operands: &Operands) -> Option<(i32, i32)> {
    let a = single_number(operands, 0).and_then(Scalar::as_integer)?;
    let b = single_number(operands, 1).and_then(Scalar::as_integer)?;
    Some((a, b))
}

/// Quotient rounded toward negative infinity
fn floor_div(a: i32, b: i32) -> Option<i32> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

pub fn integer_divide(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(integer_pair(operands)
        .filter(|(_, b)| *b != 0)
        .and_then(|(a, b)| floor_div(a, b))
        .map(Value::integer))
}

/// Remainder matching `integerDivide`: `(x div y) * y + (x mod y) == x`
pub fn integer_modulus(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(integer_pair(operands)
        .filter(|(_, b)| *b != 0)
        .and_then(|(a, b)| {
            let q = floor_div(a, b)?;
            let product = i64::from(q) * i64::from(b);
            i32::try_from(i64::from(a) - product).ok()
        })
        .map(Value::integer))
}

pub fn truncate(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(match single_number(operands, 0) {
        Some(Scalar::Integer(i)) => Some(Value::integer(*i)),
        Some(Scalar::Float(f)) => float_to_integer(f.trunc()),
        _ => None,
    })
}

/// Half values round up: `6.5 -> 7`, `-6.5 -> -6`
pub fn round(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(match single_number(operands, 0) {
        Some(Scalar::Integer(i)) => Some(Value::integer(*i)),
        Some(Scalar::Float(f)) => {
            let floor = f.floor();
            float_to_integer(if f - floor >= 0.5 { f.ceil() } else { floor })
        }
        _ => None,
    })
}

pub fn integer_to_float(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(single_number(operands, 0)
        .and_then(Scalar::as_integer)
        .map(|i| Value::float(f64::from(i))))
}

/// Round `value` per `mode`, checking `figures` first
pub(crate) fn round_to_figures(
    operator: &'static str,
    value: f64,
    mode: RoundingMode,
    figures: i32,
) -> ExpressionResult<f64> {
    match mode {
        RoundingMode::SignificantFigures if figures < 1 => {
            return Err(ExpressionError::InvalidAttribute {
                operator,
                message: format!("significantFigures requires figures >= 1, {} given", figures),
            })
        }
        RoundingMode::DecimalPlaces if figures < 0 => {
            return Err(ExpressionError::InvalidAttribute {
                operator,
                message: format!("decimalPlaces requires figures >= 0, {} given", figures),
            })
        }
        _ => {}
    }
    if !value.is_finite() || value == 0.0 {
        return Ok(value);
    }
    let places = match mode {
        RoundingMode::DecimalPlaces => figures,
        RoundingMode::SignificantFigures => figures - value.abs().log10().floor() as i32 - 1,
    };
    if places >= 0 {
        let magnitude = 10f64.powi(places);
        Ok((value * magnitude).round() / magnitude)
    } else {
        let magnitude = 10f64.powi(-places);
        Ok((value / magnitude).round() * magnitude)
    }
}

pub fn round_to(
    operands: &Operands,
    mode: RoundingMode,
    figures: i32,
) -> ExpressionResult<Option<Value>> {
    let Some(value) = single_number(operands, 0).and_then(Scalar::as_f64) else {
        return Ok(None);
    };
    if value.is_nan() {
        return Ok(None);
    }
    round_to_figures("roundTo", value, mode, figures).map(|v| Some(Value::float(v)))
}

/// Flattened integers with their absolute values; `None` on any NULL
fn magnitudes(operands: &Operands) -> Option<Vec<i64>> {
    numbers(operands).map(|values| {
        values
            .iter()
            .filter_map(Scalar::as_integer)
            .map(|i| i64::from(i).abs())
            .collect()
    })
}

fn gcd_of(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

pub fn gcd(operands: &Operands) -> ExpressionResult<Option<Value>> {
    Ok(magnitudes(operands)
        .map(|values| values.into_iter().fold(0, gcd_of))
        .and_then(|g| i32::try_from(g).ok())
        .map(Value::integer))
}

/// Least common multiple; zero when any value is zero
pub fn lcm(operands: &Operands) -> ExpressionResult<Option<Value>> {
    let Some(values) = magnitudes(operands) else {
        return Ok(None);
    };
    if values.contains(&0) {
        return Ok(Some(Value::integer(0)));
    }
    Ok(values
        .into_iter()
        .try_fold(1i64, |acc, v| (acc / gcd_of(acc, v)).checked_mul(v))
        .and_then(|l| i32::try_from(l).ok())
        .map(Value::integer))
}

pub fn math_operator(operands: &Operands, function: MathFunction) -> ExpressionResult<Option<Value>> {
    let Some(x) = single_number(operands, 0) else {
        return Ok(None);
    };
    let integer = x.as_integer();
    let Some(v) = x.as_f64() else {
        return Ok(None);
    };

    let result = match function {
        MathFunction::Sin => v.sin(),
        MathFunction::Cos => v.cos(),
        MathFunction::Tan => v.tan(),
        MathFunction::Sec => 1.0 / v.cos(),
        MathFunction::Csc => 1.0 / v.sin(),
        MathFunction::Cot => v.cos() / v.sin(),
        MathFunction::Asin => v.asin(),
        MathFunction::Acos => v.acos(),
        MathFunction::Atan => v.atan(),
        MathFunction::Atan2 => {
            let Some(x) = single_number(operands, 1).and_then(Scalar::as_f64) else {
                return Ok(None);
            };
            v.atan2(x)
        }
        MathFunction::Asec => (1.0 / v).acos(),
        MathFunction::Acsc => (1.0 / v).asin(),
        MathFunction::Acot => {
            if v == 0.0 {
                std::f64::consts::FRAC_PI_2
            } else {
                (1.0 / v).atan()
            }
        }
        MathFunction::Sinh => v.sinh(),
        MathFunction::Cosh => v.cosh(),
        MathFunction::Tanh => v.tanh(),
        MathFunction::Sech => 1.0 / v.cosh(),
        MathFunction::Csch => 1.0 / v.sinh(),
        MathFunction::Coth => v.cosh() / v.sinh(),
        MathFunction::Log => v.log10(),
        MathFunction::Ln => v.ln(),
        MathFunction::Exp => v.exp(),
        MathFunction::ToDegrees => v.to_degrees(),
        MathFunction::ToRadians => v.to_radians(),
        MathFunction::Abs => {
            return Ok(match integer {
                Some(i) => i.checked_abs().map(Value::integer),
                None => finite(v.abs()),
            })
        }
        MathFunction::Signum => {
            return Ok(if v.is_nan() {
                None
            } else if v == 0.0 {
                Some(Value::integer(0))
            } else {
                Some(Value::integer(v.signum() as i32))
            })
        }
        MathFunction::Floor => return Ok(float_to_integer(v.floor())),
        MathFunction::Ceil => return Ok(float_to_integer(v.ceil())),
    };
    Ok(finite(result))
}

pub fn stats_operator(operands: &Operands, function: StatsFunction) -> ExpressionResult<Option<Value>> {
    let Some(values) = numbers(operands) else {
        return Ok(None);
    };
    let values: Vec<f64> = values.iter().filter_map(Scalar::as_f64).collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squares = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();

    let result = match function {
        StatsFunction::Mean => Some(mean),
        StatsFunction::SampleVariance if values.len() > 1 => Some(squares / (n - 1.0)),
        StatsFunction::SampleSd if values.len() > 1 => Some((squares / (n - 1.0)).sqrt()),
        StatsFunction::PopVariance => Some(squares / n),
        StatsFunction::PopSd => Some((squares / n).sqrt()),
        StatsFunction::SampleVariance | StatsFunction::SampleSd => None,
    };
    Ok(result.and_then(finite))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{BaseType, Container};

    fn ints(values: &[i32]) -> Operands {
        values.iter().map(|i| Some(Value::integer(*i))).collect()
    }

    #[test]
    fn test_lcm() {
        assert_eq!(lcm(&ints(&[330, 65, 15])).unwrap(), Some(Value::integer(4290)));
        assert_eq!(lcm(&ints(&[330, 0])).unwrap(), Some(Value::integer(0)));
        assert_eq!(lcm(&ints(&[0, 330])).unwrap(), Some(Value::integer(0)));
        assert_eq!(lcm(&ints(&[330, 0, 15])).unwrap(), Some(Value::integer(0)));
        assert_eq!(lcm(&ints(&[-10, -5])).unwrap(), Some(Value::integer(10)));
        assert_eq!(lcm(&ints(&[330])).unwrap(), Some(Value::integer(330)));
    }

    #[test]
    fn test_lcm_flattens_containers() {
        let operands = Operands::from(vec![
            Some(Value::ordered(
                BaseType::Integer,
                [Scalar::Integer(330), Scalar::Integer(65)],
            )),
            Some(Value::multiple(BaseType::Integer, [Scalar::Integer(65)])),
        ]);
        assert_eq!(lcm(&operands).unwrap(), Some(Value::integer(4290)));
    }

    #[test]
    fn test_lcm_nulls() {
        assert_eq!(lcm(&Operands::from(vec![None])).unwrap(), None);
        assert_eq!(
            lcm(&Operands::from(vec![Some(Value::integer(10)), None])).unwrap(),
            None
        );
        let empty = Operands::from(vec![
            Some(Value::integer(10)),
            Some(Value::multiple(BaseType::Integer, [])),
        ]);
        assert_eq!(lcm(&empty).unwrap(), None);
        let null_element = Operands::from(vec![Some(Value::Ordered(
            Container::with_nullable_items(BaseType::Integer, [Some(Scalar::Integer(10)), None]),
        ))]);
        assert_eq!(lcm(&null_element).unwrap(), None);
    }

    #[test]
    fn test_lcm_overflow_is_null() {
        assert_eq!(lcm(&ints(&[i32::MAX, i32::MAX - 1])).unwrap(), None);
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&ints(&[45, 60, 330])).unwrap(), Some(Value::integer(15)));
        assert_eq!(gcd(&ints(&[0, 45])).unwrap(), Some(Value::integer(45)));
        assert_eq!(gcd(&ints(&[0, 0])).unwrap(), Some(Value::integer(0)));
        assert_eq!(gcd(&ints(&[-12, 8])).unwrap(), Some(Value::integer(4)));
        assert_eq!(gcd(&Operands::from(vec![None, Some(Value::integer(3))])).unwrap(), None);
    }

    #[test]
    fn test_sum_and_product() {
        assert_eq!(sum(&ints(&[1, 2, 3])).unwrap(), Some(Value::integer(6)));
        let mixed = Operands::from(vec![Some(Value::integer(1)), Some(Value::float(0.5))]);
        assert_eq!(sum(&mixed).unwrap(), Some(Value::float(1.5)));
        assert_eq!(product(&ints(&[2, 3, 4])).unwrap(), Some(Value::integer(24)));
        assert_eq!(sum(&ints(&[i32::MAX, 1])).unwrap(), None);
        assert_eq!(sum(&Operands::from(vec![Some(Value::integer(1)), None])).unwrap(), None);
    }

    #[test]
    fn test_min_max() {
        let values = Operands::from(vec![
            Some(Value::multiple(
                BaseType::Integer,
                [Scalar::Integer(3), Scalar::Integer(-4)],
            )),
            Some(Value::integer(10)),
        ]);
        assert_eq!(max(&values).unwrap(), Some(Value::integer(10)));
        assert_eq!(min(&values).unwrap(), Some(Value::integer(-4)));
        let mixed = Operands::from(vec![Some(Value::integer(3)), Some(Value::float(2.5))]);
        assert_eq!(max(&mixed).unwrap(), Some(Value::float(3.0)));
    }

    #[test]
    fn test_divide() {
        let operands = ints(&[1, 4]);
        assert_eq!(divide(&operands).unwrap(), Some(Value::float(0.25)));
        assert_eq!(divide(&ints(&[1, 0])).unwrap(), None);
        assert_eq!(subtract(&ints(&[1, 4])).unwrap(), Some(Value::integer(-3)));
    }

    #[test]
    fn test_integer_division_floors() {
        assert_eq!(integer_divide(&ints(&[7, 2])).unwrap(), Some(Value::integer(3)));
        assert_eq!(integer_divide(&ints(&[-7, 2])).unwrap(), Some(Value::integer(-4)));
        assert_eq!(integer_modulus(&ints(&[-7, 2])).unwrap(), Some(Value::integer(1)));
        assert_eq!(integer_modulus(&ints(&[7, -2])).unwrap(), Some(Value::integer(-1)));
        assert_eq!(integer_divide(&ints(&[7, 0])).unwrap(), None);
        assert_eq!(integer_modulus(&ints(&[7, 0])).unwrap(), None);
        assert_eq!(integer_divide(&ints(&[i32::MIN, -1])).unwrap(), None);
    }

    #[test]
    fn test_rounding() {
        let round_of = |f: f64| round(&Operands::from(vec![Some(Value::float(f))])).unwrap();
        assert_eq!(round_of(6.5), Some(Value::integer(7)));
        assert_eq!(round_of(-6.5), Some(Value::integer(-6)));
        assert_eq!(round_of(6.49), Some(Value::integer(6)));
        assert_eq!(round_of(0.49999999999999994), Some(Value::integer(0)));
        assert_eq!(round_of(-0.5), Some(Value::integer(0)));
        assert_eq!(round_of(f64::NAN), None);

        let truncate_of = |f: f64| truncate(&Operands::from(vec![Some(Value::float(f))])).unwrap();
        assert_eq!(truncate_of(-6.8), Some(Value::integer(-6)));
        assert_eq!(truncate_of(f64::INFINITY), None);
    }

    #[test]
    fn test_round_to() {
        let operands = Operands::from(vec![Some(Value::float(3.176))]);
        assert_eq!(
            round_to(&operands, RoundingMode::SignificantFigures, 3).unwrap(),
            Some(Value::float(3.18))
        );
        let operands = Operands::from(vec![Some(Value::float(1234.5678))]);
        assert_eq!(
            round_to(&operands, RoundingMode::SignificantFigures, 2).unwrap(),
            Some(Value::float(1200.0))
        );
        assert_eq!(
            round_to(&operands, RoundingMode::DecimalPlaces, 1).unwrap(),
            Some(Value::float(1234.6))
        );
        assert!(round_to(&operands, RoundingMode::SignificantFigures, 0).is_err());
        assert!(round_to(&operands, RoundingMode::DecimalPlaces, -1).is_err());
    }

    #[test]
    fn test_math_operator() {
        let one = Operands::from(vec![Some(Value::integer(-3))]);
        assert_eq!(
            math_operator(&one, MathFunction::Abs).unwrap(),
            Some(Value::integer(3))
        );
        assert_eq!(
            math_operator(&one, MathFunction::Signum).unwrap(),
            Some(Value::integer(-1))
        );
        let zero = Operands::from(vec![Some(Value::float(0.0))]);
        assert_eq!(math_operator(&zero, MathFunction::Ln).unwrap(), None);
        assert_eq!(
            math_operator(&zero, MathFunction::Exp).unwrap(),
            Some(Value::float(1.0))
        );
        let floor = Operands::from(vec![Some(Value::float(-1.5))]);
        assert_eq!(
            math_operator(&floor, MathFunction::Floor).unwrap(),
            Some(Value::integer(-2))
        );
        let atan2 = Operands::from(vec![Some(Value::float(1.0)), Some(Value::float(1.0))]);
        assert_eq!(
            math_operator(&atan2, MathFunction::Atan2).unwrap(),
            Some(Value::float(std::f64::consts::FRAC_PI_4))
        );
    }

    #[test]
    fn test_stats_operator() {
        let values = Operands::from(vec![Some(Value::ordered(
            BaseType::Integer,
            [2, 4, 4, 4, 5, 5, 7, 9].map(Scalar::Integer),
        ))]);
        assert_eq!(
            stats_operator(&values, StatsFunction::Mean).unwrap(),
            Some(Value::float(5.0))
        );
        assert_eq!(
            stats_operator(&values, StatsFunction::PopSd).unwrap(),
            Some(Value::float(2.0))
        );
        assert_eq!(
            stats_operator(&values, StatsFunction::PopVariance).unwrap(),
            Some(Value::float(4.0))
        );
        let single = Operands::from(vec![Some(Value::multiple(
            BaseType::Float,
            [Scalar::Float(1.0)],
        ))]);
        assert_eq!(
            stats_operator(&single, StatsFunction::SampleVariance).unwrap(),
            None
        );
    }
}
