//! Area operators.

use crate::expression::ExpressionResult;
use crate::operator::Operands;
use crate::value::{Coords, Scalar, Value};

/// True if any point of the operand lies within `coords`
pub fn inside(operands: &Operands, coords: &Coords) -> ExpressionResult<Option<Value>> {
    let Some(value) = operands.get(0) else {
        return Ok(None);
    };
    if value.is_null_like() {
        return Ok(None);
    }
    let found = value
        .flatten()
        .iter()
        .flatten()
        .filter_map(Scalar::as_point)
        .any(|point| coords.contains(point));
    Ok(Some(Value::boolean(found)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{BaseType, Container, Point, Shape};

    fn rect() -> Coords {
        Coords::new(Shape::Rect, vec![0, 0, 10, 10]).unwrap()
    }

    #[test]
    fn test_inside_single_point() {
        let operands = Operands::from(vec![Some(Value::point(5, 5))]);
        assert_eq!(inside(&operands, &rect()).unwrap(), Some(Value::boolean(true)));
        let operands = Operands::from(vec![Some(Value::point(11, 5))]);
        assert_eq!(inside(&operands, &rect()).unwrap(), Some(Value::boolean(false)));
    }

    #[test]
    fn test_inside_any_point_of_container() {
        let points = Container::with_nullable_items(
            BaseType::Point,
            [
                None,
                Some(Scalar::Point(Point::new(20, 20))),
                Some(Scalar::Point(Point::new(3, 4))),
            ],
        );
        let operands = Operands::from(vec![Some(Value::Multiple(points))]);
        assert_eq!(inside(&operands, &rect()).unwrap(), Some(Value::boolean(true)));
    }

    #[test]
    fn test_inside_null() {
        assert_eq!(inside(&Operands::from(vec![None]), &rect()).unwrap(), None);
        let empty = Operands::from(vec![Some(Value::ordered(BaseType::Point, []))]);
        assert_eq!(inside(&empty, &rect()).unwrap(), None);
    }
}
