//! Shapes and coordinates used by area-based operators.

use crate::value::{Point, ValueError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Area shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shape {
    Default,
    Rect,
    Circle,
    Poly,
    Ellipse,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Default => "default",
            Shape::Rect => "rect",
            Shape::Circle => "circle",
            Shape::Poly => "poly",
            Shape::Ellipse => "ellipse",
        })
    }
}

/// A shape together with its coordinates
///
/// - rect: left-x, top-y, right-x, bottom-y
/// - circle: center-x, center-y, radius
/// - ellipse: center-x, center-y, h-radius, v-radius
/// - poly: x1, y1, ..., xn, yn (at least 3 vertices; the first vertex may be repeated last)
/// - default: no coordinates, covers the whole plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coords {
    shape: Shape,
    values: Vec<i32>,
}

impl Coords {
    pub fn new(shape: Shape, values: Vec<i32>) -> Result<Self, ValueError> {
        let valid = match shape {
            Shape::Default => values.is_empty(),
            Shape::Rect | Shape::Ellipse => values.len() == 4,
            Shape::Circle => values.len() == 3,
            Shape::Poly => values.len() >= 6 && values.len() % 2 == 0,
        };
        if !valid {
            return Err(ValueError::InvalidCoords {
                shape,
                found: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Check whether `point` lies within the area (edges included)
    pub fn contains(&self, point: Point) -> bool {
        match (self.shape, self.values.as_slice()) {
            (Shape::Default, _) => true,
            (Shape::Rect, &[x1, y1, x2, y2]) => {
                (x1.min(x2)..=x1.max(x2)).contains(&point.x)
                    && (y1.min(y2)..=y1.max(y2)).contains(&point.y)
            }
            (Shape::Circle, &[cx, cy, r]) => {
                let dx = i64::from(point.x) - i64::from(cx);
                let dy = i64::from(point.y) - i64::from(cy);
                let r = i64::from(r);
                dx * dx + dy * dy <= r * r
            }
            (Shape::Ellipse, &[cx, cy, h, k]) => {
                if h == 0 || k == 0 {
                    return false;
                }
                let (h, k) = (f64::from(h), f64::from(k));
                let dx = f64::from(point.x) - f64::from(cx);
                let dy = f64::from(point.y) - f64::from(cy);
                (dx * dx) / (h * h) + (dy * dy) / (k * k) <= 1.0
            }
            (Shape::Poly, values) if values.len() >= 6 => self.poly_contains(point),
            _ => false,
        }
    }

    fn poly_contains(&self, point: Point) -> bool {
        let vertices: Vec<(f64, f64)> = self
            .values
            .chunks_exact(2)
            .map(|c| (f64::from(c[0]), f64::from(c[1])))
            .collect();
        let (px, py) = (f64::from(point.x), f64::from(point.y));

        // Points on an edge count as inside.
        let on_edge = vertices.iter().zip(vertices.iter().cycle().skip(1)).any(
            |(&(x1, y1), &(x2, y2))| {
                let cross = (x2 - x1) * (py - y1) - (y2 - y1) * (px - x1);
                cross == 0.0
                    && px >= x1.min(x2)
                    && px <= x1.max(x2)
                    && py >= y1.min(y2)
                    && py <= y1.max(y2)
            },
        );
        if on_edge {
            return true;
        }

        let mut inside = false;
        let mut j = vertices.len() - 1;
        for i in 0..vertices.len() {
            let (xi, yi) = vertices[i];
            let (xj, yj) = vertices[j];
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
