//! Isosceles triangle shape.

use super::{ShapeKind, ShapeStyle, ShapeTrait, point_to_polyline_dist};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// An upward-pointing isosceles triangle inscribed in its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triangle {
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
}

impl Triangle {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            style: ShapeKind::Triangle.default_style(),
        }
    }

    /// Apex, bottom-right and bottom-left corners.
    pub fn vertices(&self) -> [Point; 3] {
        let Point { x, y } = self.position;
        [
            Point::new(x + self.width / 2.0, y),
            Point::new(x + self.width, y + self.height),
            Point::new(x, y + self.height),
        ]
    }
}

impl ShapeTrait for Triangle {
    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let [a, b, c] = self.vertices();
        let edge_dist = point_to_polyline_dist(point, &[a, b, c, a]);
        if edge_dist <= tolerance + self.style.stroke_width / 2.0 {
            return true;
        }
        if self.style.fill_color.is_none() {
            return false;
        }
        let sign = |p1: Point, p2: Point, p3: Point| {
            (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
        };
        let d1 = sign(point, a, b);
        let d2 = sign(point, b, c);
        let d3 = sign(point, c, a);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    fn to_path(&self) -> BezPath {
        let [a, b, c] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(c);
        path.close_path();
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let coeffs = affine.as_coeffs();
        self.width *= coeffs[0].abs();
        self.height *= coeffs[3].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape as KurboShape;

    #[test]
    fn test_vertices_and_path() {
        let tri = Triangle::new(Point::ZERO, 100.0, 87.0);
        let [apex, right, left] = tri.vertices();
        assert_eq!(apex, Point::new(50.0, 0.0));
        assert_eq!(right, Point::new(100.0, 87.0));
        assert_eq!(left, Point::new(0.0, 87.0));
        assert_eq!(tri.to_path().bounding_box(), Rect::new(0.0, 0.0, 100.0, 87.0));
    }

    #[test]
    fn test_hit_test() {
        let mut tri = Triangle::new(Point::ZERO, 100.0, 87.0);
        assert!(tri.hit_test(Point::new(50.0, 60.0), 0.0));
        // Top-left corner of the box is outside the triangle.
        assert!(!tri.hit_test(Point::new(5.0, 5.0), 0.0));

        tri.style.fill_color = None;
        assert!(!tri.hit_test(Point::new(50.0, 60.0), 0.0));
        assert!(tri.hit_test(Point::new(50.0, 87.0), 0.0));
    }
}
