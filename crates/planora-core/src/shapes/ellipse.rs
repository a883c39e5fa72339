//! Ellipse and circle shapes.

use super::{ShapeKind, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An ellipse. Circles are ellipses with equal radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    pub style: ShapeStyle,
}

impl Ellipse {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            style: ShapeKind::Ellipse.default_style(),
        }
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Self {
            style: ShapeKind::Circle.default_style(),
            ..Self::new(center, radius, radius)
        }
    }

    /// Create an ellipse filling a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }

    /// Distance of `point` from the centre relative to the ellipse grown
    /// by `grow` on both radii; 1.0 lies on the outline.
    fn normalised_distance(&self, point: Point, grow: f64) -> f64 {
        let v = point - self.center;
        Vec2::new(v.x / (self.radius_x + grow), v.y / (self.radius_y + grow)).hypot()
    }

    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, (self.radius_x, self.radius_y), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.center.x + self.radius_x,
            self.center.y + self.radius_y,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.style.stroke_width / 2.0;
        let outer = self.normalised_distance(point, reach);
        if outer > 1.0 {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        // Unfilled: only the outline band counts.
        if self.radius_x <= reach || self.radius_y <= reach {
            return true;
        }
        self.normalised_distance(point, -reach) >= 1.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.center = affine * self.center;
        let coeffs = affine.as_coeffs();
        self.radius_x *= coeffs[0].abs();
        self.radius_y *= coeffs[3].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_uses_circle_style() {
        let circle = Ellipse::circle(Point::new(0.0, 0.0), 10.0);
        assert!((circle.radius_x - circle.radius_y).abs() < f64::EPSILON);
        assert_eq!(circle.style, ShapeKind::Circle.default_style());
    }

    #[test]
    fn test_hit_test_edge() {
        let circle = Ellipse::circle(Point::new(0.0, 0.0), 10.0);
        assert!(circle.hit_test(Point::new(10.0, 0.0), 0.0));
        assert!(!circle.hit_test(Point::new(15.0, 0.0), 0.0));
    }

    #[test]
    fn test_outline_only_ignores_interior() {
        let mut ellipse = Ellipse::new(Point::new(0.0, 0.0), 40.0, 20.0);
        ellipse.style.fill_color = None;
        assert!(!ellipse.hit_test(Point::new(0.0, 0.0), 2.0));
        assert!(ellipse.hit_test(Point::new(40.0, 0.0), 2.0));
        assert!(ellipse.hit_test(Point::new(0.0, -21.0), 2.0));
    }

    #[test]
    fn test_bounds() {
        let ellipse = Ellipse::new(Point::new(50.0, 50.0), 30.0, 20.0);
        assert_eq!(ellipse.bounds(), Rect::new(20.0, 30.0, 80.0, 70.0));
    }
}
