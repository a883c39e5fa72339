//! Rectangle shape.

use super::{ShapeKind, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A rectangle shape with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            corner_radius: 0.0,
            style: ShapeKind::Rectangle.default_style(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(
            Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }
}

impl ShapeTrait for Rectangle {
    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        if self.style.fill_color.is_some() {
            return rect.inflate(tolerance, tolerance).contains(point);
        }
        // Outline only: hit on the border band.
        let band = tolerance + self.style.stroke_width / 2.0;
        rect.inflate(band, band).contains(point) && !rect.inflate(-band, -band).contains(point)
    }

    fn to_path(&self) -> BezPath {
        let radius = self
            .corner_radius
            .clamp(0.0, self.width.min(self.height).max(0.0) / 2.0);
        if radius > 0.0 {
            RoundedRect::from_rect(self.as_rect(), radius).to_path(0.1)
        } else {
            self.as_rect().to_path(0.1)
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        // Axis-aligned scale and translation only.
        self.position = affine * self.position;
        let coeffs = affine.as_coeffs();
        self.width *= coeffs[0].abs();
        self.height *= coeffs[3].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_filled_and_outline() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(105.0, 50.0), 10.0));

        rect.style.fill_color = None;
        assert!(!rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(0.5, 50.0), 0.0));
    }

    #[test]
    fn test_corner_radius_clamped_in_path() {
        let rect = Rectangle {
            corner_radius: 500.0,
            ..Rectangle::new(Point::ZERO, 40.0, 20.0)
        };
        let bounds = rect.to_path().bounding_box();
        assert!((bounds.width() - 40.0).abs() < 1e-6);
        assert!((bounds.height() - 20.0).abs() < 1e-6);
    }
}
