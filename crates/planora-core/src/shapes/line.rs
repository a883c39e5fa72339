//! Straight line connector.

use super::{ShapeKind, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{Affine, BezPath, Line as KurboLine, Point, Rect};
use serde::{Deserialize, Serialize};

/// How the ends of an open stroke are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl LineCap {
    pub fn next(self) -> Self {
        match self {
            LineCap::Butt => LineCap::Round,
            LineCap::Round => LineCap::Square,
            LineCap::Square => LineCap::Butt,
        }
    }
}

/// A straight line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub cap: LineCap,
    pub style: ShapeStyle,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            cap: LineCap::default(),
            style: ShapeKind::Line.default_style(),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.start, self.end)
    }
}

impl ShapeTrait for Line {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if self.start == self.end {
            return path;
        }
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.start = affine * self.start;
        self.end = affine * self.end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_midpoint() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!((line.length() - 100.0 * 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(line.midpoint(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_hit_test_on_line() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 0.0), 1.0));
        assert!(line.hit_test(Point::new(50.0, 2.0), 5.0));
        assert!(!line.hit_test(Point::new(50.0, 20.0), 5.0));
    }

    #[test]
    fn test_degenerate_line_has_empty_path() {
        let line = Line::new(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert!(line.to_path().elements().is_empty());
    }
}
