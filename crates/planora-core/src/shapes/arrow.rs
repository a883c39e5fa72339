//! Arrow connector.

use super::line::LineCap;
use super::{ShapeKind, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Arrowhead drawn at either end of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowHead {
    None,
    /// Two open strokes.
    #[default]
    Open,
    /// Closed, filled triangle.
    Triangle,
}

impl ArrowHead {
    pub fn next(self) -> Self {
        match self {
            ArrowHead::None => ArrowHead::Open,
            ArrowHead::Open => ArrowHead::Triangle,
            ArrowHead::Triangle => ArrowHead::None,
        }
    }
}

/// A straight arrow with configurable heads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub start: Point,
    /// End point (where the default arrowhead points).
    pub end: Point,
    pub head_size: f64,
    #[serde(default)]
    pub start_head: ArrowHead,
    #[serde(default = "default_end_head")]
    pub end_head: ArrowHead,
    #[serde(default)]
    pub cap: LineCap,
    pub style: ShapeStyle,
}

fn default_end_head() -> ArrowHead {
    ArrowHead::Open
}

impl Arrow {
    pub const DEFAULT_HEAD_SIZE: f64 = 15.0;

    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            head_size: Self::DEFAULT_HEAD_SIZE,
            start_head: ArrowHead::None,
            end_head: ArrowHead::Open,
            cap: LineCap::default(),
            style: ShapeKind::Arrow.default_style(),
        }
    }

    /// Normalized direction from start to end.
    pub fn direction(&self) -> Vec2 {
        let d = self.end - self.start;
        let len = d.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            d / len
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Left and right barb points of a head at `tip` pointing along `dir`.
    fn barbs(&self, tip: Point, dir: Vec2) -> (Point, Point) {
        let perp = Vec2::new(-dir.y, dir.x);
        let back = tip - dir * self.head_size;
        let half = perp * self.head_size * 0.5;
        (back + half, back - half)
    }

    /// Heads as (tip, direction, style), skipping `ArrowHead::None`.
    fn heads(&self) -> impl Iterator<Item = (Point, Vec2, ArrowHead)> {
        let dir = self.direction();
        [(self.end, dir, self.end_head), (self.start, -dir, self.start_head)]
            .into_iter()
            .filter(|(_, _, head)| *head != ArrowHead::None)
    }
}

impl ShapeTrait for Arrow {
    fn bounds(&self) -> Rect {
        let mut bounds = Rect::from_points(self.start, self.end);
        for (tip, dir, _) in self.heads() {
            let (left, right) = self.barbs(tip, dir);
            bounds = bounds.union_pt(left).union_pt(right);
        }
        bounds
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if point_to_segment_dist(point, self.start, self.end) <= tolerance + self.style.stroke_width / 2.0 {
            return true;
        }
        let sign = |p1: Point, p2: Point, p3: Point| {
            (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
        };
        self.heads().any(|(tip, dir, _)| {
            let (left, right) = self.barbs(tip, dir);
            let d1 = sign(point, tip, left);
            let d2 = sign(point, left, right);
            let d3 = sign(point, right, tip);
            let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
            let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
            !(has_neg && has_pos)
        })
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if self.start == self.end {
            return path;
        }
        path.move_to(self.start);
        path.line_to(self.end);

        for (tip, dir, head) in self.heads() {
            let (left, right) = self.barbs(tip, dir);
            match head {
                ArrowHead::Open => {
                    path.move_to(tip);
                    path.line_to(left);
                    path.move_to(tip);
                    path.line_to(right);
                }
                ArrowHead::Triangle => {
                    path.move_to(tip);
                    path.line_to(left);
                    path.line_to(right);
                    path.close_path();
                }
                ArrowHead::None => {}
            }
        }
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
        let coeffs = affine.as_coeffs();
        self.head_size *= (coeffs[0].abs() + coeffs[3].abs()) / 2.0;
    }
}
