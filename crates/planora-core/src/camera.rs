//! Viewport pan/zoom.

use crate::config::PlannerConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom shown as "100%": one canvas pixel per UI pixel.
pub const BASE_ZOOM: f64 = 1.0;

/// Maps canvas (world) coordinates to UI (screen) coordinates.
///
/// `screen = world * zoom + offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan, in UI pixels.
    pub offset: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: BASE_ZOOM,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera using the configured zoom limits.
    pub fn from_config(config: &PlannerConfig) -> Self {
        let (min_zoom, max_zoom) = if config.min_zoom > 0.0 && config.min_zoom <= config.max_zoom {
            (config.min_zoom, config.max_zoom)
        } else {
            log::warn!(
                "invalid zoom limits {}..{}, using defaults",
                config.min_zoom,
                config.max_zoom
            );
            let default = Self::default();
            (default.min_zoom, default.max_zoom)
        };
        Self {
            min_zoom,
            max_zoom,
            zoom: BASE_ZOOM.clamp(min_zoom, max_zoom),
            ..Self::default()
        }
    }

    /// World to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to world.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Canvas rectangle in screen space.
    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(self.world_to_screen(rect.origin()), self.world_to_screen(Point::new(rect.x1, rect.y1)))
    }

    /// Pan by a screen-space delta. Non-finite deltas are ignored.
    pub fn pan(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.offset += delta;
        }
    }

    /// Set the zoom directly, clamped to the limits. Returns whether it
    /// changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = zoom;
        true
    }

    /// Zoom by `factor`, keeping `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        let world_point = self.screen_to_world(screen_point);
        if !self.set_zoom(self.zoom * factor) {
            return false;
        }
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
        true
    }

    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = BASE_ZOOM.clamp(self.min_zoom, self.max_zoom);
    }

    /// Zoom and pan so `bounds` is centred in `viewport` with `padding`.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = padded.width / bounds.width();
        let scale_y = padded.height / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let center = bounds.center();
        self.offset = Vec2::new(
            viewport.width / 2.0 - center.x * self.zoom,
            viewport.height / 2.0 - center.y * self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let camera = Camera::new();
        let p = Point::new(100.0, 200.0);
        assert_eq!(camera.screen_to_world(p), p);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let camera = Camera {
            offset: Vec2::new(30.0, -20.0),
            zoom: 1.5,
            ..Camera::default()
        };
        let original = Point::new(123.0, 456.0);
        let back = camera.world_to_screen(camera.screen_to_world(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_rect_to_screen() {
        let camera = Camera {
            offset: Vec2::new(10.0, 5.0),
            zoom: 2.0,
            ..Camera::default()
        };
        let rect = camera.rect_to_screen(Rect::new(0.0, 0.0, 50.0, 25.0));
        assert_eq!(rect, Rect::new(10.0, 5.0, 110.0, 55.0));
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 0.001);
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);
        camera.zoom_at(Point::ZERO, 1e6);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
        assert!(!camera.set_zoom(f64::NAN));
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut camera = Camera::new();
        let anchor = Point::new(200.0, 100.0);
        let world = camera.screen_to_world(anchor);
        assert!(camera.zoom_at(anchor, 2.0));
        let back = camera.world_to_screen(world);
        assert!((back.x - anchor.x).abs() < 1e-9);
        assert!((back.y - anchor.y).abs() < 1e-9);
    }

    #[test]
    fn test_from_config_limits() {
        let config = PlannerConfig::default().with_zoom_limits(2.0, 4.0);
        let camera = Camera::from_config(&config);
        assert!((camera.zoom - 2.0).abs() < f64::EPSILON);

        let bad = PlannerConfig::default().with_zoom_limits(5.0, 1.0);
        assert!((Camera::from_config(&bad).min_zoom - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut camera = Camera::new();
        camera.fit_to_bounds(Rect::new(0.0, 0.0, 100.0, 100.0), Size::new(300.0, 200.0), 0.0);
        assert!((camera.zoom - 2.0).abs() < f64::EPSILON);
        assert_eq!(camera.world_to_screen(Point::new(50.0, 50.0)), Point::new(150.0, 100.0));
    }
}
