//! Column and row resize handles for the selected table.
//!
//! The overlay mirrors the selected table's bounds in UI space. Any change
//! that could move it (selection, object geometry, pan, zoom) should call
//! [`TableResizeOverlay::request_recompute`]; requests made within one frame
//! collapse into a single recompute when the host delivers the frame through
//! [`TableResizeOverlay::on_frame`].

use super::scheduler::{FrameDebouncer, FrameHandle, FrameScheduler};
use crate::canvas::Canvas;
use crate::metadata::{ElementMetadata, TableMetadata, prefix_offsets};
use crate::object::ObjectId;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rectangle in UI pixels, rulers included.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rect> for OverlayRect {
    fn from(rect: Rect) -> Self {
        Self {
            left: rect.x0,
            top: rect.y0,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

impl OverlayRect {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }
}

/// Active overlay: where the table is on screen and a copy of its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub object_id: ObjectId,
    pub rect: OverlayRect,
    pub metadata: TableMetadata,
}

impl OverlayState {
    fn scale(&self) -> (f64, f64) {
        let ratio = |ui: f64, canvas: f64| if canvas > 0.0 { ui / canvas } else { 0.0 };
        (
            ratio(self.rect.width, self.metadata.size.width),
            ratio(self.rect.height, self.metadata.size.height),
        )
    }

    /// UI x position of each interior column divider.
    pub fn column_dividers(&self) -> Vec<f64> {
        let (sx, _) = self.scale();
        let offsets = prefix_offsets(&self.metadata.resolved_column_widths());
        interior(&offsets)
            .iter()
            .map(|x| self.rect.left + x * sx)
            .collect()
    }

    /// UI y position of each interior row divider.
    pub fn row_dividers(&self) -> Vec<f64> {
        let (_, sy) = self.scale();
        let offsets = prefix_offsets(&self.metadata.resolved_row_heights());
        interior(&offsets)
            .iter()
            .map(|y| self.rect.top + y * sy)
            .collect()
    }
}

fn interior(offsets: &[f64]) -> &[f64] {
    if offsets.len() > 2 {
        &offsets[1..offsets.len() - 1]
    } else {
        &[]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Columns,
    Rows,
}

/// Resize overlay bound to one canvas at a time.
#[derive(Debug)]
pub struct TableResizeOverlay<S: FrameScheduler> {
    frames: FrameDebouncer<S>,
    state: Option<OverlayState>,
    canvas_id: Option<Uuid>,
    recomputes: usize,
}

impl<S: FrameScheduler> TableResizeOverlay<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            frames: FrameDebouncer::new(scheduler),
            state: None,
            canvas_id: None,
            recomputes: 0,
        }
    }

    pub fn state(&self) -> Option<&OverlayState> {
        self.state.as_ref()
    }

    pub fn rect(&self) -> Option<OverlayRect> {
        self.state.as_ref().map(|s| s.rect)
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Number of recomputes actually run.
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    pub fn scheduler(&self) -> &S {
        self.frames.scheduler()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.frames.scheduler_mut()
    }

    /// Queue a recompute for the next frame, replacing any queued one.
    pub fn request_recompute(&mut self) -> FrameHandle {
        self.frames.request()
    }

    /// Deliver a fired frame. Runs the recompute if `handle` is the one
    /// currently queued; stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, canvas: &Canvas) -> bool {
        if !self.frames.fire(handle) {
            return false;
        }
        self.recompute(canvas);
        true
    }

    /// Rebuild the overlay from the canvas now.
    pub fn recompute(&mut self, canvas: &Canvas) {
        if self.canvas_id != Some(canvas.instance_id()) {
            if self.canvas_id.is_some() {
                log::debug!("canvas replaced, resetting table overlay");
            }
            self.state = None;
            self.canvas_id = Some(canvas.instance_id());
        }
        self.recomputes += 1;
        log::debug!("recomputing table overlay");

        self.state = canvas.selected_table().and_then(|object| {
            let metadata = object.metadata()?.as_table()?.clone();
            let rect = canvas.camera.rect_to_screen(object.aabb()) + canvas.ruler_offset();
            Some(OverlayState {
                object_id: object.id.clone(),
                rect: rect.into(),
                metadata,
            })
        });
    }

    /// Release the canvas: cancel any queued recompute and go inactive.
    pub fn detach(&mut self) {
        self.frames.cancel_pending();
        self.state = None;
        self.canvas_id = None;
    }

    /// Drag column divider `boundary` by `ui_delta` UI pixels.
    pub fn adjust_column(&mut self, canvas: &mut Canvas, boundary: usize, ui_delta: f64) -> bool {
        self.adjust(canvas, Axis::Columns, boundary, ui_delta)
    }

    /// Drag row divider `boundary` by `ui_delta` UI pixels.
    pub fn adjust_row(&mut self, canvas: &mut Canvas, boundary: usize, ui_delta: f64) -> bool {
        self.adjust(canvas, Axis::Rows, boundary, ui_delta)
    }

    fn adjust(&mut self, canvas: &mut Canvas, axis: Axis, boundary: usize, ui_delta: f64) -> bool {
        if !ui_delta.is_finite() || ui_delta == 0.0 {
            return false;
        }
        if self.canvas_id != Some(canvas.instance_id()) {
            return false;
        }
        let Some(id) = self.state.as_ref().map(|s| s.object_id.clone()) else {
            return false;
        };
        // Locked tables keep their tracks as well as their placement.
        if canvas.document.get(&id).is_some_and(|object| object.locked) {
            log::debug!("table {id} is locked, ignoring track resize");
            return false;
        }
        let delta = ui_delta / canvas.camera.zoom;
        if !delta.is_finite() {
            return false;
        }
        let min = canvas.config().track_floor();

        let Some(table) = canvas.document.metadata(&id).and_then(ElementMetadata::as_table) else {
            self.state = None;
            return false;
        };
        let next = match axis {
            Axis::Columns => table.with_column_shift(boundary, delta, min),
            Axis::Rows => table.with_row_shift(boundary, delta, min),
        };
        let Some(next) = next else {
            return false;
        };
        if let Err(e) = canvas.document.update_metadata(&id, |_| next.into()) {
            log::warn!("table resize rejected: {e}");
            return false;
        }
        self.request_recompute();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::object::{CanvasObject, ImageProperties};
    use crate::overlay::VirtualScheduler;
    use kurbo::{Point, Size, Vec2};

    fn canvas_with_table() -> (Canvas, ObjectId) {
        let mut canvas = Canvas::default();
        let table = TableMetadata {
            column_widths: Some(vec![100.0, 100.0, 100.0]),
            ..TableMetadata::new(3, 3, Size::new(300.0, 150.0))
        };
        let id = canvas.add_object(CanvasObject::element(table.into(), Point::new(10.0, 10.0)));
        (canvas, id)
    }

    fn run_frame(overlay: &mut TableResizeOverlay<VirtualScheduler>, canvas: &Canvas) -> usize {
        let fired = overlay.scheduler_mut().tick();
        fired
            .into_iter()
            .filter(|h| overlay.on_frame(*h, canvas))
            .count()
    }

    #[test]
    fn test_requests_in_one_frame_coalesce() {
        let (mut canvas, id) = canvas_with_table();
        let mut overlay = TableResizeOverlay::new(VirtualScheduler::new());

        canvas.select(id);
        overlay.request_recompute();
        canvas.camera.pan(Vec2::new(5.0, 0.0));
        overlay.request_recompute();
        canvas.camera.set_zoom(2.0);
        overlay.request_recompute();

        assert_eq!(run_frame(&mut overlay, &canvas), 1);
        assert_eq!(overlay.recompute_count(), 1);
        assert!(overlay.is_active());
        assert_eq!(run_frame(&mut overlay, &canvas), 0);
    }

    #[test]
    fn test_rect_follows_zoom_pan_and_rulers() {
        let (mut canvas, id) = canvas_with_table();
        canvas.select(id);
        canvas.camera.offset = Vec2::new(10.0, 5.0);
        canvas.camera.zoom = 2.0;
        canvas.show_rulers = true;

        let mut overlay = TableResizeOverlay::new(VirtualScheduler::new());
        overlay.recompute(&canvas);
        let rect = overlay.rect().unwrap();
        assert!((rect.left - 50.0).abs() < 1e-9);
        assert!((rect.top - 45.0).abs() < 1e-9);
        assert!((rect.width - 600.0).abs() < 1e-9);
        assert!((rect.height - 300.0).abs() < 1e-9);

        let dividers = overlay.state().unwrap().column_dividers();
        assert_eq!(dividers.len(), 2);
        assert!((dividers[0] - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjust_column_divides_by_zoom() {
        let (mut canvas, id) = canvas_with_table();
        canvas.select(id.clone());
        canvas.camera.zoom = 2.0;
        let mut overlay = TableResizeOverlay::new(VirtualScheduler::new());
        overlay.recompute(&canvas);

        assert!(overlay.adjust_column(&mut canvas, 1, 40.0));
        let widths = canvas
            .document
            .metadata(&id)
            .and_then(ElementMetadata::as_table)
            .and_then(|t| t.column_widths.clone())
            .unwrap();
        assert_eq!(widths, vec![100.0, 120.0, 80.0]);

        // The snapshot refreshes on the next frame.
        assert_eq!(overlay.state().unwrap().metadata.column_widths, Some(vec![100.0, 100.0, 100.0]));
        assert_eq!(run_frame(&mut overlay, &canvas), 1);
        assert_eq!(overlay.state().unwrap().metadata.column_widths, Some(widths));
    }

    #[test]
    fn test_adjust_clamps_to_configured_floor() {
        let config = PlannerConfig::default().with_min_track_size(30.0);
        let mut canvas = Canvas::new(config);
        let table = TableMetadata::new(2, 2, Size::new(200.0, 100.0));
        let id = canvas.add_object(CanvasObject::element(table.into(), Point::ZERO));
        canvas.select(id.clone());
        let mut overlay = TableResizeOverlay::new(VirtualScheduler::new());
        overlay.recompute(&canvas);

        assert!(overlay.adjust_row(&mut canvas, 0, 500.0));
        let heights = canvas.document.metadata(&id).unwrap().as_table().unwrap().resolved_row_heights();
        assert_eq!(heights, vec![70.0, 30.0]);
        assert!(!overlay.adjust_row(&mut canvas, 0, 5.0));
    }

    #[test]
    fn test_locked_table_keeps_tracks() {
        let (mut canvas, id) = canvas_with_table();
        canvas.select(id.clone());
        canvas.document.set_locked(&id, true).unwrap();
        let mut overlay = TableResizeOverlay::new(VirtualScheduler::new());
        overlay.recompute(&canvas);
        assert!(overlay.is_active());

        assert!(!overlay.adjust_column(&mut canvas, 0, 20.0));
        assert!(!overlay.adjust_row(&mut canvas, 0, 20.0));
        let table = canvas.document.metadata(&id).and_then(ElementMetadata::as_table).unwrap();
        assert_eq!(table.column_widths, Some(vec![100.0, 100.0, 100.0]));
        assert_eq!(overlay.scheduler().pending_count(), 0);

        canvas.document.set_locked(&id, false).unwrap();
        assert!(overlay.adjust_column(&mut canvas, 0, 20.0));
    }

    #[test]
    fn test_noop_deltas() {
        let (mut canvas, id) = canvas_with_table();
        canvas.select(id);
        let mut overlay = TableResizeOverlay::new(VirtualScheduler::new());
        overlay.recompute(&canvas);
        let undo_before = canvas.document.can_undo();

        assert!(!overlay.adjust_column(&mut canvas, 0, 0.0));
        assert!(!overlay.adjust_column(&mut canvas, 0, f64::NAN));
        assert!(!overlay.adjust_column(&mut canvas, 0, f64::NEG_INFINITY));
        assert!(!overlay.adjust_column(&mut canvas, 7, 10.0));
        assert_eq!(overlay.scheduler().pending_count(), 0);
        assert_eq!(canvas.document.can_undo(), undo_before);
    }

    #[test]
    fn test_non_table_selection_deactivates() {
        let (mut canvas, id) = canvas_with_table();
        let image = canvas.add_object(CanvasObject::image(
            ImageProperties::default(),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        ));
        let mut overlay = TableResizeOverlay::new(VirtualScheduler::new());

        canvas.select(id);
        overlay.recompute(&canvas);
        assert!(overlay.is_active());

        canvas.select(image);
        overlay.recompute(&canvas);
        assert!(!overlay.is_active());

        canvas.clear_selection();
        overlay.recompute(&canvas);
        assert!(!overlay.is_active());
        assert!(!overlay.adjust_column(&mut canvas, 0, 10.0));
    }

    #[test]
    fn test_canvas_replacement_and_detach() {
        let (mut canvas, id) = canvas_with_table();
        canvas.select(id);
        let mut overlay = TableResizeOverlay::new(VirtualScheduler::new());
        overlay.recompute(&canvas);
        assert!(overlay.is_active());

        // A fresh canvas has nothing selected.
        let replacement = Canvas::with_document(canvas.document.clone(), PlannerConfig::default());
        overlay.recompute(&replacement);
        assert!(!overlay.is_active());
        assert!(!overlay.adjust_column(&mut canvas, 0, 10.0));

        overlay.recompute(&canvas);
        assert!(overlay.is_active());
        overlay.request_recompute();
        overlay.detach();
        assert!(!overlay.is_active());
        assert_eq!(overlay.scheduler().pending_count(), 0);
        assert_eq!(run_frame(&mut overlay, &canvas), 0);
    }
}
