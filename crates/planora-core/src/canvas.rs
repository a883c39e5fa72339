//! Canvas document, edit history and runtime canvas state.

use crate::camera::Camera;
use crate::color::SerializableColor;
use crate::config::PlannerConfig;
use crate::error::{DocumentError, DocumentResult};
use crate::holiday::HolidayLookup;
use crate::metadata::ElementMetadata;
use crate::object::{CanvasObject, ObjectId, ObjectProperties};
use crate::scene::Scene;
use crate::units::PaperSize;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

const DEFAULT_UNDO_DEPTH: usize = 50;

/// Offset applied to duplicated objects.
const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

fn default_undo_depth() -> usize {
    DEFAULT_UNDO_DEPTH
}

/// A snapshot of document state for undo.
#[derive(Debug, Clone)]
struct DocumentSnapshot {
    objects: HashMap<ObjectId, CanvasObject>,
    z_order: Vec<ObjectId>,
}

/// Edge or centre line used by [`CanvasDocument::align`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    HorizontalCenter,
    Right,
    Top,
    VerticalMiddle,
    Bottom,
}

/// A page of placed objects.
///
/// Every mutating command records an undo snapshot first. Element metadata
/// only changes through [`CanvasDocument::update_metadata`], so graphics can
/// always be recompiled from whatever state undo or redo restores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub paper: PaperSize,
    #[serde(default = "SerializableColor::white")]
    pub background: SerializableColor,
    pub objects: HashMap<ObjectId, CanvasObject>,
    /// Back to front.
    pub z_order: Vec<ObjectId>,
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
    #[serde(skip, default = "default_undo_depth")]
    undo_depth: usize,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDocument {
    /// Empty A4 document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            paper: PaperSize::default(),
            background: SerializableColor::white(),
            objects: HashMap::new(),
            z_order: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_depth: DEFAULT_UNDO_DEPTH,
        }
    }

    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        self.paper = paper;
        self
    }

    pub fn with_undo_depth(mut self, depth: usize) -> Self {
        self.undo_depth = depth;
        self
    }

    /// Page size in canvas pixels.
    pub fn size(&self) -> Size {
        self.paper.px_size()
    }

    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            objects: self.objects.clone(),
            z_order: self.z_order.clone(),
        }
    }

    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.objects = snapshot.objects;
        self.z_order = snapshot.z_order;
    }

    /// Record the current state for undo and drop the redo history.
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.undo_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn insert(&mut self, mut object: CanvasObject) -> ObjectId {
        let id = object.id.clone();
        if self.objects.contains_key(&id) {
            log::warn!("replacing existing object {id}");
            self.z_order.retain(|z| *z != id);
        }
        object.z_index = self.z_order.len();
        self.z_order.push(id.clone());
        self.objects.insert(id.clone(), object);
        id
    }

    /// Add an object on top of the stack.
    pub fn add(&mut self, object: CanvasObject) -> ObjectId {
        self.push_undo();
        self.insert(object)
    }

    /// Add several objects as one undoable step, in order.
    pub fn add_all(&mut self, objects: impl IntoIterator<Item = CanvasObject>) -> Vec<ObjectId> {
        self.push_undo();
        objects.into_iter().map(|o| self.insert(o)).collect()
    }

    pub fn get(&self, id: &ObjectId) -> Option<&CanvasObject> {
        self.objects.get(id)
    }

    fn existing(&self, id: &ObjectId) -> DocumentResult<&CanvasObject> {
        self.objects.get(id).ok_or_else(|| DocumentError::NotFound(id.clone()))
    }

    fn unlocked(&self, id: &ObjectId) -> DocumentResult<&CanvasObject> {
        let object = self.existing(id)?;
        if object.locked {
            return Err(DocumentError::Locked(id.clone()));
        }
        Ok(object)
    }

    /// Element metadata of an object, the side-table lookup used to
    /// re-derive geometry from compiled scene nodes.
    pub fn metadata(&self, id: &ObjectId) -> Option<&ElementMetadata> {
        self.objects.get(id).and_then(CanvasObject::metadata)
    }

    /// Objects back to front.
    pub fn objects_ordered(&self) -> impl Iterator<Item = &CanvasObject> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    fn sync_z_indices(&mut self) {
        for (index, id) in self.z_order.iter().enumerate() {
            if let Some(object) = self.objects.get_mut(id) {
                object.z_index = index;
            }
        }
    }

    /// Detach an object from the document and from any group listing it.
    fn take(&mut self, id: &ObjectId, with_children: bool) -> Option<CanvasObject> {
        let object = self.objects.remove(id)?;
        self.z_order.retain(|z| z != id);
        for other in self.objects.values_mut() {
            if let ObjectProperties::Group { children } = &mut other.properties {
                children.retain(|c| c != id);
            }
        }
        if with_children {
            for child in object.children() {
                self.take(child, true);
            }
        }
        self.sync_z_indices();
        Some(object)
    }

    /// Remove an object. Removing a group removes its members too.
    pub fn remove(&mut self, id: &ObjectId) -> DocumentResult<CanvasObject> {
        self.unlocked(id)?;
        self.push_undo();
        self.take(id, true)
            .ok_or_else(|| DocumentError::NotFound(id.clone()))
    }

    pub fn clear(&mut self) {
        self.push_undo();
        self.objects.clear();
        self.z_order.clear();
    }

    fn insert_copy(&mut self, mut object: CanvasObject, offset: Vec2) -> ObjectId {
        if let ObjectProperties::Group { children } = &object.properties {
            let copies: Vec<CanvasObject> = children
                .iter()
                .filter_map(|c| self.objects.get(c).cloned())
                .collect();
            let children = copies
                .into_iter()
                .map(|c| self.insert_copy(c, offset))
                .collect();
            object.properties = ObjectProperties::Group { children };
        }
        object.id = ObjectId::new();
        object.locked = false;
        object.translate(offset);
        self.insert(object)
    }

    /// Copy an object (and a group's members) with fresh ids, offset from
    /// the original.
    pub fn duplicate(&mut self, id: &ObjectId) -> DocumentResult<ObjectId> {
        let source = self.existing(id)?.clone();
        self.push_undo();
        Ok(self.insert_copy(source, DUPLICATE_OFFSET))
    }

    fn translate_unchecked(&mut self, id: &ObjectId, delta: Vec2) {
        let Some(object) = self.objects.get_mut(id) else {
            return;
        };
        object.translate(delta);
        let children = object.children().to_vec();
        for child in children {
            if self.objects.get(&child).is_some_and(|c| !c.locked) {
                self.translate_unchecked(&child, delta);
            }
        }
    }

    /// Move an object. Moving a group moves its unlocked members.
    pub fn translate(&mut self, id: &ObjectId, delta: Vec2) -> DocumentResult<()> {
        if !delta.is_finite() {
            return Err(DocumentError::InvalidGeometry(format!("translation {delta:?}")));
        }
        self.unlocked(id)?;
        self.push_undo();
        self.translate_unchecked(id, delta);
        Ok(())
    }

    /// Place and resize an object. Elements get the new size written into
    /// their metadata; shapes are rescaled.
    pub fn set_bounds(&mut self, id: &ObjectId, bounds: Rect) -> DocumentResult<()> {
        let finite = [bounds.x0, bounds.y0, bounds.x1, bounds.y1]
            .iter()
            .all(|v| v.is_finite());
        if !finite || bounds.width() < 0.0 || bounds.height() < 0.0 {
            return Err(DocumentError::InvalidGeometry(format!("bounds {bounds:?}")));
        }
        self.unlocked(id)?;
        self.push_undo();
        if let Some(object) = self.objects.get_mut(id) {
            object.x = bounds.x0;
            object.y = bounds.y0;
            object.set_size(bounds.size());
        }
        Ok(())
    }

    /// Set the rotation in degrees, normalised to `[0, 360)`.
    pub fn rotate(&mut self, id: &ObjectId, degrees: f64) -> DocumentResult<()> {
        if !degrees.is_finite() {
            return Err(DocumentError::InvalidGeometry(format!("rotation {degrees}")));
        }
        self.unlocked(id)?;
        self.push_undo();
        if let Some(object) = self.objects.get_mut(id) {
            object.rotation = degrees.rem_euclid(360.0);
        }
        Ok(())
    }

    pub fn set_opacity(&mut self, id: &ObjectId, opacity: f64) -> DocumentResult<()> {
        if !opacity.is_finite() {
            return Err(DocumentError::InvalidGeometry(format!("opacity {opacity}")));
        }
        self.existing(id)?;
        self.push_undo();
        if let Some(object) = self.objects.get_mut(id) {
            object.opacity = opacity.clamp(0.0, 1.0);
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: &ObjectId, visible: bool) -> DocumentResult<()> {
        self.existing(id)?;
        self.push_undo();
        if let Some(object) = self.objects.get_mut(id) {
            object.visible = visible;
        }
        Ok(())
    }

    pub fn set_locked(&mut self, id: &ObjectId, locked: bool) -> DocumentResult<()> {
        self.existing(id)?;
        self.push_undo();
        if let Some(object) = self.objects.get_mut(id) {
            object.locked = locked;
        }
        Ok(())
    }

    /// Replace an element's metadata with `update(current)`.
    ///
    /// The object's width and height follow the new metadata size. An update
    /// returning an equal value records no undo step.
    pub fn update_metadata<F>(&mut self, id: &ObjectId, update: F) -> DocumentResult<()>
    where
        F: FnOnce(&ElementMetadata) -> ElementMetadata,
    {
        let current = self
            .existing(id)?
            .metadata()
            .ok_or_else(|| DocumentError::NotAnElement(id.clone()))?;
        let next = update(current);
        if next == *current {
            return Ok(());
        }
        self.push_undo();
        if let Some(object) = self.objects.get_mut(id) {
            object.properties = ObjectProperties::Element { metadata: next };
            object.sync_size_from_metadata();
        }
        Ok(())
    }

    fn position(&self, id: &ObjectId) -> DocumentResult<usize> {
        self.z_order
            .iter()
            .position(|z| z == id)
            .ok_or_else(|| DocumentError::NotFound(id.clone()))
    }

    pub fn bring_to_front(&mut self, id: &ObjectId) -> DocumentResult<()> {
        let pos = self.position(id)?;
        self.push_undo();
        let id = self.z_order.remove(pos);
        self.z_order.push(id);
        self.sync_z_indices();
        Ok(())
    }

    pub fn send_to_back(&mut self, id: &ObjectId) -> DocumentResult<()> {
        let pos = self.position(id)?;
        self.push_undo();
        let id = self.z_order.remove(pos);
        self.z_order.insert(0, id);
        self.sync_z_indices();
        Ok(())
    }

    /// Move one layer up. Returns false if already at the front.
    pub fn bring_forward(&mut self, id: &ObjectId) -> DocumentResult<bool> {
        let pos = self.position(id)?;
        if pos + 1 >= self.z_order.len() {
            return Ok(false);
        }
        self.push_undo();
        self.z_order.swap(pos, pos + 1);
        self.sync_z_indices();
        Ok(true)
    }

    /// Move one layer down. Returns false if already at the back.
    pub fn send_backward(&mut self, id: &ObjectId) -> DocumentResult<bool> {
        let pos = self.position(id)?;
        if pos == 0 {
            return Ok(false);
        }
        self.push_undo();
        self.z_order.swap(pos, pos - 1);
        self.sync_z_indices();
        Ok(true)
    }

    /// Group existing objects. Members keep their own place in the stack.
    pub fn group(&mut self, ids: &[ObjectId]) -> DocumentResult<ObjectId> {
        let members: Vec<ObjectId> = self
            .z_order
            .iter()
            .filter(|z| ids.contains(z))
            .cloned()
            .collect();
        if members.len() < 2 {
            return Err(DocumentError::GroupTooSmall(members.len()));
        }
        let bounds = members
            .iter()
            .filter_map(|id| self.objects.get(id))
            .map(CanvasObject::aabb)
            .reduce(|a, b| a.union(b))
            .unwrap_or_default();

        self.push_undo();
        for other in self.objects.values_mut() {
            if let ObjectProperties::Group { children } = &mut other.properties {
                children.retain(|c| !members.contains(c));
            }
        }
        Ok(self.insert(CanvasObject::group(members, bounds)))
    }

    /// Dissolve a group, returning its former members.
    pub fn ungroup(&mut self, id: &ObjectId) -> DocumentResult<Vec<ObjectId>> {
        let children = match &self.existing(id)?.properties {
            ObjectProperties::Group { children } => children.clone(),
            _ => return Err(DocumentError::NotAGroup(id.clone())),
        };
        self.push_undo();
        self.take(id, false);
        Ok(children)
    }

    /// Align objects to the union of their bounds, or to the page when only
    /// one object is given. Locked objects stay put. Returns how many moved.
    pub fn align(&mut self, ids: &[ObjectId], alignment: Alignment) -> DocumentResult<usize> {
        let mut targets = Vec::with_capacity(ids.len());
        for id in ids {
            targets.push((id.clone(), self.existing(id)?.aabb()));
        }
        let reference = match targets.as_slice() {
            [] => return Ok(0),
            [_] => Rect::from_origin_size(Point::ZERO, self.size()),
            [first, rest @ ..] => rest.iter().fold(first.1, |acc, (_, r)| acc.union(*r)),
        };

        let delta_for = |r: Rect| match alignment {
            Alignment::Left => Vec2::new(reference.x0 - r.x0, 0.0),
            Alignment::HorizontalCenter => Vec2::new(reference.center().x - r.center().x, 0.0),
            Alignment::Right => Vec2::new(reference.x1 - r.x1, 0.0),
            Alignment::Top => Vec2::new(0.0, reference.y0 - r.y0),
            Alignment::VerticalMiddle => Vec2::new(0.0, reference.center().y - r.center().y),
            Alignment::Bottom => Vec2::new(0.0, reference.y1 - r.y1),
        };

        let moves: Vec<(ObjectId, Vec2)> = targets
            .into_iter()
            .filter(|(id, _)| self.objects.get(id).is_some_and(|o| !o.locked))
            .map(|(id, r)| (id, delta_for(r)))
            .filter(|(_, d)| d.hypot() > f64::EPSILON)
            .collect();
        if moves.is_empty() {
            return Ok(0);
        }
        self.push_undo();
        for (id, delta) in &moves {
            self.translate_unchecked(id, *delta);
        }
        Ok(moves.len())
    }

    /// Union of visible object bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.objects
            .values()
            .filter(|o| o.visible && o.children().is_empty())
            .map(CanvasObject::aabb)
            .reduce(|a, b| a.union(b))
    }

    /// Selectable objects under `point`, front to back.
    pub fn objects_at_point(&self, point: Point, tolerance: f64) -> Vec<ObjectId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.objects.get(id))
            .filter(|o| o.visible && o.selectable)
            .filter(|o| match &o.properties {
                ObjectProperties::Group { .. } => false,
                ObjectProperties::Shape { shape } if o.rotation == 0.0 => {
                    shape.hit_test(point - Vec2::new(o.x, o.y), tolerance)
                }
                _ => o.aabb().inflate(tolerance, tolerance).contains(point),
            })
            .map(|o| o.id.clone())
            .collect()
    }

    /// Selectable objects overlapping `rect`, back to front.
    pub fn objects_in_rect(&self, rect: Rect) -> Vec<ObjectId> {
        self.objects_ordered()
            .filter(|o| o.visible && o.selectable && o.children().is_empty())
            .filter(|o| rect.intersect(o.aabb()).area() > 0.0)
            .map(|o| o.id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Runtime canvas state (not persisted).
///
/// Each canvas gets an instance id so observers such as the resize overlay
/// can tell when the surface they were tracking has been replaced.
#[derive(Debug, Clone)]
pub struct Canvas {
    instance_id: Uuid,
    pub document: CanvasDocument,
    pub camera: Camera,
    /// Selected objects, in selection order.
    pub selection: Vec<ObjectId>,
    pub show_rulers: bool,
    pub viewport_size: Size,
    config: PlannerConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Canvas {
    /// Canvas with an empty document on the configured default paper.
    pub fn new(config: PlannerConfig) -> Self {
        let document = CanvasDocument::new().with_paper(config.default_paper());
        Self::with_document(document, config)
    }

    pub fn with_document(document: CanvasDocument, config: PlannerConfig) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            document: document.with_undo_depth(config.undo_depth),
            camera: Camera::from_config(&config),
            selection: Vec::new(),
            show_rulers: false,
            viewport_size: Size::new(800.0, 600.0),
            config,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Offset of the canvas origin inside the editor caused by rulers.
    pub fn ruler_offset(&self) -> Vec2 {
        if self.show_rulers {
            Vec2::new(self.config.ruler_thickness, self.config.ruler_thickness)
        } else {
            Vec2::ZERO
        }
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    pub fn toggle_rulers(&mut self) {
        self.show_rulers = !self.show_rulers;
    }

    pub fn add_object(&mut self, object: CanvasObject) -> ObjectId {
        self.document.add(object)
    }

    /// Replace the selection with one object.
    pub fn select(&mut self, id: ObjectId) {
        self.selection.clear();
        self.add_to_selection(id);
    }

    /// Non-selectable and unknown objects are ignored.
    pub fn add_to_selection(&mut self, id: ObjectId) {
        let selectable = self.document.get(&id).is_some_and(|o| o.selectable);
        if selectable && !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection = self
            .document
            .objects_ordered()
            .filter(|o| o.selectable)
            .map(|o| o.id.clone())
            .collect();
    }

    pub fn is_selected(&self, id: &ObjectId) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_objects(&self) -> impl Iterator<Item = &CanvasObject> {
        self.selection.iter().filter_map(|id| self.document.get(id))
    }

    /// The selected table, when exactly one table is selected.
    pub fn selected_table(&self) -> Option<&CanvasObject> {
        match self.selection.as_slice() {
            [id] => self.document.get(id).filter(|o| o.is_table()),
            _ => None,
        }
    }

    /// Delete every unlocked selected object.
    pub fn delete_selected(&mut self) -> Vec<CanvasObject> {
        let ids = std::mem::take(&mut self.selection);
        let mut removed = Vec::new();
        for id in ids {
            match self.document.remove(&id) {
                Ok(object) => removed.push(object),
                Err(DocumentError::Locked(id)) => self.selection.push(id),
                Err(e) => log::debug!("skipping delete: {e}"),
            }
        }
        removed
    }

    pub fn group_selected(&mut self) -> DocumentResult<ObjectId> {
        let id = self.document.group(&self.selection)?;
        self.select(id.clone());
        Ok(id)
    }

    pub fn ungroup_selected(&mut self) -> Vec<ObjectId> {
        let groups: Vec<ObjectId> = self
            .selected_objects()
            .filter(|o| matches!(o.properties, ObjectProperties::Group { .. }))
            .map(|o| o.id.clone())
            .collect();
        let mut members = Vec::new();
        for group in groups {
            self.selection.retain(|id| *id != group);
            if let Ok(children) = self.document.ungroup(&group) {
                members.extend(children);
            }
        }
        for id in &members {
            self.add_to_selection(id.clone());
        }
        members
    }

    fn prune_selection(&mut self) {
        let document = &self.document;
        self.selection.retain(|id| document.get(id).is_some());
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.document.undo();
        self.prune_selection();
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.document.redo();
        self.prune_selection();
        changed
    }

    /// Fit the page (or the content, if it spills over) into the viewport.
    pub fn fit_to_content(&mut self) {
        let page = Rect::from_origin_size(Point::ZERO, self.document.size());
        let bounds = self.document.bounds().map_or(page, |b| b.union(page));
        self.camera.fit_to_bounds(bounds, self.viewport_size, 50.0);
    }

    /// Compile the document for display.
    pub fn scene<H: HolidayLookup + ?Sized>(&self, holidays: &H) -> Scene {
        Scene::build(&self.document, holidays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TableMetadata;
    use crate::object::ImageProperties;
    use crate::shapes::{ShapeKind, ShapeOptions, create};

    fn image_at(x: f64, y: f64) -> CanvasObject {
        CanvasObject::image(ImageProperties::default(), Rect::new(x, y, x + 50.0, y + 50.0))
    }

    fn table_doc() -> (CanvasDocument, ObjectId) {
        let mut doc = CanvasDocument::new();
        let table = TableMetadata::new(3, 3, Size::new(300.0, 150.0));
        let id = doc.add(CanvasObject::element(table.into(), Point::new(10.0, 10.0)));
        (doc, id)
    }

    #[test]
    fn test_add_and_remove() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(image_at(0.0, 0.0));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.z_order, vec![id.clone()]);
        doc.remove(&id).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.remove(&id), Err(DocumentError::NotFound(id)));
    }

    #[test]
    fn test_undo_redo() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(image_at(0.0, 0.0));
        doc.translate(&id, Vec2::new(5.0, 0.0)).unwrap();
        assert!((doc.get(&id).unwrap().x - 5.0).abs() < f64::EPSILON);

        assert!(doc.undo());
        assert!(doc.get(&id).unwrap().x.abs() < f64::EPSILON);
        assert!(doc.undo());
        assert!(doc.is_empty());
        assert!(!doc.undo());

        assert!(doc.redo());
        assert!(doc.redo());
        assert!((doc.get(&id).unwrap().x - 5.0).abs() < f64::EPSILON);
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_undo_depth_is_bounded() {
        let mut doc = CanvasDocument::new().with_undo_depth(3);
        for i in 0..10 {
            doc.add(image_at(i as f64, 0.0));
        }
        let mut undone = 0;
        while doc.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(doc.len(), 7);
    }

    #[test]
    fn test_update_metadata_is_a_pure_replace() {
        let (mut doc, id) = table_doc();
        doc.update_metadata(&id, |m| m.with_size(Size::new(600.0, 150.0)))
            .unwrap();
        let obj = doc.get(&id).unwrap();
        assert!((obj.width - 600.0).abs() < f64::EPSILON);
        let widths = doc.metadata(&id).unwrap().as_table().unwrap().resolved_column_widths();
        assert!((widths.iter().sum::<f64>() - 600.0).abs() < 1e-9);

        assert!(doc.undo());
        assert!((doc.get(&id).unwrap().width - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_metadata_requires_element() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(image_at(0.0, 0.0));
        let result = doc.update_metadata(&id, Clone::clone);
        assert_eq!(result, Err(DocumentError::NotAnElement(id)));
    }

    #[test]
    fn test_unchanged_metadata_records_no_undo() {
        let (mut doc, id) = table_doc();
        doc.undo();
        doc.redo();
        doc.update_metadata(&id, Clone::clone).unwrap();
        assert!(doc.undo());
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_locked_objects_refuse_geometry_edits() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(image_at(0.0, 0.0));
        doc.set_locked(&id, true).unwrap();
        assert_eq!(
            doc.translate(&id, Vec2::new(1.0, 1.0)),
            Err(DocumentError::Locked(id.clone()))
        );
        assert!(doc.remove(&id).is_err());
        doc.set_opacity(&id, 2.0).unwrap();
        assert!((doc.get(&id).unwrap().opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_bounds_resizes_shapes_and_elements() {
        let mut doc = CanvasDocument::new();
        let shape = doc.add(CanvasObject::from_shape(create(ShapeKind::Rectangle, &ShapeOptions::default())));
        doc.set_bounds(&shape, Rect::new(10.0, 10.0, 210.0, 60.0)).unwrap();
        let ObjectProperties::Shape { shape: s } = &doc.get(&shape).unwrap().properties else {
            panic!("expected shape");
        };
        assert!((s.bounds().width() - 200.0).abs() < 1e-9);
        assert!(doc
            .set_bounds(&shape, Rect::new(0.0, 0.0, f64::NAN, 1.0))
            .is_err());
    }

    #[test]
    fn test_duplicate_gets_new_id_and_offset() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(image_at(0.0, 0.0));
        let copy = doc.duplicate(&id).unwrap();
        assert_ne!(id, copy);
        let obj = doc.get(&copy).unwrap();
        assert!((obj.x - 20.0).abs() < f64::EPSILON);
        assert_eq!(obj.z_index, 1);
    }

    #[test]
    fn test_z_order_commands() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(image_at(0.0, 0.0));
        let b = doc.add(image_at(0.0, 0.0));
        let c = doc.add(image_at(0.0, 0.0));

        doc.bring_to_front(&a).unwrap();
        assert_eq!(doc.z_order, vec![b.clone(), c.clone(), a.clone()]);
        assert_eq!(doc.get(&a).unwrap().z_index, 2);

        doc.send_to_back(&a).unwrap();
        assert_eq!(doc.z_order[0], a);
        assert!(!doc.send_backward(&a).unwrap());
        assert!(doc.bring_forward(&a).unwrap());
        assert_eq!(doc.z_order, vec![b, a, c]);
    }

    #[test]
    fn test_group_translate_ungroup() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(image_at(0.0, 0.0));
        let b = doc.add(image_at(100.0, 100.0));
        assert_eq!(doc.group(&[a.clone()]), Err(DocumentError::GroupTooSmall(1)));

        let group = doc.group(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(doc.get(&group).unwrap().bounds(), Rect::new(0.0, 0.0, 150.0, 150.0));

        doc.translate(&group, Vec2::new(10.0, 0.0)).unwrap();
        assert!((doc.get(&b).unwrap().x - 110.0).abs() < f64::EPSILON);

        let members = doc.ungroup(&group).unwrap();
        assert_eq!(members, vec![a.clone(), b]);
        assert!(doc.get(&group).is_none());
        assert!(doc.get(&a).is_some());
        assert_eq!(doc.ungroup(&a), Err(DocumentError::NotAGroup(a)));
    }

    #[test]
    fn test_align() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(image_at(0.0, 0.0));
        let b = doc.add(image_at(100.0, 30.0));
        let moved = doc.align(&[a.clone(), b.clone()], Alignment::Right).unwrap();
        assert_eq!(moved, 1);
        assert!((doc.get(&a).unwrap().x - 100.0).abs() < f64::EPSILON);

        doc.align(&[a.clone(), b.clone()], Alignment::Top).unwrap();
        assert!(doc.get(&b).unwrap().y.abs() < f64::EPSILON);

        // A single object aligns to the page.
        doc.align(&[a.clone()], Alignment::Left).unwrap();
        assert!(doc.get(&a).unwrap().x.abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_testing() {
        let mut doc = CanvasDocument::new();
        let back = doc.add(image_at(0.0, 0.0));
        let front = doc.add(image_at(25.0, 25.0));
        assert_eq!(doc.objects_at_point(Point::new(30.0, 30.0), 0.0), vec![front, back.clone()]);
        assert_eq!(doc.objects_in_rect(Rect::new(0.0, 0.0, 10.0, 10.0)), vec![back]);
    }

    #[test]
    fn test_json_roundtrip() {
        let (doc, id) = table_doc();
        let json = doc.to_json().unwrap();
        let back = CanvasDocument::from_json(&json).unwrap();
        assert_eq!(back.objects, doc.objects);
        assert_eq!(back.z_order, vec![id]);
        assert!(!back.can_undo());
    }

    #[test]
    fn test_canvas_selection() {
        let mut canvas = Canvas::default();
        let (doc, table) = table_doc();
        canvas.document = doc;
        let mut decoration = image_at(0.0, 0.0);
        decoration.selectable = false;
        let decoration = canvas.add_object(decoration);

        canvas.add_to_selection(decoration);
        assert!(canvas.selection.is_empty());

        canvas.select(table.clone());
        assert!(canvas.selected_table().is_some());

        canvas.select_all();
        assert_eq!(canvas.selection, vec![table]);
        assert!(canvas.selected_table().is_some());
    }

    #[test]
    fn test_canvas_undo_prunes_selection() {
        let mut canvas = Canvas::default();
        let id = canvas.add_object(image_at(0.0, 0.0));
        canvas.select(id);
        assert!(canvas.undo());
        assert!(canvas.selection.is_empty());
    }

    #[test]
    fn test_canvas_instances_differ() {
        assert_ne!(Canvas::default().instance_id(), Canvas::default().instance_id());
        let mut canvas = Canvas::default();
        assert_eq!(canvas.ruler_offset(), Vec2::ZERO);
        canvas.toggle_rulers();
        assert_eq!(canvas.ruler_offset(), Vec2::new(20.0, 20.0));
    }
}
