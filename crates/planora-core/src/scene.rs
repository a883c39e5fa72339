//! Whole-document compilation for a rendering surface.

use crate::canvas::CanvasDocument;
use crate::compiler::compile_object;
use crate::graphics::GraphicsTree;
use crate::holiday::HolidayLookup;
use crate::metadata::ElementMetadata;
use crate::object::ObjectId;
use kurbo::{Rect, Size};
use serde::Serialize;

/// One compiled object. Nodes carry no reference to their metadata, only
/// the id to look it up again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub object_id: ObjectId,
    /// Object bounds before rotation, in canvas coordinates.
    pub bounds: Rect,
    /// Degrees clockwise around the centre of `bounds`.
    pub rotation: f64,
    pub opacity: f64,
    pub tree: GraphicsTree,
}

/// A document compiled back to front.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub size: Size,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    /// Compile every visible object in z-order. Groups contribute nothing of
    /// their own.
    pub fn build<H: HolidayLookup + ?Sized>(document: &CanvasDocument, holidays: &H) -> Self {
        let nodes: Vec<SceneNode> = document
            .objects_ordered()
            .filter(|o| o.visible)
            .filter_map(|object| {
                let tree = compile_object(object, holidays);
                if tree.is_empty() {
                    return None;
                }
                Some(SceneNode {
                    object_id: object.id.clone(),
                    bounds: object.bounds(),
                    rotation: object.rotation,
                    opacity: object.opacity,
                    tree,
                })
            })
            .collect();
        log::debug!("built scene with {} nodes", nodes.len());
        Self {
            size: document.size(),
            nodes,
        }
    }

    /// Id of the object a node was compiled from.
    pub fn source<'a>(&self, node: &'a SceneNode) -> &'a ObjectId {
        &node.object_id
    }

    /// Metadata behind a node, looked up in the document.
    pub fn metadata<'d>(&self, node: &SceneNode, document: &'d CanvasDocument) -> Option<&'d ElementMetadata> {
        document.metadata(self.source(node))
    }

    pub fn node(&self, id: &ObjectId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.object_id == *id)
    }

    pub fn primitive_count(&self) -> usize {
        self.nodes.iter().map(|n| n.tree.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
