//! Photo collage metadata.

use crate::color::SerializableColor;
use crate::style::Border;
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Slot arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CollageLayout {
    /// Uniform rows × columns.
    Grid { rows: u32, columns: u32 },
    /// One large slot on the left, `count` stacked on the right.
    FeatureLeft { count: u32 },
    /// One large slot on top, `count` side by side below.
    FeatureTop { count: u32 },
}

impl Default for CollageLayout {
    fn default() -> Self {
        CollageLayout::Grid {
            rows: 2,
            columns: 2,
        }
    }
}

/// One photo slot. The image reference is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollageSlot {
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollageMetadata {
    pub size: Size,
    pub layout: CollageLayout,
    pub gap: f64,
    pub corner_radius: f64,
    pub slots: Vec<CollageSlot>,
    pub background: SerializableColor,
    pub slot_background: SerializableColor,
    pub slot_border: Border,
}

impl Default for CollageMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(400.0, 300.0),
            layout: CollageLayout::default(),
            gap: 8.0,
            corner_radius: 0.0,
            slots: Vec::new(),
            background: SerializableColor::white(),
            slot_background: SerializableColor::rgb(0xe5, 0xe7, 0xeb),
            slot_border: Border::none(),
        }
    }
}

impl CollageMetadata {
    /// Slot rectangles relative to the collage's top-left corner.
    pub fn slot_rects(&self) -> Vec<Rect> {
        let gap = if self.gap.is_finite() { self.gap.max(0.0) } else { 0.0 };
        let full = Rect::new(gap, gap, self.size.width - gap, self.size.height - gap);
        if full.width() <= 0.0 || full.height() <= 0.0 {
            return Vec::new();
        }
        match self.layout {
            CollageLayout::Grid { rows, columns } => {
                split_grid(full, rows.max(1), columns.max(1), gap)
            }
            CollageLayout::FeatureLeft { count } => {
                let count = count.max(1);
                let feature_w = (full.width() - gap) * 0.6;
                let feature = Rect::new(full.x0, full.y0, full.x0 + feature_w, full.y1);
                let side = Rect::new(feature.x1 + gap, full.y0, full.x1, full.y1);
                let mut rects = vec![feature];
                rects.extend(split_grid(side, count, 1, gap));
                rects
            }
            CollageLayout::FeatureTop { count } => {
                let count = count.max(1);
                let feature_h = (full.height() - gap) * 0.6;
                let feature = Rect::new(full.x0, full.y0, full.x1, full.y0 + feature_h);
                let below = Rect::new(full.x0, feature.y1 + gap, full.x1, full.y1);
                let mut rects = vec![feature];
                rects.extend(split_grid(below, 1, count, gap));
                rects
            }
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            gap: self.gap * factor,
            corner_radius: self.corner_radius * factor,
            slot_border: self.slot_border.scaled(factor),
            ..self.clone()
        }
    }
}

fn split_grid(area: Rect, rows: u32, columns: u32, gap: f64) -> Vec<Rect> {
    let cell_w = ((area.width() - gap * (columns - 1) as f64) / columns as f64).max(0.0);
    let cell_h = ((area.height() - gap * (rows - 1) as f64) / rows as f64).max(0.0);
    (0..rows)
        .flat_map(|r| {
            (0..columns).map(move |c| {
                let x = area.x0 + c as f64 * (cell_w + gap);
                let y = area.y0 + r as f64 * (cell_h + gap);
                Rect::new(x, y, x + cell_w, y + cell_h)
            })
        })
        .collect()
}
