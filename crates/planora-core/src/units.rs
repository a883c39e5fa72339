//! Physical unit conversions and named paper presets.
//!
//! All layout math works in canvas pixels at a fixed density of
//! [`DPI`] pixels per inch. Paper sizes are stored in millimetres and the
//! pixel size is always derived, never stored.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Canvas pixel density.
pub const DPI: f64 = 90.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Canvas pixels per millimetre.
pub const PX_PER_MM: f64 = DPI / MM_PER_INCH;

/// Maximum per-axis difference (in px) for a canvas to match a preset.
pub const PRESET_MATCH_TOLERANCE_PX: f64 = 2.0;

/// Convert millimetres to canvas pixels.
pub const fn mm_to_px(mm: f64) -> f64 {
    mm * PX_PER_MM
}

/// Convert canvas pixels to millimetres.
pub const fn px_to_mm(px: f64) -> f64 {
    px / PX_PER_MM
}

/// A physical or screen unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    Cm,
    In,
    Px,
}

impl Unit {
    /// How many millimetres one of this unit spans.
    fn mm_factor(self) -> f64 {
        match self {
            Unit::Mm => 1.0,
            Unit::Cm => 10.0,
            Unit::In => MM_PER_INCH,
            Unit::Px => 1.0 / PX_PER_MM,
        }
    }

    /// Short suffix used when formatting values.
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Px => "px",
        }
    }

    /// Parse a unit suffix.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Some(Unit::Mm),
            "cm" => Some(Unit::Cm),
            "in" | "inch" | "\"" => Some(Unit::In),
            "px" => Some(Unit::Px),
            _ => None,
        }
    }
}

/// Convert a value between units.
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    if from == to {
        return value;
    }
    value * from.mm_factor() / to.mm_factor()
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Physical page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Default for PaperSize {
    fn default() -> Self {
        A4
    }
}

impl PaperSize {
    pub const fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    /// Build a paper size from a canvas pixel size.
    pub fn from_px(width_px: f64, height_px: f64) -> Self {
        Self::new(px_to_mm(width_px), px_to_mm(height_px))
    }

    /// Width in canvas pixels.
    pub fn width_px(&self) -> f64 {
        mm_to_px(self.width_mm)
    }

    /// Height in canvas pixels.
    pub fn height_px(&self) -> f64 {
        mm_to_px(self.height_mm)
    }

    /// Pixel size rounded to whole pixels, as the canvas is allocated.
    pub fn px_size(&self) -> Size {
        Size::new(self.width_px().round(), self.height_px().round())
    }

    /// Orientation implied by the aspect ratio. Square pages report portrait.
    pub fn orientation(&self) -> Orientation {
        if self.width_mm > self.height_mm {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Return this size rotated (if needed) to match `orientation`.
    pub fn oriented(&self, orientation: Orientation) -> Self {
        let (short, long) = if self.width_mm <= self.height_mm {
            (self.width_mm, self.height_mm)
        } else {
            (self.height_mm, self.width_mm)
        };
        match orientation {
            Orientation::Portrait => Self::new(short, long),
            Orientation::Landscape => Self::new(long, short),
        }
    }
}

/// Grouping used by preset pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Paper,
    Planner,
    Social,
}

/// A named page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub category: PresetCategory,
    /// Size in portrait orientation.
    pub size: PaperSize,
}

const A4: PaperSize = PaperSize::new(210.0, 297.0);

/// All known presets, stored in portrait orientation.
pub static PRESETS: &[PaperPreset] = &[
    PaperPreset {
        id: "a3",
        name: "A3",
        category: PresetCategory::Paper,
        size: PaperSize::new(297.0, 420.0),
    },
    PaperPreset {
        id: "a4",
        name: "A4",
        category: PresetCategory::Paper,
        size: A4,
    },
    PaperPreset {
        id: "a5",
        name: "A5",
        category: PresetCategory::Paper,
        size: PaperSize::new(148.0, 210.0),
    },
    PaperPreset {
        id: "a6",
        name: "A6",
        category: PresetCategory::Paper,
        size: PaperSize::new(105.0, 148.0),
    },
    PaperPreset {
        id: "letter",
        name: "Letter",
        category: PresetCategory::Paper,
        size: PaperSize::new(215.9, 279.4),
    },
    PaperPreset {
        id: "legal",
        name: "Legal",
        category: PresetCategory::Paper,
        size: PaperSize::new(215.9, 355.6),
    },
    PaperPreset {
        id: "tabloid",
        name: "Tabloid",
        category: PresetCategory::Paper,
        size: PaperSize::new(279.4, 431.8),
    },
    PaperPreset {
        id: "half-letter",
        name: "Half Letter",
        category: PresetCategory::Planner,
        size: PaperSize::new(139.7, 215.9),
    },
    PaperPreset {
        id: "b5",
        name: "B5",
        category: PresetCategory::Planner,
        size: PaperSize::new(176.0, 250.0),
    },
    PaperPreset {
        id: "instagram-square",
        name: "Instagram Square",
        category: PresetCategory::Social,
        size: PaperSize::new(px_to_mm(1080.0), px_to_mm(1080.0)),
    },
    PaperPreset {
        id: "instagram-portrait",
        name: "Instagram Portrait",
        category: PresetCategory::Social,
        size: PaperSize::new(px_to_mm(1080.0), px_to_mm(1350.0)),
    },
    PaperPreset {
        id: "instagram-story",
        name: "Instagram Story",
        category: PresetCategory::Social,
        size: PaperSize::new(px_to_mm(1080.0), px_to_mm(1920.0)),
    },
];

/// Look up a preset by id or display name (case-insensitive).
pub fn find_preset(key: &str) -> Option<&'static PaperPreset> {
    let key = key.trim();
    PRESETS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(key) || p.name.eq_ignore_ascii_case(key))
}

/// A preset matched against a canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetMatch {
    pub preset: &'static PaperPreset,
    pub orientation: Orientation,
}

/// Find the preset whose pixel size matches `width_px` × `height_px` in
/// either orientation, within [`PRESET_MATCH_TOLERANCE_PX`].
pub fn match_preset(width_px: f64, height_px: f64) -> Option<PresetMatch> {
    let close = |a: f64, b: f64| (a - b).abs() <= PRESET_MATCH_TOLERANCE_PX;
    PRESETS.iter().find_map(|preset| {
        let pw = preset.size.width_px();
        let ph = preset.size.height_px();
        if close(width_px, pw) && close(height_px, ph) {
            Some(PresetMatch {
                preset,
                orientation: Orientation::Portrait,
            })
        } else if close(width_px, ph) && close(height_px, pw) {
            Some(PresetMatch {
                preset,
                orientation: Orientation::Landscape,
            })
        } else {
            None
        }
    })
}
