//! Self-contained style blocks shared by element metadata and primitives.
//!
//! Styles are plain values: metadata embeds them directly and never refers
//! to a shared style object, so a metadata value can be serialized and
//! replayed on its own.

use crate::color::SerializableColor;
use serde::{Deserialize, Serialize};

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    /// CSS-style numeric weight.
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }
}

/// Horizontal text alignment inside a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment inside a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Stroke style for lines and borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Cycle to the next stroke style.
    pub fn next(self) -> Self {
        match self {
            StrokeStyle::Solid => StrokeStyle::Dashed,
            StrokeStyle::Dashed => StrokeStyle::Dotted,
            StrokeStyle::Dotted => StrokeStyle::Solid,
        }
    }
}

/// Font description carried by text runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: FontWeight,
    pub color: SerializableColor,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            size: 14.0,
            weight: FontWeight::Regular,
            color: SerializableColor::rgb(0x1f, 0x29, 0x37),
            italic: false,
        }
    }
}

impl FontSpec {
    pub fn new(size: f64, weight: FontWeight, color: SerializableColor) -> Self {
        Self {
            size,
            weight,
            color,
            ..Self::default()
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            ..self.clone()
        }
    }
}

/// A stroked edge: colour, width and dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Border {
    pub color: SerializableColor,
    pub width: f64,
    pub style: StrokeStyle,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            color: SerializableColor::rgb(0xd1, 0xd5, 0xdb),
            width: 1.0,
            style: StrokeStyle::Solid,
        }
    }
}

impl Border {
    pub const fn new(color: SerializableColor, width: f64) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// A border that draws nothing.
    pub const fn none() -> Self {
        Self::new(SerializableColor::transparent(), 0.0)
    }

    /// Whether this border produces visible output.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.width.is_finite() && !self.color.is_transparent()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            ..*self
        }
    }
}
