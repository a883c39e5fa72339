//! Table metadata and track (column/row) arithmetic.

use crate::color::SerializableColor;
use crate::style::{Border, FontSpec, FontWeight, TextAlign};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Text placed in one cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellContent {
    pub row: u32,
    pub column: u32,
    pub text: String,
    pub align: Option<TextAlign>,
    pub background: Option<SerializableColor>,
}

impl CellContent {
    pub fn new(row: u32, column: u32, text: impl Into<String>) -> Self {
        Self {
            row,
            column,
            text: text.into(),
            ..Self::default()
        }
    }
}

/// A rectangular run of cells drawn as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMerge {
    pub row: u32,
    pub column: u32,
    pub row_span: u32,
    pub col_span: u32,
}

impl CellMerge {
    pub fn new(row: u32, column: u32, row_span: u32, col_span: u32) -> Self {
        Self {
            row,
            column,
            row_span,
            col_span,
        }
    }

    pub fn contains(&self, row: u32, column: u32) -> bool {
        row >= self.row
            && row < self.row + self.row_span
            && column >= self.column
            && column < self.column + self.col_span
    }

    fn overlaps(&self, other: &CellMerge) -> bool {
        self.row < other.row + other.row_span
            && other.row < self.row + self.row_span
            && self.column < other.column + other.col_span
            && other.column < self.column + self.col_span
    }
}

/// Which band a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowBand {
    Header,
    Body,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableStyle {
    pub background: SerializableColor,
    pub border: Border,
    pub grid: Border,
    pub header_background: SerializableColor,
    pub header_font: FontSpec,
    pub body_font: FontSpec,
    pub footer_background: SerializableColor,
    pub footer_font: FontSpec,
    pub text_align: TextAlign,
    pub cell_padding: f64,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            background: SerializableColor::white(),
            border: Border::new(SerializableColor::rgb(0x6b, 0x72, 0x80), 1.5),
            grid: Border::default(),
            header_background: SerializableColor::rgb(0x1e, 0x40, 0xaf),
            header_font: FontSpec::new(13.0, FontWeight::Bold, SerializableColor::white()),
            body_font: FontSpec::new(12.0, FontWeight::Regular, SerializableColor::rgb(0x1f, 0x29, 0x37)),
            footer_background: SerializableColor::rgb(0xf3, 0xf4, 0xf6),
            footer_font: FontSpec::new(12.0, FontWeight::Bold, SerializableColor::rgb(0x37, 0x41, 0x51)),
            text_align: TextAlign::Left,
            cell_padding: 6.0,
        }
    }
}

impl TableStyle {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            border: self.border.scaled(factor),
            grid: self.grid.scaled(factor),
            header_font: self.header_font.scaled(factor),
            body_font: self.body_font.scaled(factor),
            footer_font: self.footer_font.scaled(factor),
            cell_padding: self.cell_padding * factor,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableMetadata {
    pub size: Size,
    pub rows: u32,
    pub columns: u32,
    /// Must have `columns` entries when present; equal split otherwise.
    pub column_widths: Option<Vec<f64>>,
    /// Must have `rows` entries when present; equal split otherwise.
    pub row_heights: Option<Vec<f64>>,
    pub cell_contents: Vec<CellContent>,
    pub merges: Vec<CellMerge>,
    pub header_rows: u32,
    pub footer_rows: u32,
    pub style: TableStyle,
}

impl Default for TableMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(360.0, 200.0),
            rows: 4,
            columns: 3,
            column_widths: None,
            row_heights: None,
            cell_contents: Vec::new(),
            merges: Vec::new(),
            header_rows: 1,
            footer_rows: 0,
            style: TableStyle::default(),
        }
    }
}

impl TableMetadata {
    pub fn new(rows: u32, columns: u32, size: Size) -> Self {
        Self {
            rows,
            columns,
            size,
            ..Self::default()
        }
    }

    /// Column widths, falling back to an equal split of `size.width` when
    /// the stored widths are missing or malformed.
    pub fn resolved_column_widths(&self) -> Vec<f64> {
        resolve_tracks(
            self.column_widths.as_deref(),
            self.columns as usize,
            self.size.width,
            "column widths",
        )
    }

    /// Row heights, falling back to an equal split of `size.height`.
    pub fn resolved_row_heights(&self) -> Vec<f64> {
        resolve_tracks(
            self.row_heights.as_deref(),
            self.rows as usize,
            self.size.height,
            "row heights",
        )
    }

    /// Merges that lie inside the grid, span at least two cells, and do not
    /// overlap an earlier merge. Spans running past the edge are clipped.
    pub fn resolved_merges(&self) -> Vec<CellMerge> {
        let mut accepted: Vec<CellMerge> = Vec::new();
        for merge in &self.merges {
            if merge.row >= self.rows || merge.column >= self.columns {
                continue;
            }
            let clipped = CellMerge {
                row_span: merge.row_span.max(1).min(self.rows - merge.row),
                col_span: merge.col_span.max(1).min(self.columns - merge.column),
                ..*merge
            };
            if clipped.row_span * clipped.col_span < 2 {
                continue;
            }
            if accepted.iter().any(|m| m.overlaps(&clipped)) {
                log::warn!("ignoring overlapping table merge {clipped:?}");
                continue;
            }
            accepted.push(clipped);
        }
        accepted
    }

    pub fn row_band(&self, row: u32) -> RowBand {
        let footer_start = self.rows.saturating_sub(self.footer_rows);
        if row < self.header_rows {
            RowBand::Header
        } else if row >= footer_start && self.footer_rows > 0 {
            RowBand::Footer
        } else {
            RowBand::Body
        }
    }

    /// Content for a cell; the first entry wins when duplicated.
    pub fn cell(&self, row: u32, column: u32) -> Option<&CellContent> {
        self.cell_contents
            .iter()
            .find(|c| c.row == row && c.column == column)
    }

    /// Move the divider between column `boundary` and `boundary + 1` by
    /// `delta` canvas pixels. Returns `None` when nothing would change.
    pub fn with_column_shift(&self, boundary: usize, delta: f64, min: f64) -> Option<Self> {
        let widths = redistribute(&self.resolved_column_widths(), boundary, delta, min)?;
        Some(Self {
            column_widths: Some(widths),
            ..self.clone()
        })
    }

    /// Move the divider between row `boundary` and `boundary + 1`.
    pub fn with_row_shift(&self, boundary: usize, delta: f64, min: f64) -> Option<Self> {
        let heights = redistribute(&self.resolved_row_heights(), boundary, delta, min)?;
        Some(Self {
            row_heights: Some(heights),
            ..self.clone()
        })
    }

    /// Resize the table, scaling explicit tracks proportionally.
    pub fn resized(&self, size: Size) -> Self {
        let scale_tracks = |tracks: &Option<Vec<f64>>, resolved: Vec<f64>, target: f64| -> Option<Vec<f64>> {
            tracks.as_ref()?;
            let total: f64 = resolved.iter().sum();
            if total <= 0.0 || !target.is_finite() {
                return None;
            }
            Some(resolved.iter().map(|t| t * target / total).collect())
        };
        Self {
            size,
            column_widths: scale_tracks(&self.column_widths, self.resolved_column_widths(), size.width),
            row_heights: scale_tracks(&self.row_heights, self.resolved_row_heights(), size.height),
            ..self.clone()
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |tracks: &Option<Vec<f64>>| -> Option<Vec<f64>> {
            tracks
                .as_ref()
                .map(|t| t.iter().map(|v| v * factor).collect())
        };
        Self {
            size: self.size * factor,
            column_widths: scale(&self.column_widths),
            row_heights: scale(&self.row_heights),
            style: self.style.scaled(factor),
            ..self.clone()
        }
    }
}

fn resolve_tracks(given: Option<&[f64]>, count: usize, total: f64, what: &str) -> Vec<f64> {
    if let Some(tracks) = given {
        if tracks.len() == count && tracks.iter().all(|t| t.is_finite() && *t >= 0.0) {
            return tracks.to_vec();
        }
        log::warn!(
            "malformed table {what}: expected {count} finite entries, got {}; using equal split",
            tracks.len()
        );
    }
    if count == 0 {
        return Vec::new();
    }
    let total = if total.is_finite() { total.max(0.0) } else { 0.0 };
    vec![total / count as f64; count]
}

/// Running offsets of `tracks`, starting at zero. Has `tracks.len() + 1` entries.
pub fn prefix_offsets(tracks: &[f64]) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(tracks.len() + 1);
    let mut acc = 0.0;
    offsets.push(acc);
    for t in tracks {
        acc += t;
        offsets.push(acc);
    }
    offsets
}

/// Shift `delta` between the two tracks adjacent to divider `boundary`
/// (between `tracks[boundary]` and `tracks[boundary + 1]`), keeping the sum
/// constant and neither track below `min`.
///
/// Returns `None` for a zero or non-finite delta, an out-of-range boundary,
/// or when clamping leaves nothing to move.
pub fn redistribute(tracks: &[f64], boundary: usize, delta: f64, min: f64) -> Option<Vec<f64>> {
    if !delta.is_finite() || delta == 0.0 || boundary + 1 >= tracks.len() {
        return None;
    }
    let min = if min.is_finite() { min.max(0.0) } else { 0.0 };
    let (before, after) = (tracks[boundary], tracks[boundary + 1]);
    let lower = (min - before).min(0.0);
    let upper = (after - min).max(0.0);
    let applied = delta.clamp(lower, upper);
    if applied == 0.0 {
        return None;
    }
    let mut out = tracks.to_vec();
    out[boundary] = before + applied;
    out[boundary + 1] = after - applied;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redistribute_conserves_total() {
        let widths = redistribute(&[100.0, 100.0, 100.0], 1, 20.0, 10.0).unwrap();
        assert_eq!(widths, vec![100.0, 120.0, 80.0]);
        let total: f64 = widths.iter().sum();
        assert!((total - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_redistribute_clamps_to_min() {
        let widths = redistribute(&[100.0, 100.0, 100.0], 0, 500.0, 10.0).unwrap();
        assert_eq!(widths, vec![190.0, 10.0, 100.0]);
        let widths = redistribute(&[100.0, 100.0, 100.0], 0, -500.0, 10.0).unwrap();
        assert_eq!(widths, vec![10.0, 190.0, 100.0]);
    }

    #[test]
    fn test_redistribute_noops() {
        assert!(redistribute(&[100.0, 100.0], 0, 0.0, 10.0).is_none());
        assert!(redistribute(&[100.0, 100.0], 0, f64::NAN, 10.0).is_none());
        assert!(redistribute(&[100.0, 100.0], 0, f64::INFINITY, 10.0).is_none());
        assert!(redistribute(&[100.0, 100.0], 1, 5.0, 10.0).is_none());
        assert!(redistribute(&[100.0, 10.0], 0, 5.0, 10.0).is_none());
    }

    #[test]
    fn test_malformed_widths_fall_back_to_equal_split() {
        let table = TableMetadata {
            column_widths: Some(vec![50.0, 50.0]),
            ..TableMetadata::new(2, 3, Size::new(300.0, 100.0))
        };
        assert_eq!(table.resolved_column_widths(), vec![100.0, 100.0, 100.0]);
        assert_eq!(table.resolved_row_heights(), vec![50.0, 50.0]);
    }

    #[test]
    fn test_prefix_offsets() {
        assert_eq!(prefix_offsets(&[10.0, 20.0, 30.0]), vec![0.0, 10.0, 30.0, 60.0]);
    }

    #[test]
    fn test_resolved_merges_clip_and_reject_overlap() {
        let table = TableMetadata {
            merges: vec![
                CellMerge::new(0, 0, 1, 5),
                CellMerge::new(0, 1, 2, 1),
                CellMerge::new(3, 2, 1, 1),
                CellMerge::new(9, 0, 2, 2),
            ],
            ..TableMetadata::new(4, 3, Size::new(300.0, 200.0))
        };
        assert_eq!(table.resolved_merges(), vec![CellMerge::new(0, 0, 1, 3)]);
    }

    #[test]
    fn test_row_bands() {
        let table = TableMetadata {
            header_rows: 1,
            footer_rows: 1,
            ..TableMetadata::new(4, 2, Size::new(100.0, 100.0))
        };
        assert_eq!(table.row_band(0), RowBand::Header);
        assert_eq!(table.row_band(1), RowBand::Body);
        assert_eq!(table.row_band(3), RowBand::Footer);
    }

    #[test]
    fn test_column_shift_from_equal_split() {
        let table = TableMetadata::new(2, 3, Size::new(300.0, 100.0));
        let shifted = table.with_column_shift(1, 20.0, 10.0).unwrap();
        assert_eq!(shifted.column_widths, Some(vec![100.0, 120.0, 80.0]));
        assert!(table.column_widths.is_none());
    }

    #[test]
    fn test_resized_scales_explicit_tracks() {
        let table = TableMetadata {
            column_widths: Some(vec![100.0, 200.0]),
            ..TableMetadata::new(1, 2, Size::new(300.0, 50.0))
        };
        let resized = table.resized(Size::new(600.0, 50.0));
        assert_eq!(resized.column_widths, Some(vec![200.0, 400.0]));
        assert!(resized.row_heights.is_none());
    }
}
