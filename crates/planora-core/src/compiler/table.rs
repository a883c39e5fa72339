//! Tables with explicit or equal tracks, header/footer bands and merges.

use super::safe_size;
use crate::graphics::{GraphicsTree, Primitive, Role};
use crate::metadata::{CellMerge, RowBand, TableMetadata, prefix_offsets};
use crate::style::{Border, VerticalAlign};
use kurbo::{Point, Rect};

pub(super) fn compile(meta: &TableMetadata) -> GraphicsTree {
    let meta = TableMetadata {
        size: safe_size(meta.size),
        ..meta.clone()
    };
    let style = &meta.style;
    let xs = prefix_offsets(&meta.resolved_column_widths());
    let ys = prefix_offsets(&meta.resolved_row_heights());
    let merges = meta.resolved_merges();
    let width = xs.last().copied().unwrap_or(0.0);
    let height = ys.last().copied().unwrap_or(0.0);

    let mut tree = GraphicsTree::new();
    tree.push(Primitive::rect(
        Rect::new(0.0, 0.0, width, height),
        Some(style.background).filter(|c| !c.is_transparent()),
        None,
        Role::Frame,
    ));

    // Band backgrounds first so cell overrides and text paint on top.
    for row in 0..meta.rows {
        let fill = match meta.row_band(row) {
            RowBand::Header => Some((style.header_background, Role::Header)),
            RowBand::Footer => Some((style.footer_background, Role::Body)),
            RowBand::Body => None,
        };
        if let Some((color, role)) = fill {
            let r = row as usize;
            tree.push(Primitive::rect(
                Rect::new(0.0, ys[r], width, ys[r + 1]),
                Some(color),
                None,
                role,
            ));
        }
    }

    for row in 0..meta.rows {
        for column in 0..meta.columns {
            let Some(span) = cell_span(&merges, row, column) else {
                continue;
            };
            let rect = Rect::new(
                xs[column as usize],
                ys[row as usize],
                xs[(column + span.col_span) as usize],
                ys[(row + span.row_span) as usize],
            );
            let Some(content) = meta.cell(row, column) else {
                continue;
            };
            if let Some(background) = content.background {
                tree.push(Primitive::rect(rect, Some(background), None, Role::Content));
            }
            if content.text.is_empty() {
                continue;
            }
            let font = match meta.row_band(row) {
                RowBand::Header => &style.header_font,
                RowBand::Footer => &style.footer_font,
                RowBand::Body => &style.body_font,
            };
            let pad = style
                .cell_padding
                .max(0.0)
                .min(rect.width() / 2.0)
                .min(rect.height() / 2.0);
            tree.push(Primitive::text(
                rect.inset(-pad),
                content.text.clone(),
                font,
                content.align.unwrap_or(style.text_align),
                VerticalAlign::Middle,
                Role::Content,
            ));
        }
    }

    if style.grid.is_visible() {
        grid_lines(&mut tree, &meta, &xs, &ys, &merges, style.grid);
    }

    tree.push(Primitive::rect(
        Rect::new(0.0, 0.0, width, height),
        None,
        Some(style.border),
        Role::Frame,
    ));
    tree
}

/// Span of the cell anchored at `(row, column)`, or `None` when the cell is
/// covered by a merge anchored elsewhere.
fn cell_span(merges: &[CellMerge], row: u32, column: u32) -> Option<CellMerge> {
    match merges.iter().find(|m| m.contains(row, column)) {
        Some(m) if m.row == row && m.column == column => Some(*m),
        Some(_) => None,
        None => Some(CellMerge::new(row, column, 1, 1)),
    }
}

/// Interior grid lines, broken wherever a merge spans the divider.
/// Consecutive drawable segments are joined into one line.
fn grid_lines(
    tree: &mut GraphicsTree,
    meta: &TableMetadata,
    xs: &[f64],
    ys: &[f64],
    merges: &[CellMerge],
    stroke: Border,
) {
    // Vertical divider `b` sits between column b-1 and b.
    for b in 1..meta.columns {
        let crosses = |row: u32| {
            merges
                .iter()
                .any(|m| m.column < b && b < m.column + m.col_span && m.row <= row && row < m.row + m.row_span)
        };
        let x = xs[b as usize];
        for (start, end) in runs(meta.rows, crosses) {
            tree.push(Primitive::line(
                Point::new(x, ys[start as usize]),
                Point::new(x, ys[end as usize]),
                stroke,
                Role::Grid,
            ));
        }
    }
    for b in 1..meta.rows {
        let crosses = |column: u32| {
            merges.iter().any(|m| {
                m.row < b && b < m.row + m.row_span && m.column <= column && column < m.column + m.col_span
            })
        };
        let y = ys[b as usize];
        for (start, end) in runs(meta.columns, crosses) {
            tree.push(Primitive::line(
                Point::new(xs[start as usize], y),
                Point::new(xs[end as usize], y),
                stroke,
                Role::Grid,
            ));
        }
    }
}

/// Maximal `[start, end)` runs of tracks in `0..count` not blocked.
fn runs(count: u32, blocked: impl Fn(u32) -> bool) -> Vec<(u32, u32)> {
    let mut out = Vec::new();
    let mut start = None;
    for i in 0..count {
        match (blocked(i), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                out.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::SerializableColor;
    use crate::metadata::CellContent;
    use kurbo::Size;

    fn lines(tree: &GraphicsTree) -> Vec<Rect> {
        tree.with_role(Role::Grid).map(Primitive::bounds).collect()
    }

    #[test]
    fn test_prefix_sum_geometry() {
        let meta = TableMetadata {
            column_widths: Some(vec![50.0, 100.0, 150.0]),
            header_rows: 0,
            ..TableMetadata::new(2, 3, Size::new(300.0, 100.0))
        };
        let tree = compile(&meta);
        let verticals: Vec<_> = lines(&tree).into_iter().filter(|r| r.width() == 0.0).collect();
        assert_eq!(verticals.len(), 2);
        assert!((verticals[0].x0 - 50.0).abs() < f64::EPSILON);
        assert!((verticals[1].x0 - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_widths_render_equal_split() {
        let meta = TableMetadata {
            column_widths: Some(vec![10.0]),
            header_rows: 0,
            ..TableMetadata::new(1, 3, Size::new(300.0, 40.0))
        };
        let tree = compile(&meta);
        let xs: Vec<_> = lines(&tree).iter().map(|r| r.x0).collect();
        assert_eq!(xs, vec![100.0, 200.0]);
    }

    #[test]
    fn test_merge_suppresses_interior_lines() {
        let meta = TableMetadata {
            merges: vec![CellMerge::new(0, 0, 1, 2)],
            cell_contents: vec![CellContent::new(0, 0, "Merged")],
            header_rows: 0,
            ..TableMetadata::new(2, 2, Size::new(200.0, 100.0))
        };
        let tree = compile(&meta);
        let grid = lines(&tree);
        // Vertical divider only spans the second row; horizontal is whole.
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], Rect::new(100.0, 50.0, 100.0, 100.0));
        assert_eq!(grid[1], Rect::new(0.0, 50.0, 200.0, 50.0));

        let text = tree.with_role(Role::Content).next().unwrap();
        let b = text.bounds();
        assert!(b.width() > 100.0);
    }

    #[test]
    fn test_covered_cells_are_skipped() {
        let meta = TableMetadata {
            merges: vec![CellMerge::new(0, 0, 2, 2)],
            cell_contents: vec![
                CellContent::new(0, 0, "Anchor"),
                CellContent::new(1, 1, "Hidden"),
            ],
            ..TableMetadata::new(2, 2, Size::new(200.0, 100.0))
        };
        let tree = compile(&meta);
        let texts: Vec<_> = tree.iter().filter_map(|p| p.text_content()).collect();
        assert_eq!(texts, vec!["Anchor"]);
        assert!(lines(&tree).is_empty());
    }

    #[test]
    fn test_header_and_footer_colors() {
        let meta = TableMetadata {
            header_rows: 1,
            footer_rows: 1,
            cell_contents: vec![
                CellContent::new(0, 0, "Head"),
                CellContent::new(1, 0, "Body"),
                CellContent::new(2, 0, "Foot"),
            ],
            ..TableMetadata::new(3, 1, Size::new(100.0, 90.0))
        };
        let tree = compile(&meta);
        let font_of = |label: &str| {
            tree.iter()
                .find_map(|p| match p {
                    Primitive::Text { content, font, .. } if content == label => Some(font.clone()),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(font_of("Head"), meta.style.header_font);
        assert_eq!(font_of("Body"), meta.style.body_font);
        assert_eq!(font_of("Foot"), meta.style.footer_font);
        assert_eq!(tree.with_role(Role::Header).count(), 1);
    }

    #[test]
    fn test_cell_background_override() {
        let red = SerializableColor::rgb(255, 0, 0);
        let meta = TableMetadata {
            cell_contents: vec![CellContent {
                background: Some(red),
                ..CellContent::new(1, 1, "")
            }],
            ..TableMetadata::new(2, 2, Size::new(200.0, 100.0))
        };
        let tree = compile(&meta);
        let cell = tree.with_role(Role::Content).next().unwrap();
        assert_eq!(cell.bounds(), Rect::new(100.0, 50.0, 200.0, 100.0));
    }

    #[test]
    fn test_runs() {
        assert_eq!(runs(4, |i| i == 1), vec![(0, 1), (2, 4)]);
        assert_eq!(runs(3, |_| false), vec![(0, 3)]);
        assert!(runs(2, |_| true).is_empty());
    }
}
