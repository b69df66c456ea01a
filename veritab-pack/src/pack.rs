//! Guillotine placement and the binary-search sizing driver.
use log::{debug, info};

use crate::grid::DynamicGrid;

/// A rectangle to lay out.
///
/// Width and height are inputs; the position and the packed flag are
/// produced by the packer. Sizes must be positive for a rectangle to be
/// placeable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub packed: bool,
}

impl Rect {
    /// Create an unpacked rectangle at the origin.
    pub fn new(width: f64, height: f64) -> Rect {
        Rect {
            width,
            height,
            x: 0.0,
            y: 0.0,
            packed: false,
        }
    }

    fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Summary of a finished packing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PackStats {
    /// Width of the bounding box of all packed rectangles.
    pub width: f64,
    /// Height of the bounding box of all packed rectangles.
    pub height: f64,
    /// Total packed rectangle area divided by the bounding box area.
    pub efficiency: f64,
}

/// Place every rectangle that fits into a `width` × `height` container.
///
/// Rectangles are placed largest-area-first; equal areas keep their input
/// order. Each rectangle goes to the first free position in row-major scan
/// order, then the spanned row and column are split to its exact size so
/// the leftover space stays packable. A rectangle that fits nowhere is left
/// unpacked and packing continues with the rest.
pub fn pack_rects(rects: &mut [Rect], width: f64, height: f64) {
    rects.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let mut grid = DynamicGrid::new(width, height);

    for rect in rects.iter_mut() {
        rect.x = 0.0;
        rect.y = 0.0;
        rect.packed = false;

        // Placement always splits one row and one column, so a full grid
        // cannot take any further rectangles.
        if !grid.can_split() {
            continue;
        }

        let mut y_pos = 0.0;
        'scan: for row in 0..grid.rows() {
            let mut x_pos = 0.0;

            for col in 0..grid.cols() {
                if let Some(placement) = grid.can_be_placed(col, row, rect.width, rect.height) {
                    rect.x = x_pos;
                    rect.y = y_pos;
                    rect.packed = true;

                    let last_col = col + placement.cols_spanned - 1;
                    grid.split_column(last_col, placement.leftover_width);

                    let last_row = row + placement.rows_spanned - 1;
                    grid.split_row(last_row, placement.leftover_height);

                    for c in col..=last_col {
                        for r in row..=last_row {
                            grid.set(c, r, true);
                        }
                    }

                    break 'scan;
                }

                x_pos += grid.col_width(col);
            }

            y_pos += grid.row_height(row);
        }
    }
}

/// Bounding dimensions and packing efficiency of the packed rectangles.
///
/// With no packed rectangle the dimensions are zero and the efficiency is
/// undefined (NaN).
pub fn pack_stats(rects: &[Rect]) -> PackStats {
    let mut packed_area = 0.0;
    let mut width: f64 = 0.0;
    let mut height: f64 = 0.0;

    for rect in rects.iter().filter(|rect| rect.packed) {
        packed_area += rect.area();
        width = width.max(rect.x + rect.width);
        height = height.max(rect.y + rect.height);
    }

    PackStats {
        width,
        height,
        efficiency: packed_area / (width * height),
    }
}

/// Find the smallest container of a fixed aspect ratio that packs every
/// rectangle, and leave the rectangles positioned inside it.
///
/// `ratio` is the container height divided by its width. The first phase
/// doubles the trial width until every rectangle packs; the second phase
/// bisects for the smallest width that still packs everything, re-running
/// the packer from scratch at every trial. When `reverse` is set the
/// searched dimension is the container height instead of the width.
///
/// The rectangle slice must be non-empty and every rectangle must have
/// positive width and height, otherwise the search cannot terminate.
pub fn binary_search_pack(rects: &mut [Rect], ratio: f64, reverse: bool) -> PackStats {
    debug_assert!(!rects.is_empty());

    let mut bound: i64 = 1;
    while !rects.iter().all(|rect| rect.packed) {
        bound *= 2;
        trial(rects, bound, ratio, reverse);
    }
    debug!("full pack possible at size {}", bound);

    let mut low: i64 = 0;
    let mut high: i64 = bound;
    let mut optimal: i64 = 0;

    while low <= high {
        let mid = (low + high) / 2;
        trial(rects, mid, ratio, reverse);

        if rects.iter().all(|rect| rect.packed) {
            optimal = mid;
            high = mid - 1;
        } else {
            low = mid + 1;
        }
    }

    trial(rects, optimal, ratio, reverse);
    let stats = pack_stats(rects);

    info!(
        "packed {} rectangles into {} x {} ({:.1}% efficient)",
        rects.len(),
        stats.width,
        stats.height,
        stats.efficiency * 100.0
    );

    stats
}

fn trial(rects: &mut [Rect], size: i64, ratio: f64, reverse: bool) {
    let searched = size as f64;
    let derived = searched * ratio;

    debug!("packing trial at size {}", size);

    if reverse {
        pack_rects(rects, derived, searched);
    } else {
        pack_rects(rects, searched, derived);
    }
}
