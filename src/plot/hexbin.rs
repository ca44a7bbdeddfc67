//! Hexagonal binning of 2-D points.

use itertools::Itertools;
use std::collections::BTreeMap;

// ----------------------------------------------------------------------------
// Hex Bin
// ----------------------------------------------------------------------------

/// One hexagonal bin, centered in data coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct HexBin {
    pub x: f64,
    pub y: f64,
    pub count: usize,
    /// Horizontal half-width of the hexagon.
    rx: f64,
    /// Vertical circumradius of the hexagon.
    ry: f64,
}

impl HexBin {
    /// Vertices of the pointy-top hexagon, clockwise from the top.
    pub fn vertices(&self) -> Vec<(f64, f64)> {
        vec![
            (self.x, self.y + self.ry),
            (self.x + self.rx, self.y + self.ry / 2.0),
            (self.x + self.rx, self.y - self.ry / 2.0),
            (self.x, self.y - self.ry),
            (self.x - self.rx, self.y - self.ry / 2.0),
            (self.x - self.rx, self.y + self.ry / 2.0),
        ]
    }
}

// ----------------------------------------------------------------------------
// Binning
// ----------------------------------------------------------------------------

/// Bin points into a pointy-top hexagonal lattice with `columns` columns
/// across the x range.
///
/// Two interleaved rectangular lattices approximate the hexagonal grid: each
/// point is assigned to the nearer of its two candidate centers. Only
/// occupied bins are returned.
pub fn bin(
    points: &[(f64, f64)],
    columns: usize,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Vec<HexBin> {
    if points.is_empty() {
        return Vec::new();
    }

    let columns = columns.max(1);
    let (x0, x1) = x_range;
    let (y0, y1) = y_range;
    let sx = columns as f64 / (x1 - x0).max(f64::EPSILON);
    let rows = (columns as f64 / 3f64.sqrt()).floor().max(1.0);
    let sy = rows / (y1 - y0).max(f64::EPSILON);

    // (ix, iy, on the half-offset lattice) -> count
    let mut counts: BTreeMap<(i64, i64, bool), usize> = BTreeMap::new();
    for (x, y) in points {
        let px = (x - x0) * sx;
        let py = (y - y0) * sy;
        // candidate center on the integer lattice
        let ix1 = px.round();
        let iy1 = py.round();
        // candidate center on the half-offset lattice
        let ix2 = px.floor();
        let iy2 = py.floor();
        // squared distances, y weighted for the hexagon aspect
        let d1 = (px - ix1).powi(2) + 3.0 * (py - iy1).powi(2);
        let d2 = (px - ix2 - 0.5).powi(2) + 3.0 * (py - iy2 - 0.5).powi(2);
        let key = match d1 <= d2 {
            true => (ix1 as i64, iy1 as i64, false),
            false => (ix2 as i64, iy2 as i64, true),
        };
        *counts.entry(key).or_default() += 1;
    }

    let rx = 0.5 / sx;
    let ry = 1.0 / (3.0 * sy);
    counts
        .into_iter()
        .map(|((ix, iy, offset), count)| {
            let (cx, cy) = match offset {
                false => (ix as f64 / sx + x0, iy as f64 / sy + y0),
                true => ((ix as f64 + 0.5) / sx + x0, (iy as f64 + 0.5) / sy + y0),
            };
            HexBin { x: cx, y: cy, count, rx, ry }
        })
        .collect_vec()
}
