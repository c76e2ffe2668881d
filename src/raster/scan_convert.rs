//! Polygon scan conversion using an active edge table.
//!
//! Converts an ordered polygon into the set of scanlines covering its
//! interior under the even-odd fill rule. Edge positions are tracked in
//! 24.8 fixed point so slope accumulation stays exact across many rows.

use crate::geometry::PointI;
use crate::mask::Scanline;
use crate::raster::fixed::Fixed24_8;

/// One non-horizontal polygon side, oriented top-to-bottom.
struct Edge {
    min_y: i32,
    max_y: i32,
    x: Fixed24_8,
    dxdy: Fixed24_8,
}

/// Rasterize a closed polygon into scanlines (even-odd fill).
///
/// Scanlines are emitted in ascending `y`, and left to right within a
/// row. Fill is strictly between consecutive edge crossings: each pair of
/// active edges `(el, er)` covers `[ceil(el.x), floor(er.x))`.
///
/// A polygon with fewer than two non-horizontal sides yields no
/// scanlines. Self-intersecting polygons produce even-odd results.
pub fn get_scans(points: &[PointI]) -> Vec<Scanline> {
    let mut edges: Vec<Edge> = Vec::with_capacity(points.len());

    for i in 0..points.len() {
        let mut top = points[i];
        let mut bottom = points[(i + 1) % points.len()];

        if top.y > bottom.y {
            std::mem::swap(&mut top, &mut bottom);
        }

        let dy = bottom.y - top.y;
        if dy != 0 {
            edges.push(Edge {
                min_y: top.y,
                max_y: bottom.y,
                x: Fixed24_8::from_int(top.x),
                dxdy: Fixed24_8::slope(bottom.x - top.x, dy),
            });
        }
    }

    if edges.len() < 2 {
        return Vec::new();
    }

    edges.sort_by_key(|e| e.min_y);
    let y_min = edges[0].min_y;
    let y_max = edges.iter().fold(i32::MIN, |acc, e| acc.max(e.max_y));

    // First pass: count crossings per row so the output allocates once.
    let mut scan_count = 0;
    for y in y_min..y_max {
        let crossing = edges.iter().filter(|e| e.min_y <= y && e.max_y > y).count();
        scan_count += crossing / 2;
    }

    let mut scans: Vec<Scanline> = Vec::with_capacity(scan_count);
    let mut active: Vec<usize> = Vec::with_capacity(edges.len());
    let mut next = 0;
    let mut y = y_min;

    while y <= y_max {
        // Activate edges starting on this row.
        while next < edges.len() && edges[next].min_y == y {
            active.push(next);
            next += 1;
        }

        active.sort_by_key(|&i| edges[i].x);

        // Fill between pairs of crossings; a dangling unpaired edge from
        // non-simple input is ignored.
        for pair in active.chunks(2) {
            if let &[l, r] = pair {
                let start_x = edges[l].x.ceil();
                let end_x = edges[r].x.floor();
                if end_x > start_x {
                    scans.push(Scanline {
                        x: start_x,
                        y,
                        length: end_x - start_x,
                    });
                }
            }
        }

        y += 1;

        active.retain(|&i| edges[i].max_y > y);
        for &i in &active {
            let step = edges[i].dxdy;
            edges[i].x += step;
        }
    }

    scans
}
