//! Boundary tracing: mask islands to closed outline polygons.
//!
//! Walks the edge of each 4-connected foreground island in a mask and
//! records its outline as a closed integer polygon, erasing each island
//! as it is traced so every island is visited exactly once.

use crate::geometry::{PointI, RectangleD};
use crate::mask::BitMask;
use crate::raster::get_scans;

/// Whether `p` is a set foreground pixel, treating anything outside
/// `bounds` or outside the mask as unset.
#[inline]
fn is_set(stencil: &BitMask, bounds: &RectangleD, p: PointI) -> bool {
    bounds.contains_point(p.x as f64, p.y as f64)
        && stencil.contains(p.x, p.y)
        && stencil.get_unchecked(p.x, p.y)
}

/// Trace every foreground island inside `bounds` into a closed polygon.
///
/// Islands are discovered by a row-major scan of `bounds` and reported in
/// that order. Each polygon holds vertices only at direction changes and
/// is translated by `translate` (mask-local to caller coordinates).
///
/// Tracing erases each island from the stencil by rasterizing the traced
/// outline and XOR-ing its scanlines back onto the mask; the XOR flips
/// the fully-set interior to clear, which also guarantees termination.
/// Pass a disposable clone when the mask must survive.
pub fn create_polygon_set(
    stencil: &mut BitMask,
    bounds: RectangleD,
    translate: PointI,
) -> Vec<Vec<PointI>> {
    if stencil.is_empty() {
        return Vec::new();
    }

    let mut polygons: Vec<Vec<PointI>> = Vec::new();

    let x_first = bounds.x as i32;
    let x_end = (bounds.x + bounds.width) as i32;
    let y_end = (bounds.y + bounds.height) as i32;

    let mut start = PointI::new(x_first, bounds.y as i32);
    let mut points: Vec<PointI> = Vec::new();

    // find all islands
    loop {
        let mut start_found = false;

        while start.y < y_end {
            if is_set(stencil, &bounds, start) {
                start_found = true;
                break;
            }

            start.x += 1;
            if start.x >= x_end {
                start.x = x_first;
                start.y += 1;
            }
        }

        if !start_found {
            break;
        }

        points.clear();

        let mut last = PointI::new(start.x, start.y + 1);
        let mut curr = start;

        // trace island outline
        loop {
            let diff_x = curr.x - last.x;
            let diff_y = curr.y - last.y;

            let left = PointI::new(
                curr.x - 1 + (diff_x + diff_y + 2) / 2,
                curr.y - 1 + (diff_y - diff_x + 2) / 2,
            );
            let right = PointI::new(
                curr.x - 1 + (diff_x - diff_y + 2) / 2,
                curr.y - 1 + (diff_y + diff_x + 2) / 2,
            );

            let (step_x, step_y) = if is_set(stencil, &bounds, left) {
                // go around the inner corner
                (diff_y, -diff_x)
            } else if is_set(stencil, &bounds, right) {
                // go straight
                (diff_x, diff_y)
            } else {
                // dead end, turn right
                (-diff_y, diff_x)
            };

            let next = PointI::new(curr.x + step_x, curr.y + step_y);

            // a vertex is only recorded where the direction changes
            if (next.x - curr.x).signum() != diff_x.signum()
                || (next.y - curr.y).signum() != diff_y.signum()
            {
                points.push(curr);
            }

            last = curr;
            curr = next;

            if next == start {
                break;
            }
        }

        // Erase the traced island so it is not found again. The region
        // inside the outline is entirely set, so XOR flips it to clear.
        for scan in get_scans(&points) {
            stencil.invert_scanline(scan);
        }

        polygons.push(points.iter().map(|&p| p + translate).collect());
    }

    polygons
}

/// Flatten a polygon set to an i32 array for FFI.
///
/// Format: `[num_polygons, len_1, x, y, x, y, ..., len_2, ...]`.
pub fn polygons_to_flat(polygons: &[Vec<PointI>]) -> Vec<i32> {
    let mut result = Vec::with_capacity(
        1 + polygons.iter().map(|p| 1 + 2 * p.len()).sum::<usize>(),
    );
    result.push(polygons.len() as i32);

    for polygon in polygons {
        result.push(polygon.len() as i32);
        for point in polygon {
            result.push(point.x);
            result.push(point.y);
        }
    }

    result
}
