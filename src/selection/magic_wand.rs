//! Magic wand region growing.
//!
//! Two entry points share one tolerance metric: a scanline flood fill
//! from a seed point (contiguous selection) and a global per-pixel
//! threshold against a reference color (non-contiguous selection). Both
//! write into a caller-owned `BitMask` and report the bounding box of the
//! matched pixels.
//!
//! Images are RGBA arrays of shape `(height, width, 4)`. An optional
//! limit mask restricts growth to its set bits (the current selection);
//! pixels outside it never enter the result.

use std::collections::VecDeque;

use ndarray::ArrayView3;
use rayon::prelude::*;

use crate::color::colors_within_tolerance;
use crate::error::SelectionError;
use crate::geometry::{PointI, RectangleD};
use crate::mask::BitMask;
use crate::selection::contour::create_polygon_set;

/// A computed magic-wand selection: the filled mask, its bounding box,
/// and the traced outline polygons.
pub struct WandSelection {
    pub mask: BitMask,
    pub bounds: RectangleD,
    pub polygons: Vec<Vec<PointI>>,
}

#[inline]
fn pixel(image: &ArrayView3<u8>, x: i32, y: i32) -> [u8; 4] {
    let (x, y) = (x as usize, y as usize);
    [
        image[[y, x, 0]],
        image[[y, x, 1]],
        image[[y, x, 2]],
        image[[y, x, 3]],
    ]
}

/// Validate that the image (and limit mask, if any) match the stencil.
fn image_size(
    image: &ArrayView3<u8>,
    stencil: &BitMask,
    limit: Option<&BitMask>,
) -> Result<(i32, i32), SelectionError> {
    let (height, width, channels) = image.dim();
    let mismatch = |actual_width: i32, actual_height: i32| SelectionError::SizeMismatch {
        width: stencil.width(),
        height: stencil.height(),
        actual_width,
        actual_height,
    };

    if channels != 4 || width as i32 != stencil.width() || height as i32 != stencil.height() {
        return Err(mismatch(width as i32, height as i32));
    }
    if let Some(limit) = limit {
        if limit.width() != stencil.width() || limit.height() != stencil.height() {
            return Err(mismatch(limit.width(), limit.height()));
        }
    }
    Ok((width as i32, height as i32))
}

/// Mark (or unmark) every stencil bit outside the limit mask.
///
/// Pre-seeding the complement of the limit as visited keeps the fill from
/// crossing into it; clearing the same bits afterwards removes the
/// blocking without touching legitimately filled bits.
fn block_outside(stencil: &mut BitMask, limit: &BitMask, blocked: bool) {
    for y in 0..stencil.height() {
        for x in 0..stencil.width() {
            if !limit.get_unchecked(x, y) {
                stencil.set_unchecked(x, y, blocked);
            }
        }
    }
}

/// Enqueue one seed per contiguous unvisited within-tolerance run of row
/// `y` between `left` and `right` inclusive.
fn enqueue_runs(
    image: &ArrayView3<u8>,
    stencil: &BitMask,
    cmp: [u8; 4],
    tolerance: i32,
    y: i32,
    left: i32,
    right: i32,
    queue: &mut VecDeque<PointI>,
) {
    let mut run_left = left;
    let mut run_right = left;

    for x in left..=right {
        if !stencil.get_unchecked(x, y)
            && colors_within_tolerance(cmp, pixel(image, x, y), tolerance)
        {
            run_right += 1;
        } else {
            if run_right - run_left > 0 {
                queue.push_back(PointI::new(run_left, y));
            }
            run_right += 1;
            run_left = run_right;
        }
    }

    if run_right - run_left > 0 {
        queue.push_back(PointI::new(run_left, y));
    }
}

/// Tolerance flood fill from a seed point (scanline algorithm).
///
/// The reference color is the pixel at `start`. The stencil is cleared,
/// then every pixel 4-connected to the seed through within-tolerance
/// pixels is set. Each dequeued seed expands to a full horizontal run,
/// and only one representative point per contiguous run in the adjacent
/// rows is enqueued, bounding queue growth by the number of runs.
///
/// Returns the inclusive bounding box of the filled pixels, or
/// `RectangleD::ZERO` when the seed lies outside the limit mask. Fails
/// with `OutOfRange` when the seed is outside the image and
/// `SizeMismatch` when buffer shapes disagree.
pub fn fill_stencil_from_point(
    image: ArrayView3<u8>,
    stencil: &mut BitMask,
    start: PointI,
    tolerance: i32,
    limit: Option<&BitMask>,
) -> Result<RectangleD, SelectionError> {
    let (width, height) = image_size(&image, stencil, limit)?;

    if !stencil.contains(start.x, start.y) {
        return Err(SelectionError::OutOfRange {
            x: start.x,
            y: start.y,
            width,
            height,
        });
    }

    let cmp = pixel(&image, start.x, start.y);

    stencil.clear(false);
    if let Some(limit) = limit {
        block_outside(stencil, limit, true);

        if stencil.get_unchecked(start.x, start.y) {
            block_outside(stencil, limit, false);
            return Ok(RectangleD::ZERO);
        }
    }

    let mut top = i32::MAX;
    let mut bottom = i32::MIN;
    let mut left = i32::MAX;
    let mut right = i32::MIN;

    let mut queue: VecDeque<PointI> = VecDeque::with_capacity(16);
    queue.push_back(start);

    while let Some(pt) = queue.pop_front() {
        let mut local_left = pt.x - 1;
        let mut local_right = pt.x;

        while local_left >= 0
            && !stencil.get_unchecked(local_left, pt.y)
            && colors_within_tolerance(cmp, pixel(&image, local_left, pt.y), tolerance)
        {
            stencil.set_unchecked(local_left, pt.y, true);
            local_left -= 1;
        }

        while local_right < width
            && !stencil.get_unchecked(local_right, pt.y)
            && colors_within_tolerance(cmp, pixel(&image, local_right, pt.y), tolerance)
        {
            stencil.set_unchecked(local_right, pt.y, true);
            local_right += 1;
        }

        local_left += 1;
        local_right -= 1;

        if pt.y > 0 {
            enqueue_runs(
                &image, stencil, cmp, tolerance, pt.y - 1, local_left, local_right, &mut queue,
            );
        }
        if pt.y < height - 1 {
            enqueue_runs(
                &image, stencil, cmp, tolerance, pt.y + 1, local_left, local_right, &mut queue,
            );
        }

        left = left.min(local_left);
        right = right.max(local_right);
        top = top.min(pt.y);
        bottom = bottom.max(pt.y);
    }

    if let Some(limit) = limit {
        block_outside(stencil, limit, false);
    }

    Ok(RectangleD::new(
        left as f64,
        top as f64,
        (right - left + 1) as f64,
        (bottom - top + 1) as f64,
    ))
}

/// Global tolerance threshold against a reference color.
///
/// Every pixel within `tolerance` of `cmp` (and inside the limit mask,
/// if any) is set, independently of connectivity. Rows are scanned in
/// parallel; each row task only reads shared data and returns its
/// matched runs, which are then written into the packed mask on one
/// thread because neighboring rows share storage words.
///
/// Returns the inclusive bounding box of the matched pixels, or
/// `RectangleD::ZERO` when nothing matched.
pub fn fill_stencil_by_color(
    image: ArrayView3<u8>,
    stencil: &mut BitMask,
    cmp: [u8; 4],
    tolerance: i32,
    limit: Option<&BitMask>,
) -> Result<RectangleD, SelectionError> {
    let (width, height) = image_size(&image, stencil, limit)?;

    stencil.clear(false);

    let rows: Vec<Vec<(i32, i32)>> = (0..height)
        .into_par_iter()
        .map(|y| {
            let mut runs = Vec::new();
            let mut run_start = None;
            for x in 0..width {
                let allowed = limit.map_or(true, |l| l.get_unchecked(x, y));
                let matched =
                    allowed && colors_within_tolerance(cmp, pixel(&image, x, y), tolerance);
                match (matched, run_start) {
                    (true, None) => run_start = Some(x),
                    (false, Some(start)) => {
                        runs.push((start, x));
                        run_start = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = run_start {
                runs.push((start, width));
            }
            runs
        })
        .collect();

    let mut top = i32::MAX;
    let mut bottom = i32::MIN;
    let mut left = i32::MAX;
    let mut right = i32::MIN;

    for (y, runs) in rows.iter().enumerate() {
        let y = y as i32;
        for &(x0, x1) in runs {
            for x in x0..x1 {
                stencil.set_unchecked(x, y, true);
            }
            left = left.min(x0);
            right = right.max(x1 - 1);
        }
        if !runs.is_empty() {
            top = top.min(y);
            bottom = bottom.max(y);
        }
    }

    if left > right {
        return Ok(RectangleD::ZERO);
    }

    Ok(RectangleD::new(
        left as f64,
        top as f64,
        (right - left + 1) as f64,
        (bottom - top + 1) as f64,
    ))
}

/// Full magic-wand flow: flood fill from `start`, then trace the filled
/// region's outlines.
///
/// The returned mask survives intact; tracing consumes a scratch clone.
pub fn magic_wand_select(
    image: ArrayView3<u8>,
    start: PointI,
    tolerance: i32,
    limit: Option<&BitMask>,
) -> Result<WandSelection, SelectionError> {
    let (height, width, _) = image.dim();
    let mut mask = BitMask::new(width as i32, height as i32)?;

    let bounds = fill_stencil_from_point(image, &mut mask, start, tolerance, limit)?;

    let mut scratch = mask.clone();
    let polygons = create_polygon_set(&mut scratch, bounds, PointI::new(0, 0));

    Ok(WandSelection {
        mask,
        bounds,
        polygons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectangleI;
    use ndarray::Array3;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn solid_image(width: usize, height: usize, color: [u8; 4]) -> Array3<u8> {
        let mut image = Array3::<u8>::zeros((height, width, 4));
        for y in 0..height {
            for x in 0..width {
                for c in 0..4 {
                    image[[y, x, c]] = color[c];
                }
            }
        }
        image
    }

    fn put(image: &mut Array3<u8>, x: usize, y: usize, color: [u8; 4]) {
        for c in 0..4 {
            image[[y, x, c]] = color[c];
        }
    }

    fn count_set(mask: &BitMask) -> usize {
        let mut n = 0;
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.get(x, y).unwrap() {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_flood_fills_uniform_image() {
        let image = solid_image(5, 5, RED);
        let mut stencil = BitMask::new(5, 5).unwrap();
        let bounds =
            fill_stencil_from_point(image.view(), &mut stencil, PointI::new(2, 2), 0, None)
                .unwrap();
        assert_eq!(count_set(&stencil), 25);
        assert_eq!(bounds, RectangleD::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn test_flood_respects_color_boundary() {
        // left half red, right half blue
        let mut image = solid_image(4, 4, RED);
        for y in 0..4 {
            for x in 2..4 {
                put(&mut image, x, y, BLUE);
            }
        }
        let mut stencil = BitMask::new(4, 4).unwrap();
        let bounds =
            fill_stencil_from_point(image.view(), &mut stencil, PointI::new(0, 0), 0, None)
                .unwrap();
        assert_eq!(count_set(&stencil), 8);
        assert_eq!(bounds, RectangleD::new(0.0, 0.0, 2.0, 4.0));
        assert!(!stencil.get(2, 0).unwrap());
    }

    #[test]
    fn test_flood_never_escapes_enclosing_ring() {
        // blue interior enclosed by a red ring, more blue outside the ring
        let mut image = solid_image(7, 7, BLUE);
        for i in 1..6 {
            put(&mut image, i, 1, RED);
            put(&mut image, i, 5, RED);
            put(&mut image, 1, i, RED);
            put(&mut image, 5, i, RED);
        }
        let mut stencil = BitMask::new(7, 7).unwrap();
        fill_stencil_from_point(image.view(), &mut stencil, PointI::new(3, 3), 0, None).unwrap();
        assert_eq!(count_set(&stencil), 9);
        for x in 0..7 {
            assert!(!stencil.get(x, 0).unwrap());
            assert!(!stencil.get(x, 6).unwrap());
        }
    }

    #[test]
    fn test_flood_matches_global_on_uniform_image() {
        let image = solid_image(6, 4, BLUE);
        let mut flood = BitMask::new(6, 4).unwrap();
        let mut global = BitMask::new(6, 4).unwrap();
        let flood_bounds =
            fill_stencil_from_point(image.view(), &mut flood, PointI::new(5, 3), 0, None).unwrap();
        let global_bounds =
            fill_stencil_by_color(image.view(), &mut global, BLUE, 0, None).unwrap();
        assert_eq!(flood, global);
        assert_eq!(flood_bounds, global_bounds);
        assert_eq!(count_set(&flood), 24);
    }

    #[test]
    fn test_global_selects_disconnected_regions() {
        let mut image = solid_image(5, 5, CLEAR);
        put(&mut image, 0, 0, RED);
        put(&mut image, 4, 4, RED);
        let mut stencil = BitMask::new(5, 5).unwrap();
        let bounds = fill_stencil_by_color(image.view(), &mut stencil, RED, 0, None).unwrap();
        assert_eq!(count_set(&stencil), 2);
        assert!(stencil.get(0, 0).unwrap());
        assert!(stencil.get(4, 4).unwrap());
        assert_eq!(bounds, RectangleD::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn test_global_with_no_match_reports_zero_bounds() {
        let image = solid_image(3, 3, CLEAR);
        let mut stencil = BitMask::new(3, 3).unwrap();
        let bounds = fill_stencil_by_color(image.view(), &mut stencil, RED, 0, None).unwrap();
        assert!(stencil.is_empty());
        assert_eq!(bounds, RectangleD::ZERO);
    }

    #[test]
    fn test_tolerance_widens_the_match() {
        let mut image = solid_image(3, 1, [100, 0, 0, 255]);
        put(&mut image, 1, 0, [104, 0, 0, 255]);
        put(&mut image, 2, 0, [180, 0, 0, 255]);
        let mut stencil = BitMask::new(3, 1).unwrap();

        fill_stencil_from_point(image.view(), &mut stencil, PointI::new(0, 0), 0, None).unwrap();
        assert_eq!(count_set(&stencil), 1);

        fill_stencil_from_point(image.view(), &mut stencil, PointI::new(0, 0), 4, None).unwrap();
        assert_eq!(count_set(&stencil), 2);
    }

    #[test]
    fn test_limit_mask_blocks_growth() {
        let image = solid_image(4, 4, RED);
        let mut limit = BitMask::new(4, 4).unwrap();
        limit.set_rect(RectangleI::new(0, 0, 2, 4), true);

        let mut stencil = BitMask::new(4, 4).unwrap();
        let bounds = fill_stencil_from_point(
            image.view(),
            &mut stencil,
            PointI::new(0, 0),
            0,
            Some(&limit),
        )
        .unwrap();

        assert_eq!(count_set(&stencil), 8);
        assert_eq!(bounds, RectangleD::new(0.0, 0.0, 2.0, 4.0));
        // blocking must not leak into the result
        for y in 0..4 {
            assert!(!stencil.get(2, y).unwrap());
            assert!(!stencil.get(3, y).unwrap());
        }
    }

    #[test]
    fn test_limit_mask_applies_to_global_variant() {
        let image = solid_image(4, 2, RED);
        let mut limit = BitMask::new(4, 2).unwrap();
        limit.set(1, 0, true).unwrap();
        limit.set(2, 1, true).unwrap();

        let mut stencil = BitMask::new(4, 2).unwrap();
        let bounds =
            fill_stencil_by_color(image.view(), &mut stencil, RED, 0, Some(&limit)).unwrap();
        assert_eq!(count_set(&stencil), 2);
        assert!(stencil.get(1, 0).unwrap());
        assert!(stencil.get(2, 1).unwrap());
        assert_eq!(bounds, RectangleD::new(1.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn test_seed_outside_limit_yields_empty_selection() {
        let image = solid_image(4, 4, RED);
        let mut limit = BitMask::new(4, 4).unwrap();
        limit.set(0, 0, true).unwrap();

        let mut stencil = BitMask::new(4, 4).unwrap();
        let bounds = fill_stencil_from_point(
            image.view(),
            &mut stencil,
            PointI::new(3, 3),
            0,
            Some(&limit),
        )
        .unwrap();
        assert!(stencil.is_empty());
        assert_eq!(bounds, RectangleD::ZERO);
    }

    #[test]
    fn test_seed_outside_image_fails() {
        let image = solid_image(4, 4, RED);
        let mut stencil = BitMask::new(4, 4).unwrap();
        let result =
            fill_stencil_from_point(image.view(), &mut stencil, PointI::new(4, 0), 0, None);
        assert!(matches!(result, Err(SelectionError::OutOfRange { .. })));
    }

    #[test]
    fn test_mismatched_stencil_fails() {
        let image = solid_image(4, 4, RED);
        let mut stencil = BitMask::new(3, 4).unwrap();
        let result =
            fill_stencil_from_point(image.view(), &mut stencil, PointI::new(0, 0), 0, None);
        assert!(matches!(result, Err(SelectionError::SizeMismatch { .. })));
    }

    #[test]
    fn test_magic_wand_end_to_end() {
        // 16x16 transparent image with a solid 4x4 blue square at (2, 2)
        let mut image = solid_image(16, 16, CLEAR);
        for y in 2..6 {
            for x in 2..6 {
                put(&mut image, x, y, BLUE);
            }
        }

        let selection = magic_wand_select(image.view(), PointI::new(3, 3), 0, None).unwrap();

        assert_eq!(count_set(&selection.mask), 16);
        assert_eq!(selection.bounds, RectangleD::new(2.0, 2.0, 4.0, 4.0));
        assert_eq!(selection.polygons.len(), 1);
        assert_eq!(
            selection.polygons[0],
            vec![
                PointI::new(2, 2),
                PointI::new(6, 2),
                PointI::new(6, 6),
                PointI::new(2, 6),
            ]
        );
        // the returned mask survives tracing
        assert!(selection.mask.get(3, 3).unwrap());
    }
}
