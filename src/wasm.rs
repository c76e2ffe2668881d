//! WebAssembly exports for the selection engine.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images and
//! masks travel as flat arrays: RGBA images are `width * height * 4`
//! bytes, masks are `width * height` bytes in the 0/255 convention, and
//! polygon sets use the flat integer format
//! `[n, len_1, x, y, ..., len_2, ...]`.

use ndarray::{Array2, Array3};
use wasm_bindgen::prelude::*;

use crate::geometry::{PointI, RectangleD};
use crate::mask::BitMask;
use crate::raster::get_scans;
use crate::selection::contour::{create_polygon_set, polygons_to_flat};
use crate::selection::magic_wand::{
    fill_stencil_by_color, fill_stencil_from_point, magic_wand_select,
};

fn image_from_flat(data: &[u8], width: usize, height: usize) -> Array3<u8> {
    Array3::from_shape_vec((height, width, 4), data.to_vec()).expect("Invalid dimensions")
}

fn limit_from_flat(limit: &[u8], width: usize, height: usize) -> Option<BitMask> {
    if limit.is_empty() {
        return None;
    }
    let alpha =
        Array2::from_shape_vec((height, width), limit.to_vec()).expect("Invalid dimensions");
    Some(BitMask::from_alpha_mask(alpha.view()))
}

fn mask_to_flat(mask: &BitMask) -> Vec<u8> {
    mask.to_alpha_mask().into_raw_vec_and_offset().0
}

/// Magic wand selection mask via flood fill from a seed point.
///
/// # Arguments
/// * `data` - Flat RGBA bytes (length = width * height * 4)
/// * `width`, `height` - Image size in pixels
/// * `x`, `y` - Seed point
/// * `tolerance` - Color tolerance (0 = exact match)
/// * `limit` - Flat 0/255 limit mask, or empty for no limit
///
/// # Returns
/// Flat 0/255 selection mask (length = width * height)
#[wasm_bindgen]
pub fn magic_wand_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    tolerance: i32,
    limit: &[u8],
) -> Vec<u8> {
    let image = image_from_flat(data, width, height);
    let limit_mask = limit_from_flat(limit, width, height);
    let mut stencil = BitMask::new(width as i32, height as i32).expect("Invalid dimensions");

    fill_stencil_from_point(
        image.view(),
        &mut stencil,
        PointI::new(x, y),
        tolerance,
        limit_mask.as_ref(),
    )
    .expect("Selection failed");

    mask_to_flat(&stencil)
}

/// Magic wand outline polygons via flood fill plus boundary tracing.
///
/// # Returns
/// Flat polygon set `[n, len_1, x, y, ..., len_2, ...]`
#[wasm_bindgen]
pub fn magic_wand_polygons_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    tolerance: i32,
) -> Vec<i32> {
    let image = image_from_flat(data, width, height);
    let selection = magic_wand_select(image.view(), PointI::new(x, y), tolerance, None)
        .expect("Selection failed");
    polygons_to_flat(&selection.polygons)
}

/// Global color selection mask: all pixels within tolerance of the
/// reference color.
///
/// # Returns
/// Flat 0/255 selection mask (length = width * height)
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn select_by_color_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    r: u8,
    g: u8,
    b: u8,
    a: u8,
    tolerance: i32,
    limit: &[u8],
) -> Vec<u8> {
    let image = image_from_flat(data, width, height);
    let limit_mask = limit_from_flat(limit, width, height);
    let mut stencil = BitMask::new(width as i32, height as i32).expect("Invalid dimensions");

    fill_stencil_by_color(
        image.view(),
        &mut stencil,
        [r, g, b, a],
        tolerance,
        limit_mask.as_ref(),
    )
    .expect("Selection failed");

    mask_to_flat(&stencil)
}

/// Trace the outline polygons of a flat 0/255 mask.
///
/// # Arguments
/// * `mask` - Flat mask bytes (length = width * height)
/// * `translate_x`, `translate_y` - Offset added to every vertex
///
/// # Returns
/// Flat polygon set `[n, len_1, x, y, ..., len_2, ...]`
#[wasm_bindgen]
pub fn mask_to_polygons_wasm(
    mask: &[u8],
    width: usize,
    height: usize,
    translate_x: i32,
    translate_y: i32,
) -> Vec<i32> {
    let alpha =
        Array2::from_shape_vec((height, width), mask.to_vec()).expect("Invalid dimensions");
    let mut stencil = BitMask::from_alpha_mask(alpha.view());
    let bounds = RectangleD::new(0.0, 0.0, width as f64, height as f64);
    let polygons = create_polygon_set(&mut stencil, bounds, PointI::new(translate_x, translate_y));
    polygons_to_flat(&polygons)
}

/// Rasterize a closed polygon into scanlines (even-odd fill).
///
/// # Arguments
/// * `points` - Flat vertex pairs `[x, y, x, y, ...]`
///
/// # Returns
/// Flat scanline triples `[x, y, length, x, y, length, ...]`
#[wasm_bindgen]
pub fn polygon_scans_wasm(points: &[i32]) -> Vec<i32> {
    let polygon: Vec<PointI> = points
        .chunks_exact(2)
        .map(|pair| PointI::new(pair[0], pair[1]))
        .collect();

    let mut result = Vec::new();
    for scan in get_scans(&polygon) {
        result.push(scan.x());
        result.push(scan.y());
        result.push(scan.length());
    }
    result
}
