//! MaskStag Selection Engine
//!
//! Pixel-accurate selection masks and contour extraction implemented in
//! Rust with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Pipeline
//! A selection starts as a dense bit-packed mask (`BitMask`), grown from
//! an image either by tolerance flood fill from a seed point or by a
//! global color threshold (`selection::magic_wand`). The mask converts to
//! vector outlines by boundary tracing (`selection::contour`), which
//! internally rasterizes each traced polygon back into scanlines
//! (`raster`) to erase the island it came from.
//!
//! ## Image Format
//! Images are RGBA arrays of shape `(height, width, 4)` with 8 bits per
//! channel. Masks cross the FFI boundary in the 0/255 alpha-mask
//! convention; inside the engine they are bit-packed.
//!
//! ## Concurrency
//! The engine is synchronous. The only parallelism is the row-parallel
//! global threshold scan; flood fill and contour tracing carry state
//! across iterations and run sequentially.

pub mod color;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod raster;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::SelectionError;
    use crate::geometry::{PointI, RectangleD};
    use crate::mask::BitMask;
    use crate::raster::get_scans;
    use crate::selection::contour::{create_polygon_set, polygons_to_flat};
    use crate::selection::magic_wand::{
        fill_stencil_by_color, fill_stencil_from_point, magic_wand_select,
    };

    fn to_py_err(e: SelectionError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }

    fn bounds_tuple(bounds: RectangleD) -> (f64, f64, f64, f64) {
        (bounds.x, bounds.y, bounds.width, bounds.height)
    }

    /// Magic wand selection: flood fill from a seed point plus outline
    /// tracing.
    ///
    /// # Arguments
    /// * `image` - RGBA image, shape (height, width, 4)
    /// * `x`, `y` - Seed point
    /// * `tolerance` - Color tolerance (0 = exact match)
    /// * `limit` - Optional (height, width) alpha mask; growth stays
    ///   inside its nonzero pixels
    ///
    /// # Returns
    /// `(mask, bounds, polygons)`: the selection as a (height, width)
    /// 0/255 mask, its bounding box `(left, top, width, height)`, and the
    /// outline polygons flattened to `[n, len_1, x, y, ..., len_2, ...]`.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, tolerance, limit=None))]
    pub fn magic_wand<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x: i32,
        y: i32,
        tolerance: i32,
        limit: Option<PyReadonlyArray2<'py, u8>>,
    ) -> PyResult<(
        Bound<'py, PyArray2<u8>>,
        (f64, f64, f64, f64),
        Bound<'py, PyArray1<i32>>,
    )> {
        let limit_mask = limit.map(|l| BitMask::from_alpha_mask(l.as_array()));
        let selection = magic_wand_select(
            image.as_array(),
            PointI::new(x, y),
            tolerance,
            limit_mask.as_ref(),
        )
        .map_err(to_py_err)?;

        Ok((
            selection.mask.to_alpha_mask().into_pyarray(py),
            bounds_tuple(selection.bounds),
            polygons_to_flat(&selection.polygons).into_pyarray(py),
        ))
    }

    /// Global color selection: every pixel within tolerance of the
    /// reference color, regardless of connectivity.
    ///
    /// # Returns
    /// `(mask, bounds)` as for `magic_wand`.
    #[pyfunction]
    #[pyo3(signature = (image, r, g, b, a, tolerance, limit=None))]
    #[allow(clippy::too_many_arguments)]
    pub fn select_by_color<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        tolerance: i32,
        limit: Option<PyReadonlyArray2<'py, u8>>,
    ) -> PyResult<(Bound<'py, PyArray2<u8>>, (f64, f64, f64, f64))> {
        let input = image.as_array();
        let (height, width, _) = input.dim();
        let mut stencil = BitMask::new(width as i32, height as i32).map_err(to_py_err)?;
        let limit_mask = limit.map(|l| BitMask::from_alpha_mask(l.as_array()));

        let bounds = fill_stencil_by_color(
            input,
            &mut stencil,
            [r, g, b, a],
            tolerance,
            limit_mask.as_ref(),
        )
        .map_err(to_py_err)?;

        Ok((stencil.to_alpha_mask().into_pyarray(py), bounds_tuple(bounds)))
    }

    /// Flood fill only: the selection mask and bounds without tracing.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, tolerance, limit=None))]
    pub fn flood_fill_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x: i32,
        y: i32,
        tolerance: i32,
        limit: Option<PyReadonlyArray2<'py, u8>>,
    ) -> PyResult<(Bound<'py, PyArray2<u8>>, (f64, f64, f64, f64))> {
        let input = image.as_array();
        let (height, width, _) = input.dim();
        let mut stencil = BitMask::new(width as i32, height as i32).map_err(to_py_err)?;
        let limit_mask = limit.map(|l| BitMask::from_alpha_mask(l.as_array()));

        let bounds = fill_stencil_from_point(
            input,
            &mut stencil,
            PointI::new(x, y),
            tolerance,
            limit_mask.as_ref(),
        )
        .map_err(to_py_err)?;

        Ok((stencil.to_alpha_mask().into_pyarray(py), bounds_tuple(bounds)))
    }

    /// Trace the outline polygons of a 0/255 alpha mask.
    ///
    /// # Arguments
    /// * `mask` - (height, width) alpha mask
    /// * `translate_x`, `translate_y` - Offset added to every vertex
    ///
    /// # Returns
    /// Polygons flattened to `[n, len_1, x, y, ..., len_2, ...]`.
    #[pyfunction]
    #[pyo3(signature = (mask, translate_x=0, translate_y=0))]
    pub fn mask_to_polygons<'py>(
        py: Python<'py>,
        mask: PyReadonlyArray2<'py, u8>,
        translate_x: i32,
        translate_y: i32,
    ) -> Bound<'py, PyArray1<i32>> {
        let mut stencil = BitMask::from_alpha_mask(mask.as_array());
        let bounds = RectangleD::new(0.0, 0.0, stencil.width() as f64, stencil.height() as f64);
        let polygons =
            create_polygon_set(&mut stencil, bounds, PointI::new(translate_x, translate_y));
        polygons_to_flat(&polygons).into_pyarray(py)
    }

    /// Rasterize a closed polygon into scanlines (even-odd fill).
    ///
    /// # Arguments
    /// * `points` - (N, 2) array of integer vertices
    ///
    /// # Returns
    /// (M, 3) array of `(x, y, length)` scanline rows.
    #[pyfunction]
    pub fn polygon_scans<'py>(
        py: Python<'py>,
        points: PyReadonlyArray2<'py, i32>,
    ) -> PyResult<Bound<'py, PyArray2<i32>>> {
        let input = points.as_array();
        if input.dim().1 != 2 {
            return Err(PyValueError::new_err("points must have shape (N, 2)"));
        }

        let polygon: Vec<PointI> = input
            .rows()
            .into_iter()
            .map(|row| PointI::new(row[0], row[1]))
            .collect();
        let scans = get_scans(&polygon);

        let mut result = ndarray::Array2::<i32>::zeros((scans.len(), 3));
        for (i, scan) in scans.iter().enumerate() {
            result[[i, 0]] = scan.x();
            result[[i, 1]] = scan.y();
            result[[i, 2]] = scan.length();
        }
        Ok(result.into_pyarray(py))
    }

    /// MaskStag selection engine module
    #[pymodule]
    pub fn maskstag_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(magic_wand, m)?)?;
        m.add_function(wrap_pyfunction!(select_by_color, m)?)?;
        m.add_function(wrap_pyfunction!(flood_fill_mask, m)?)?;
        m.add_function(wrap_pyfunction!(mask_to_polygons, m)?)?;
        m.add_function(wrap_pyfunction!(polygon_scans, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::maskstag_rust;
