//! Error types for mask and selection operations.

use thiserror::Error;

/// Errors raised by mask construction and bit access.
///
/// Bulk rectangle/scanline operations never produce these: spans that
/// fall partly outside a mask are clipped, since they routinely come
/// from polygons that extend past the image edge.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    /// A mask was constructed with a negative width or height.
    #[error("mask dimensions must be non-negative, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// A single-bit accessor was called with coordinates outside the mask.
    #[error("coordinates ({x}, {y}) are outside the {width}x{height} mask")]
    OutOfRange {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// A scanline was constructed with a negative length.
    #[error("scanline length must be non-negative, got {length}")]
    InvalidScanline { length: i32 },

    /// A pixel buffer or limit mask does not match the stencil it was
    /// passed alongside.
    #[error("buffer of {actual_width}x{actual_height} does not match the {width}x{height} stencil")]
    SizeMismatch {
        width: i32,
        height: i32,
        actual_width: i32,
        actual_height: i32,
    },
}
