//! Horizontal pixel run descriptor.

use crate::error::SelectionError;

/// A contiguous horizontal run of pixels: `[x, x + length)` on row `y`.
///
/// Scanlines are the currency exchanged between polygon rasterization and
/// mask mutation. They are immutable values; two scanlines are equal iff
/// all three fields match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scanline {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) length: i32,
}

impl Scanline {
    /// Create a scanline covering `[x, x + length)` on row `y`.
    ///
    /// Fails with `InvalidScanline` when `length` is negative.
    pub fn new(x: i32, y: i32, length: i32) -> Result<Self, SelectionError> {
        if length < 0 {
            return Err(SelectionError::InvalidScanline { length });
        }
        Ok(Self { x, y, length })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn length(&self) -> i32 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_initialize_correctly() {
        for (x, y, length) in [(1, 2, 3), (3, 1, 2), (2, 3, 1), (0, 0, 0)] {
            let scanline = Scanline::new(x, y, length).unwrap();
            assert_eq!(scanline.x(), x);
            assert_eq!(scanline.y(), y);
            assert_eq!(scanline.length(), length);
        }
    }

    #[test]
    fn test_negative_length_rejected() {
        assert_eq!(
            Scanline::new(0, 0, -1),
            Err(SelectionError::InvalidScanline { length: -1 })
        );
        assert_eq!(
            Scanline::new(5, 5, i32::MIN),
            Err(SelectionError::InvalidScanline { length: i32::MIN })
        );
    }

    #[test]
    fn test_equality_requires_all_fields() {
        let base = Scanline::new(1, 1, 1).unwrap();
        assert_eq!(base, Scanline::new(1, 1, 1).unwrap());
        assert_ne!(base, Scanline::new(2, 1, 1).unwrap());
        assert_ne!(base, Scanline::new(1, 2, 1).unwrap());
        assert_ne!(base, Scanline::new(1, 1, 2).unwrap());
    }
}
