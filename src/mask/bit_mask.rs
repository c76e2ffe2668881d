//! Dense bit-packed 2D boolean grid.

use ndarray::{Array2, ArrayView2};

use crate::error::SelectionError;
use crate::geometry::{PointI, RectangleI};
use crate::mask::scanline::Scanline;

const BITS_PER_WORD: usize = 32;

/// A row-major bit-packed boolean grid with fixed dimensions.
///
/// Single-bit accessors are bounds-checked and fail with `OutOfRange`.
/// Bulk rectangle and scanline operations clip to the mask instead, since
/// they model "paint a region" and routinely touch the image edge.
///
/// A mask is not safe for concurrent mutation; each growth or trace
/// operation should own its mask for the duration of the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitMask {
    width: i32,
    height: i32,
    words: Vec<u32>,
}

impl BitMask {
    /// Create a mask with all bits clear.
    ///
    /// Fails with `InvalidDimensions` when either dimension is negative.
    pub fn new(width: i32, height: i32) -> Result<Self, SelectionError> {
        if width < 0 || height < 0 {
            return Err(SelectionError::InvalidDimensions { width, height });
        }
        let bits = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            words: vec![0; bits.div_ceil(BITS_PER_WORD)],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// True iff no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn get(&self, x: i32, y: i32) -> Result<bool, SelectionError> {
        let index = self.checked_index(x, y)?;
        Ok(self.words[index / BITS_PER_WORD] & bit(index) != 0)
    }

    pub fn get_point(&self, point: PointI) -> Result<bool, SelectionError> {
        self.get(point.x, point.y)
    }

    pub fn set(&mut self, x: i32, y: i32, value: bool) -> Result<(), SelectionError> {
        let index = self.checked_index(x, y)?;
        self.write_bit(index, value);
        Ok(())
    }

    /// Flip a single bit.
    pub fn invert(&mut self, x: i32, y: i32) -> Result<(), SelectionError> {
        let index = self.checked_index(x, y)?;
        self.words[index / BITS_PER_WORD] ^= bit(index);
        Ok(())
    }

    /// Set every bit inside `rect`, clipped to the mask bounds.
    pub fn set_rect(&mut self, rect: RectangleI, value: bool) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.x.saturating_add(rect.width).min(self.width);
        let y1 = rect.y.saturating_add(rect.height).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_unchecked(x, y, value);
            }
        }
    }

    /// XOR every bit covered by `scanline`, clipped to the mask bounds.
    ///
    /// Applying the same scanline twice restores the mask.
    pub fn invert_scanline(&mut self, scanline: Scanline) {
        if scanline.y < 0 || scanline.y >= self.height {
            return;
        }
        let x0 = scanline.x.max(0);
        let x1 = scanline.x.saturating_add(scanline.length).min(self.width);
        for x in x0..x1 {
            let index = self.index(x, scanline.y);
            self.words[index / BITS_PER_WORD] ^= bit(index);
        }
    }

    /// Set every bit to `value`.
    pub fn clear(&mut self, value: bool) {
        let fill = if value { u32::MAX } else { 0 };
        self.words.fill(fill);
        if value {
            self.mask_tail();
        }
    }

    /// Reverse each row in place.
    pub fn flip_horizontal(&mut self) {
        for y in 0..self.height {
            let mut lo = 0;
            let mut hi = self.width - 1;
            while lo < hi {
                let a = self.get_unchecked(lo, y);
                let b = self.get_unchecked(hi, y);
                self.set_unchecked(lo, y, b);
                self.set_unchecked(hi, y, a);
                lo += 1;
                hi -= 1;
            }
        }
    }

    /// Reverse the row order in place.
    pub fn flip_vertical(&mut self) {
        let mut top = 0;
        let mut bottom = self.height - 1;
        while top < bottom {
            for x in 0..self.width {
                let a = self.get_unchecked(x, top);
                let b = self.get_unchecked(x, bottom);
                self.set_unchecked(x, top, b);
                self.set_unchecked(x, bottom, a);
            }
            top += 1;
            bottom -= 1;
        }
    }

    /// Bitwise AND with `other` placed at `offset`.
    ///
    /// Bit `(x, y)` of this mask pairs with bit `(x - offset.x,
    /// y - offset.y)` of `other`; positions with no counterpart in
    /// `other` are treated as false and therefore cleared.
    pub fn and(&mut self, other: &BitMask, offset: PointI) {
        for y in 0..self.height {
            for x in 0..self.width {
                let ox = x - offset.x;
                let oy = y - offset.y;
                let other_bit = other.contains(ox, oy) && other.get_unchecked(ox, oy);
                if !other_bit {
                    self.set_unchecked(x, y, false);
                }
            }
        }
    }

    /// Bitwise OR with `other` placed at `offset`.
    ///
    /// Positions with no counterpart in `other` keep this mask's own bit.
    pub fn or(&mut self, other: &BitMask, offset: PointI) {
        for y in 0..self.height {
            for x in 0..self.width {
                let ox = x - offset.x;
                let oy = y - offset.y;
                if other.contains(ox, oy) && other.get_unchecked(ox, oy) {
                    self.set_unchecked(x, y, true);
                }
            }
        }
    }

    /// Convert to the 0/255 alpha-mask convention used at FFI boundaries.
    pub fn to_alpha_mask(&self) -> Array2<u8> {
        let mut mask = Array2::<u8>::zeros((self.height as usize, self.width as usize));
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get_unchecked(x, y) {
                    mask[[y as usize, x as usize]] = 255;
                }
            }
        }
        mask
    }

    /// Build a mask from a (height, width) alpha mask; any nonzero byte
    /// sets the corresponding bit.
    pub fn from_alpha_mask(alpha: ArrayView2<u8>) -> Self {
        let (height, width) = alpha.dim();
        let mut mask = Self {
            width: width as i32,
            height: height as i32,
            words: vec![0; (width * height).div_ceil(BITS_PER_WORD)],
        };
        for y in 0..height {
            for x in 0..width {
                if alpha[[y, x]] > 0 {
                    mask.set_unchecked(x as i32, y as i32, true);
                }
            }
        }
        mask
    }

    pub(crate) fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub(crate) fn get_unchecked(&self, x: i32, y: i32) -> bool {
        let index = self.index(x, y);
        self.words[index / BITS_PER_WORD] & bit(index) != 0
    }

    pub(crate) fn set_unchecked(&mut self, x: i32, y: i32, value: bool) {
        let index = self.index(x, y);
        self.write_bit(index, value);
    }

    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.contains(x, y));
        y as usize * self.width as usize + x as usize
    }

    fn checked_index(&self, x: i32, y: i32) -> Result<usize, SelectionError> {
        if !self.contains(x, y) {
            return Err(SelectionError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.index(x, y))
    }

    fn write_bit(&mut self, index: usize, value: bool) {
        let word = &mut self.words[index / BITS_PER_WORD];
        if value {
            *word |= bit(index);
        } else {
            *word &= !bit(index);
        }
    }

    // Bits past width*height in the final word must stay zero so that
    // word-level emptiness and equality checks are valid.
    fn mask_tail(&mut self) {
        let bits = self.width as usize * self.height as usize;
        let used = bits % BITS_PER_WORD;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u32 << used) - 1;
            }
        }
    }
}

#[inline]
fn bit(index: usize) -> u32 {
    1u32 << (index % BITS_PER_WORD)
}
