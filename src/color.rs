//! Color tolerance comparison for region growing.
//!
//! Both region-grower entry points (flood fill and global threshold) must
//! agree on what "similar color" means, so the comparison lives here as a
//! single shared function.

/// Check whether `candidate` is within `tolerance` of `reference`.
///
/// Pixels are RGBA byte quadruples. The metric sums the squared
/// per-channel differences, with the color channels weighted by the
/// reference pixel's alpha: fully transparent reference pixels compare
/// equal on color regardless of their RGB values, and only the alpha
/// difference separates them from other pixels.
///
/// A `tolerance` of 0 accepts exact matches only.
#[inline]
pub fn colors_within_tolerance(reference: [u8; 4], candidate: [u8; 4], tolerance: i32) -> bool {
    let alpha = reference[3] as i32;

    let diff_r = reference[0] as i32 - candidate[0] as i32;
    let diff_g = reference[1] as i32 - candidate[1] as i32;
    let diff_b = reference[2] as i32 - candidate[2] as i32;
    let diff_a = alpha - candidate[3] as i32;

    let sum = (1 + diff_r * diff_r) * alpha / 256
        + (1 + diff_g * diff_g) * alpha / 256
        + (1 + diff_b * diff_b) * alpha / 256
        + diff_a * diff_a;

    sum <= tolerance * tolerance * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_at_zero_tolerance() {
        let c = [120, 30, 200, 255];
        assert!(colors_within_tolerance(c, c, 0));
    }

    #[test]
    fn test_single_step_rejected_at_zero_tolerance() {
        let a = [120, 30, 200, 255];
        let b = [121, 30, 200, 255];
        assert!(!colors_within_tolerance(a, b, 0));
    }

    #[test]
    fn test_close_colors_within_tolerance() {
        let a = [100, 100, 100, 255];
        let b = [110, 95, 105, 255];
        assert!(colors_within_tolerance(a, b, 16));
        assert!(!colors_within_tolerance(a, b, 2));
    }

    #[test]
    fn test_transparent_reference_ignores_color() {
        let a = [0, 0, 0, 0];
        let b = [255, 128, 7, 0];
        assert!(colors_within_tolerance(a, b, 0));
    }

    #[test]
    fn test_transparent_reference_rejects_opaque() {
        let a = [0, 0, 0, 0];
        let b = [0, 0, 0, 255];
        assert!(!colors_within_tolerance(a, b, 0));
    }
}
