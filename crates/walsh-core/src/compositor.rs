//! Resynthesis and dry/wet blending.
//!
//! The compositor inverts shaped coefficients back to samples ("wet") and
//! crossfades them with the untouched window ("dry"), narrowing to the
//! host's sample type only at the very end.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::sample::Sample;
use crate::transform::SequencyTransform;

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix` but uses one fewer multiply:
/// `dry + (wet - dry) * mix`.
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet
#[inline]
pub fn wet_dry_mix(dry: f64, wet: f64, mix: f64) -> f64 {
    dry + (wet - dry) * mix
}

/// Inverse transform plus dry/wet blend for one window.
///
/// # Example
///
/// ```rust
/// use walsh_core::{Compositor, SequencyTransform};
///
/// let mut fwht = SequencyTransform::new(1);
/// let mut compositor = Compositor::new(2);
/// // Coefficients for [1.0, 0.0]
/// compositor.resynthesize(&mut fwht, &[0.5, 0.5]);
///
/// let mut out = [0.0f32; 2];
/// compositor.mix_into(&[0.0, 1.0], 0, 0.5, &mut out);
/// assert_eq!(out, [0.5, 0.5]);
/// ```
#[derive(Debug, Clone)]
pub struct Compositor {
    wet: Vec<f64>,
}

impl Compositor {
    /// Create a compositor for windows of `window_len` samples.
    pub fn new(window_len: usize) -> Self {
        Self {
            wet: vec![0.0; window_len],
        }
    }

    /// Resize the wet buffer for a new window length and clear it.
    pub fn resize(&mut self, window_len: usize) {
        self.wet.clear();
        self.wet.resize(window_len, 0.0);
    }

    /// The most recent resynthesized window.
    pub fn wet(&self) -> &[f64] {
        &self.wet
    }

    /// Invert shaped coefficients into the wet buffer.
    ///
    /// # Panics
    ///
    /// Panics if `coefficients` or the wet buffer do not match the
    /// transform's window length.
    pub fn resynthesize(&mut self, transform: &mut SequencyTransform, coefficients: &[f64]) {
        transform.inverse(coefficients, &mut self.wet);
    }

    /// Blend `output.len()` samples starting at window position `offset`.
    ///
    /// `dry` is the whole window the coefficients were computed from. `mix`
    /// is clamped to `[0, 1]`; NaN counts as fully wet.
    pub fn mix_into<S: Sample>(&self, dry: &[f64], offset: usize, mix: f64, output: &mut [S]) {
        let end = offset + output.len();
        debug_assert!(end <= self.wet.len() && end <= dry.len());

        let mix = if mix.is_nan() {
            1.0
        } else {
            mix.clamp(0.0, 1.0)
        };
        for ((out, &d), &w) in output
            .iter_mut()
            .zip(&dry[offset..end])
            .zip(&self.wet[offset..end])
        {
            *out = S::from_f64(wet_dry_mix(d, w, mix));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform_normalized;

    #[test]
    fn mix_endpoints() {
        assert_eq!(wet_dry_mix(0.2, 0.8, 0.0), 0.2);
        assert_eq!(wet_dry_mix(0.2, 0.8, 1.0), 0.8);
        assert!((wet_dry_mix(0.2, 0.8, 0.5) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn untouched_coefficients_reconstruct_the_window() {
        let dry = [0.1, -0.4, 0.25, 0.9, -1.0, 0.0, 0.3, 0.5];
        let coeffs: Vec<f64> = transform_normalized(&dry, 3);
        let mut fwht = SequencyTransform::new(3);
        let mut compositor = Compositor::new(8);
        compositor.resynthesize(&mut fwht, &coeffs);

        let mut out = [0.0f64; 8];
        compositor.mix_into(&dry, 0, 1.0, &mut out);
        for (o, d) in out.iter().zip(&dry) {
            assert!((o - d).abs() < 1e-12);
        }
    }

    #[test]
    fn dry_only_ignores_wet() {
        let dry = [0.3, 0.6, 0.9, 1.2];
        let mut fwht = SequencyTransform::new(2);
        let mut compositor = Compositor::new(4);
        compositor.resynthesize(&mut fwht, &[0.0; 4]);

        let mut out = [0.0f32; 4];
        compositor.mix_into(&dry, 0, 0.0, &mut out);
        assert_eq!(out, [0.3, 0.6, 0.9, 1.2]);
    }

    #[test]
    fn tail_offset_selects_window_end() {
        let dry = [1.0, 2.0, 3.0, 4.0];
        let mut fwht = SequencyTransform::new(2);
        let mut compositor = Compositor::new(4);
        compositor.resynthesize(&mut fwht, &[0.0; 4]);

        let mut out = [9.0f64; 2];
        compositor.mix_into(&dry, 2, 0.0, &mut out);
        assert_eq!(out, [3.0, 4.0]);
    }

    #[test]
    fn mix_is_clamped() {
        let dry = [1.0];
        let mut fwht = SequencyTransform::new(0);
        let mut compositor = Compositor::new(1);
        compositor.resynthesize(&mut fwht, &[3.0]);

        let mut out = [0.0f64];
        compositor.mix_into(&dry, 0, 7.0, &mut out);
        assert_eq!(out, [3.0]);
    }

    #[test]
    fn nan_mix_is_fully_wet() {
        let dry = [1.0, -1.0];
        let mut fwht = SequencyTransform::new(1);
        let mut compositor = Compositor::new(2);
        compositor.resynthesize(&mut fwht, &[0.25, 0.0]);

        let mut out = [0.0f32; 2];
        compositor.mix_into(&dry, 0, f64::NAN, &mut out);
        assert_eq!(out, [0.25, 0.25]);
    }
}
