//! Sample precision abstraction.
//!
//! Hosts hand the engine either single- or double-precision buffers. Rather
//! than duplicating the transform and shaping code per precision, every
//! boundary function is generic over [`Sample`]. Internally the engine always
//! accumulates in `f64`; conversion happens exactly once per element on the
//! way in and once on the way out.

/// A scalar audio sample type the engine can read from and write to.
///
/// Implemented for `f32` and `f64`.
///
/// # Example
///
/// ```rust
/// use walsh_core::Sample;
///
/// let x: f32 = Sample::from_f64(0.25);
/// assert_eq!(x.to_f64(), 0.25);
/// ```
pub trait Sample: Copy + Default + PartialEq + core::fmt::Debug + Send + Sync + 'static {
    /// Silence.
    const ZERO: Self;

    /// Widen to the engine's working precision.
    fn to_f64(self) -> f64;

    /// Narrow from the engine's working precision.
    fn from_f64(value: f64) -> Self;
}

impl Sample for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}
