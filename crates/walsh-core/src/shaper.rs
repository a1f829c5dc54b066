//! Coefficient shaping between the forward and inverse transforms.
//!
//! Three stages run in order on one window of normalized coefficients:
//!
//! 1. **Band mask**: zero every coefficient whose sequency index falls
//!    outside `[low, high]`, where a frequency maps to an index as
//!    `index = hz * 2 * N / sample_rate`. Bounds are inclusive.
//! 2. **Magnitude-rank threshold**: zero the `floor(amount' * (N - 1))`
//!    smallest-magnitude coefficients, `amount' = amount^(1 / curve)`.
//!    Ties are broken by original index (lower index is removed first).
//! 3. **Normalization**: divide by `(1 - blend) + Σ|c| * blend`. A silent
//!    window (`Σ|c| == 0`) uses a divisor of 1.
//!
//! Coefficients keep their sequency slot and sign throughout; the rank
//! stage only ever writes zeros.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use libm::{fabs, floor, pow};

/// Smallest accepted amount curve.
pub const MIN_AMOUNT_CURVE: f64 = 0.1;

/// Largest accepted amount curve.
pub const MAX_AMOUNT_CURVE: f64 = 10.0;

/// A coefficient paired with the sequency slot it came from.
///
/// Sorting a window by magnitude reorders these records; `index` is how a
/// surviving or removed coefficient finds its way back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCoefficient {
    /// Sequency index in the original window.
    pub index: usize,
    /// Signed coefficient value.
    pub value: f64,
}

impl RankedCoefficient {
    /// Absolute value used for ranking.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        fabs(self.value)
    }

    /// Total order: ascending magnitude, then ascending index.
    #[inline]
    pub fn rank_cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.magnitude()
            .total_cmp(&other.magnitude())
            .then(self.index.cmp(&other.index))
    }
}

/// Frequency-like band limits for the index mask, in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLimits {
    /// Lowest retained frequency.
    pub low_hz: f64,
    /// Highest retained frequency.
    pub high_hz: f64,
}

impl BandLimits {
    /// Create band limits.
    pub fn new(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }

    /// Index cutoffs `(low, high)` for a window length and sample rate.
    ///
    /// Cutoffs stay fractional; an index is retained when
    /// `low <= index <= high`.
    pub fn cutoffs(&self, window_len: usize, sample_rate: f64) -> (f64, f64) {
        (
            index_for_frequency(self.low_hz, window_len, sample_rate),
            index_for_frequency(self.high_hz, window_len, sample_rate),
        )
    }
}

/// Map a frequency to a (fractional) sequency index.
///
/// `index = hz * 2 * window_len / sample_rate`. Nyquist maps to `window_len`.
#[inline]
pub fn index_for_frequency(hz: f64, window_len: usize, sample_rate: f64) -> f64 {
    hz * 2.0 * window_len as f64 / sample_rate
}

/// Settings for one window of shaping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSettings {
    /// Rank-threshold strength in `[0, 1]`: 0 keeps everything, 1 keeps
    /// only the largest coefficient.
    pub amount: f64,
    /// Root applied to `amount` before computing the cutoff rank.
    /// Clamped to [`MIN_AMOUNT_CURVE`]..=[`MAX_AMOUNT_CURVE`].
    pub amount_curve: f64,
    /// Optional band mask.
    pub band: Option<BandLimits>,
    /// Normalization blend in `[0, 1]`.
    pub normalize: f64,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            amount: 0.0,
            amount_curve: 1.0,
            band: None,
            normalize: 0.0,
        }
    }
}

impl ShapeSettings {
    /// Settings that leave every coefficient untouched.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Number of coefficients the rank threshold removes from a window.
    pub fn removal_count(&self, window_len: usize) -> usize {
        if window_len <= 1 {
            return 0;
        }
        let amount = self.amount.clamp(0.0, 1.0);
        let curve = self.amount_curve.clamp(MIN_AMOUNT_CURVE, MAX_AMOUNT_CURVE);
        let shaped = if curve == 1.0 {
            amount
        } else {
            pow(amount, 1.0 / curve)
        };
        let last = window_len - 1;
        (floor(shaped * last as f64) as usize).min(last)
    }
}

/// Zero every coefficient outside the inclusive index range `[low, high]`.
pub fn apply_band_mask(coefficients: &mut [f64], low: f64, high: f64) {
    for (index, c) in coefficients.iter_mut().enumerate() {
        let position = index as f64;
        if position < low || position > high {
            *c = 0.0;
        }
    }
}

/// Divide by `(1 - blend) + Σ|c| * blend` and return the divisor used.
///
/// A zero or non-finite sum falls back to a divisor of 1.
pub fn normalize_energy(coefficients: &mut [f64], blend: f64) -> f64 {
    let blend = blend.clamp(0.0, 1.0);
    if blend == 0.0 {
        return 1.0;
    }
    let sum: f64 = coefficients.iter().map(|c| fabs(*c)).sum();
    if sum <= 0.0 || !sum.is_finite() {
        return 1.0;
    }
    let divisor = (1.0 - blend) + sum * blend;
    if divisor <= 0.0 || !divisor.is_finite() {
        return 1.0;
    }
    let scale = 1.0 / divisor;
    for c in coefficients.iter_mut() {
        *c *= scale;
    }
    divisor
}

/// Applies band mask, rank threshold and normalization to coefficient windows.
///
/// Owns the ranking scratch so shaping performs no allocation once
/// [`reserve`](Self::reserve) has seen the largest window.
///
/// # Example
///
/// ```rust
/// use walsh_core::{CoefficientShaper, ShapeSettings};
///
/// let mut shaper = CoefficientShaper::new();
/// let mut coeffs = [0.5, -3.0, 0.25, 2.0];
/// let settings = ShapeSettings { amount: 1.0, ..ShapeSettings::default() };
/// shaper.shape(&mut coeffs, &settings, 48000.0);
/// assert_eq!(coeffs, [0.0, -3.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoefficientShaper {
    ranked: Vec<RankedCoefficient>,
}

impl CoefficientShaper {
    /// Create a shaper with no reserved scratch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shaper able to rank windows of up to `window_len` without
    /// allocating.
    pub fn with_capacity(window_len: usize) -> Self {
        Self {
            ranked: Vec::with_capacity(window_len),
        }
    }

    /// Grow the ranking scratch to hold `window_len` records.
    pub fn reserve(&mut self, window_len: usize) {
        if self.ranked.capacity() < window_len {
            self.ranked.reserve(window_len - self.ranked.len());
        }
    }

    /// Shape one window in place.
    pub fn shape(&mut self, coefficients: &mut [f64], settings: &ShapeSettings, sample_rate: f64) {
        if let Some(band) = settings.band {
            let (low, high) = band.cutoffs(coefficients.len(), sample_rate);
            apply_band_mask(coefficients, low, high);
        }

        let remove = settings.removal_count(coefficients.len());
        self.remove_smallest(coefficients, remove);

        normalize_energy(coefficients, settings.normalize);
    }

    /// Zero the `count` smallest-magnitude coefficients.
    pub fn remove_smallest(&mut self, coefficients: &mut [f64], count: usize) {
        if count == 0 {
            return;
        }
        if count >= coefficients.len() {
            coefficients.fill(0.0);
            return;
        }

        self.ranked.clear();
        self.ranked.extend(
            coefficients
                .iter()
                .enumerate()
                .map(|(index, &value)| RankedCoefficient { index, value }),
        );
        // Keys are unique (index tiebreak) so the unstable sort is deterministic.
        self.ranked.sort_unstable_by(RankedCoefficient::rank_cmp);

        for ranked in &self.ranked[..count] {
            coefficients[ranked.index] = 0.0;
        }
    }

    /// Ranked view of the last window passed to
    /// [`remove_smallest`](Self::remove_smallest), smallest first.
    pub fn last_ranking(&self) -> &[RankedCoefficient] {
        &self.ranked
    }
}
