//! Sequency-ordered fast Walsh-Hadamard transform.
//!
//! The transform decomposes a window of `N = 2^p` samples onto the Walsh
//! functions (rectangular ±1 waveforms) ordered by sequency, the number of
//! sign changes across the window. Coefficient 0 is the DC (all-ones)
//! component; coefficient `N - 1` alternates sign on every sample.
//!
//! # Algorithm
//!
//! 1. Copy the input through the [bit-reversal permutation](crate::permutation),
//!    widening each element to `f64`.
//! 2. Run `p` in-place butterfly stages. Stage `s` splits the window into
//!    `2^s` blocks of `N >> s` elements and pairs element `i` with
//!    `i + (N >> (s + 1))` inside each block. Even blocks write
//!    `(a + b, a - b)`, odd blocks write `(a - b, a + b)`. The alternation is
//!    what turns Hadamard order into sequency order.
//! 3. Optionally divide by `N`, then narrow to the caller's sample type.
//!
//! The unnormalized form `W` satisfies `W·W = N·I`, so the same butterfly
//! network serves as the inverse when the forward pass is normalized:
//! `inverse(forward_normalized(x)) == x`. Energy obeys
//! `Σ x² = N · Σ c²` for normalized coefficients `c`.
//!
//! Cost is `O(N log N)` additions with `O(N)` scratch; there are no
//! multiplies apart from the optional normalization.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::permutation::Permutation;
use crate::sample::Sample;

/// Run the sequency butterfly stages in place.
///
/// `data` must already be in bit-reversed order and hold exactly
/// `2^power` elements. With `power == 0` nothing happens.
pub(crate) fn butterfly_stages(data: &mut [f64], power: u32) {
    debug_assert_eq!(data.len(), 1usize << power);

    let n = data.len();
    let mut block_len = n;
    let mut blocks = 1;
    let mut half = n >> 1;

    for _ in 0..power {
        for block in 0..blocks {
            let start = block * block_len;
            let odd = block % 2 == 1;
            for i in start..start + half {
                let j = i + half;
                let a = data[i];
                let b = data[j];
                if odd {
                    data[i] = a - b;
                    data[j] = a + b;
                } else {
                    data[i] = a + b;
                    data[j] = a - b;
                }
            }
        }
        block_len >>= 1;
        blocks <<= 1;
        half >>= 1;
    }
}

/// Reusable transform for one window exponent.
///
/// Holds the cached permutation and an `f64` work buffer so repeated calls at
/// the same exponent perform no allocation. Changing the exponent with
/// [`set_power`](Self::set_power) rebuilds both.
///
/// # Example
///
/// ```rust
/// use walsh_core::SequencyTransform;
///
/// let mut fwht = SequencyTransform::new(2);
/// let mut coeffs = [0.0f64; 4];
/// fwht.forward_normalized(&[0.0f32, 1.0, 2.0, 3.0], &mut coeffs);
/// assert_eq!(coeffs, [1.5, -1.0, 0.0, -0.5]);
///
/// let mut restored = [0.0f32; 4];
/// fwht.inverse(&coeffs, &mut restored);
/// assert_eq!(restored, [0.0, 1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct SequencyTransform {
    permutation: Permutation,
    work: Vec<f64>,
}

impl SequencyTransform {
    /// Create a transform for windows of `2^power` samples.
    pub fn new(power: u32) -> Self {
        Self {
            permutation: Permutation::new(power),
            work: vec![0.0; 1usize << power],
        }
    }

    /// Current window exponent.
    pub fn power(&self) -> u32 {
        self.permutation.power()
    }

    /// Current window length (`2^power`).
    pub fn len(&self) -> usize {
        self.work.len()
    }

    /// Always false; the smallest window holds one sample.
    pub fn is_empty(&self) -> bool {
        self.work.is_empty()
    }

    /// Switch to a new window exponent. Returns `true` if anything changed.
    pub fn set_power(&mut self, power: u32) -> bool {
        if !self.permutation.set_power(power) {
            return false;
        }
        self.work.clear();
        self.work.resize(1usize << power, 0.0);
        true
    }

    /// Unnormalized sequency-ordered transform.
    ///
    /// This is the "inverse" form: applying it to normalized coefficients
    /// reconstructs the signal.
    ///
    /// # Panics
    ///
    /// Panics if either slice is not exactly [`len`](Self::len) long.
    pub fn forward<A: Sample, B: Sample>(&mut self, input: &[A], output: &mut [B]) {
        self.run(input);
        self.emit(output, 1.0);
    }

    /// Sequency-ordered transform scaled by `1 / N`.
    ///
    /// # Panics
    ///
    /// Panics if either slice is not exactly [`len`](Self::len) long.
    pub fn forward_normalized<A: Sample, B: Sample>(&mut self, input: &[A], output: &mut [B]) {
        self.run(input);
        let scale = 1.0 / self.work.len() as f64;
        self.emit(output, scale);
    }

    /// Reconstruct samples from normalized coefficients.
    ///
    /// # Panics
    ///
    /// Panics if either slice is not exactly [`len`](Self::len) long.
    pub fn inverse<A: Sample, B: Sample>(&mut self, coefficients: &[A], output: &mut [B]) {
        self.forward(coefficients, output);
    }

    fn run<A: Sample>(&mut self, input: &[A]) {
        assert_eq!(
            input.len(),
            self.work.len(),
            "window must hold exactly 2^{} samples",
            self.power()
        );
        for (dst, &src) in self.work.iter_mut().zip(self.permutation.indices()) {
            *dst = input[src].to_f64();
        }
        butterfly_stages(&mut self.work, self.permutation.power());
    }

    fn emit<B: Sample>(&self, output: &mut [B], scale: f64) {
        assert_eq!(output.len(), self.work.len(), "output length mismatch");
        if scale == 1.0 {
            for (dst, &src) in output.iter_mut().zip(&self.work) {
                *dst = B::from_f64(src);
            }
        } else {
            for (dst, &src) in output.iter_mut().zip(&self.work) {
                *dst = B::from_f64(src * scale);
            }
        }
    }
}

/// Unnormalized sequency-ordered transform of one window.
///
/// Builds the permutation fresh on every call; use [`SequencyTransform`]
/// on the audio thread.
///
/// # Panics
///
/// Panics if `input.len() != 2^power`.
pub fn transform<A: Sample, B: Sample>(input: &[A], power: u32) -> Vec<B> {
    let mut fwht = SequencyTransform::new(power);
    let mut output = vec![B::ZERO; fwht.len()];
    fwht.forward(input, &mut output);
    output
}

/// Sequency-ordered transform scaled by `1 / N`.
///
/// # Panics
///
/// Panics if `input.len() != 2^power`.
pub fn transform_normalized<A: Sample, B: Sample>(input: &[A], power: u32) -> Vec<B> {
    let mut fwht = SequencyTransform::new(power);
    let mut output = vec![B::ZERO; fwht.len()];
    fwht.forward_normalized(input, &mut output);
    output
}

/// Reconstruct a window from normalized coefficients.
///
/// # Panics
///
/// Panics if `coefficients.len() != 2^power`.
pub fn inverse_transform<A: Sample, B: Sample>(coefficients: &[A], power: u32) -> Vec<B> {
    transform(coefficients, power)
}

/// Divide unnormalized coefficients by their count in place.
pub fn normalize(coefficients: &mut [f64]) {
    if coefficients.is_empty() {
        return;
    }
    let scale = 1.0 / coefficients.len() as f64;
    for c in coefficients.iter_mut() {
        *c *= scale;
    }
}
