//! Window sizing and per-channel streaming state.
//!
//! The transform needs fixed power-of-two windows; hosts call with whatever
//! block size they like. Two regimes reconcile the two:
//!
//! - **Block ≥ window**: the block is cut into window-sized strides and each
//!   stride is processed on its own. Nothing is carried between calls except
//!   the most recent `window` inputs, kept for a trailing partial stride.
//! - **Block < window**: a [`ChannelBuffer`] acts as a shift register of
//!   exactly `window` samples. Each call shifts out the oldest `block`
//!   samples, appends the new block, processes the whole register and emits
//!   only its last `block` outputs. Every emitted sample was computed from a
//!   window ending on that sample (causal, no look-ahead).
//!
//! The host is told `max(window - block, 0)` samples of latency: that many
//! initial outputs come from windows still partly filled with the register's
//! initial zeros.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::sample::Sample;

/// Smallest window exponent (2^0 = 1 sample).
pub const MIN_WINDOW_POWER: u32 = 0;

/// Largest window exponent (2^14 = 16384 samples).
pub const MAX_WINDOW_POWER: u32 = 14;

/// Largest window length in samples.
pub const MAX_WINDOW_LEN: usize = 1 << MAX_WINDOW_POWER;

/// A clamped power-of-two analysis window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowSize {
    power: u32,
}

impl WindowSize {
    /// Window of `2^power` samples; the exponent is clamped to
    /// [`MIN_WINDOW_POWER`]..=[`MAX_WINDOW_POWER`].
    pub fn from_power(power: u32) -> Self {
        Self {
            power: power.clamp(MIN_WINDOW_POWER, MAX_WINDOW_POWER),
        }
    }

    /// Map a normalized control in `[0, 1]` to the nearest exponent.
    ///
    /// Out-of-range and NaN controls clamp to the nearest end.
    ///
    /// ```rust
    /// use walsh_core::WindowSize;
    ///
    /// assert_eq!(WindowSize::from_normalized(0.0).len(), 1);
    /// assert_eq!(WindowSize::from_normalized(0.5).len(), 128);
    /// assert_eq!(WindowSize::from_normalized(1.0).len(), 16384);
    /// assert_eq!(WindowSize::from_normalized(7.0).len(), 16384);
    /// ```
    pub fn from_normalized(value: f32) -> Self {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        let span = (MAX_WINDOW_POWER - MIN_WINDOW_POWER) as f32;
        let power = (value * span + MIN_WINDOW_POWER as f32 + 0.5) as u32;
        Self::from_power(power)
    }

    /// Normalized control value that maps back to this exponent.
    pub fn to_normalized(self) -> f32 {
        (self.power - MIN_WINDOW_POWER) as f32 / (MAX_WINDOW_POWER - MIN_WINDOW_POWER) as f32
    }

    /// Window exponent.
    pub fn power(self) -> u32 {
        self.power
    }

    /// Window length in samples.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> usize {
        1usize << self.power
    }

    /// Latency reported to the host for a given host block size.
    pub fn latency_for_block(self, block_size: usize) -> usize {
        self.len().saturating_sub(block_size)
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::from_power(7)
    }
}

/// Per-channel shift register holding the most recent `window` inputs.
///
/// Starts (and resets to) all zeros. Its length always equals the window
/// length it was built or last resized for; a resize discards the contents
/// rather than resampling a partially filled window.
#[derive(Debug, Clone)]
pub struct ChannelBuffer {
    samples: Vec<f64>,
}

impl ChannelBuffer {
    /// Zero-filled register of `window_len` samples.
    pub fn new(window_len: usize) -> Self {
        Self {
            samples: vec![0.0; window_len],
        }
    }

    /// Register length (the window length).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Current contents, oldest first.
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Zero the contents, keeping the length.
    pub fn reset(&mut self) {
        self.samples.fill(0.0);
    }

    /// Change the window length and zero the contents.
    pub fn resize(&mut self, window_len: usize) {
        self.samples.clear();
        self.samples.resize(window_len, 0.0);
    }

    /// Shift out the oldest `block.len()` samples and append `block`.
    ///
    /// # Panics
    ///
    /// Debug builds panic if the block is longer than the register.
    pub fn push_block<S: Sample>(&mut self, block: &[S]) {
        let len = self.samples.len();
        debug_assert!(block.len() <= len, "block longer than window");
        let keep = len - block.len();
        self.samples.copy_within(block.len().., 0);
        for (dst, &src) in self.samples[keep..].iter_mut().zip(block) {
            *dst = src.to_f64();
        }
    }

    /// Replace the contents with the last `len()` samples of `history`.
    ///
    /// Used after the large-block regime so a later short block continues
    /// from the right history. Shorter histories are pushed instead.
    pub fn load_history<S: Sample>(&mut self, history: &[S]) {
        let len = self.samples.len();
        if history.len() < len {
            self.push_block(history);
            return;
        }
        let tail = &history[history.len() - len..];
        for (dst, &src) in self.samples.iter_mut().zip(tail) {
            *dst = src.to_f64();
        }
    }
}
