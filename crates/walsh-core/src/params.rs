//! Normalized control set shared between a host setter and the audio thread.
//!
//! Every control is a value in `[0.0, 1.0]` stored as the bit pattern of an
//! `f32` inside an `AtomicU32`. A reader therefore always observes one
//! complete value, never a torn write, without taking a lock. The audio
//! thread reads a [`ParamSnapshot`] once per processing call, so a change
//! made mid-call lands on the next call.
//!
//! | Key | Control | Default | Meaning |
//! |-----|---------|---------|---------|
//! | `window` | [`WalshParam::WindowSize`] | 0.5 | exponent `round(v * 14)`, 2^7 = 128 samples |
//! | `amount` | [`WalshParam::Amount`] | 0.5 | share of coefficients removed by magnitude rank |
//! | `low` | [`WalshParam::LowBand`] | 0.0 | low band edge as a fraction of Nyquist |
//! | `high` | [`WalshParam::HighBand`] | 1.0 | high band edge as a fraction of Nyquist |
//! | `normalize` | [`WalshParam::Normalize`] | 0.0 | energy normalization blend |
//! | `mix` | [`WalshParam::Mix`] | 1.0 | dry/wet, 1.0 = fully processed |

use core::sync::atomic::{AtomicU32, Ordering};

use crate::shaper::{BandLimits, ShapeSettings};
use crate::window::WindowSize;

/// Identifies one control in a [`ParamSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalshParam {
    /// Analysis window size.
    WindowSize,
    /// Magnitude-rank threshold strength.
    Amount,
    /// Low edge of the sequency band mask.
    LowBand,
    /// High edge of the sequency band mask.
    HighBand,
    /// Energy normalization blend.
    Normalize,
    /// Dry/wet blend.
    Mix,
}

impl WalshParam {
    /// All controls in index order.
    pub const ALL: [WalshParam; 6] = [
        WalshParam::WindowSize,
        WalshParam::Amount,
        WalshParam::LowBand,
        WalshParam::HighBand,
        WalshParam::Normalize,
        WalshParam::Mix,
    ];

    /// Number of controls.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable zero-based index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Control at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable machine key used by presets and the command line.
    pub fn key(self) -> &'static str {
        match self {
            WalshParam::WindowSize => "window",
            WalshParam::Amount => "amount",
            WalshParam::LowBand => "low",
            WalshParam::HighBand => "high",
            WalshParam::Normalize => "normalize",
            WalshParam::Mix => "mix",
        }
    }

    /// Control for a machine key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.key() == key)
    }

    /// Normalized default value.
    pub fn default_value(self) -> f32 {
        match self {
            WalshParam::WindowSize | WalshParam::Amount => 0.5,
            WalshParam::LowBand | WalshParam::Normalize => 0.0,
            WalshParam::HighBand | WalshParam::Mix => 1.0,
        }
    }
}

/// Lock-free store for the normalized controls.
///
/// # Example
///
/// ```rust
/// use walsh_core::{ParamSet, WalshParam};
///
/// let params = ParamSet::new();
/// params.set(WalshParam::Mix, 0.25);
/// params.set(WalshParam::Amount, 4.0); // clamped
///
/// let snap = params.snapshot();
/// assert_eq!(snap.mix, 0.25);
/// assert_eq!(snap.amount, 1.0);
/// ```
#[derive(Debug)]
pub struct ParamSet {
    values: [AtomicU32; WalshParam::COUNT],
}

impl Default for ParamSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamSet {
    /// Controls at their defaults.
    pub fn new() -> Self {
        Self {
            values: WalshParam::ALL.map(|p| AtomicU32::new(p.default_value().to_bits())),
        }
    }

    /// Read one control.
    #[inline]
    pub fn get(&self, param: WalshParam) -> f32 {
        f32::from_bits(self.values[param.index()].load(Ordering::Relaxed))
    }

    /// Write one control, clamped to `[0, 1]`. NaN is ignored.
    #[inline]
    pub fn set(&self, param: WalshParam, value: f32) {
        if value.is_nan() {
            return;
        }
        let value = value.clamp(0.0, 1.0);
        self.values[param.index()].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Restore every control to its default.
    pub fn reset_to_defaults(&self) {
        for param in WalshParam::ALL {
            self.set(param, param.default_value());
        }
    }

    /// Copy every control into `other`.
    pub fn copy_to(&self, other: &ParamSet) {
        for param in WalshParam::ALL {
            other.set(param, self.get(param));
        }
    }

    /// Read all controls at once.
    ///
    /// Each field is individually consistent; a concurrent writer may land
    /// between two fields, which only affects the current call.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            window: self.get(WalshParam::WindowSize),
            amount: self.get(WalshParam::Amount),
            low: self.get(WalshParam::LowBand),
            high: self.get(WalshParam::HighBand),
            normalize: self.get(WalshParam::Normalize),
            mix: self.get(WalshParam::Mix),
        }
    }
}

/// Plain copy of the controls for one processing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Window-size control.
    pub window: f32,
    /// Rank-threshold control.
    pub amount: f32,
    /// Low band edge control.
    pub low: f32,
    /// High band edge control.
    pub high: f32,
    /// Normalization blend control.
    pub normalize: f32,
    /// Dry/wet control.
    pub mix: f32,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        ParamSet::new().snapshot()
    }
}

impl ParamSnapshot {
    /// Window size selected by the window control.
    pub fn window_size(&self) -> WindowSize {
        WindowSize::from_normalized(self.window)
    }

    /// Band limits in Hz, or `None` when the band covers `0..=Nyquist`.
    pub fn band_limits(&self, sample_rate: f64) -> Option<BandLimits> {
        if self.low <= 0.0 && self.high >= 1.0 {
            return None;
        }
        let nyquist = sample_rate * 0.5;
        Some(BandLimits::new(
            f64::from(self.low) * nyquist,
            f64::from(self.high) * nyquist,
        ))
    }

    /// Per-call parameters for [`WalshEngine::process_block`](crate::WalshEngine::process_block).
    pub fn blend_params(&self, sample_rate: f64, amount_curve: f64) -> BlendParams {
        BlendParams {
            shape: ShapeSettings {
                amount: f64::from(self.amount),
                amount_curve,
                band: self.band_limits(sample_rate),
                normalize: f64::from(self.normalize),
            },
            mix: f64::from(self.mix),
        }
    }
}

/// Shaping and blend settings for one processing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendParams {
    /// Coefficient shaping.
    pub shape: ShapeSettings,
    /// Dry/wet blend in `[0, 1]`.
    pub mix: f64,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            shape: ShapeSettings::default(),
            mix: 1.0,
        }
    }
}

impl BlendParams {
    /// Fully wet, no shaping: output reproduces input.
    pub fn passthrough() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let snap = ParamSet::new().snapshot();
        assert_eq!(snap.window, 0.5);
        assert_eq!(snap.amount, 0.5);
        assert_eq!(snap.low, 0.0);
        assert_eq!(snap.high, 1.0);
        assert_eq!(snap.normalize, 0.0);
        assert_eq!(snap.mix, 1.0);
        assert_eq!(snap.window_size().len(), 128);
    }

    #[test]
    fn keys_and_indices_round_trip() {
        for (i, param) in WalshParam::ALL.iter().enumerate() {
            assert_eq!(param.index(), i);
            assert_eq!(WalshParam::from_index(i), Some(*param));
            assert_eq!(WalshParam::from_key(param.key()), Some(*param));
        }
        assert_eq!(WalshParam::from_index(WalshParam::COUNT), None);
        assert_eq!(WalshParam::from_key("drive"), None);
    }

    #[test]
    fn set_clamps_and_ignores_nan() {
        let params = ParamSet::new();
        params.set(WalshParam::LowBand, -2.0);
        assert_eq!(params.get(WalshParam::LowBand), 0.0);
        params.set(WalshParam::LowBand, 0.3);
        params.set(WalshParam::LowBand, f32::NAN);
        assert_eq!(params.get(WalshParam::LowBand), 0.3);
    }

    #[test]
    fn full_band_disables_mask() {
        let snap = ParamSnapshot::default();
        assert_eq!(snap.band_limits(48000.0), None);

        let narrowed = ParamSnapshot { high: 0.5, ..snap };
        assert_eq!(
            narrowed.band_limits(48000.0),
            Some(BandLimits::new(0.0, 12000.0))
        );
    }

    #[test]
    fn blend_params_carry_controls() {
        let snap = ParamSnapshot {
            amount: 0.25,
            normalize: 0.5,
            mix: 0.75,
            ..ParamSnapshot::default()
        };
        let blend = snap.blend_params(44100.0, 2.0);
        assert_eq!(blend.shape.amount, 0.25);
        assert_eq!(blend.shape.amount_curve, 2.0);
        assert_eq!(blend.shape.normalize, 0.5);
        assert_eq!(blend.shape.band, None);
        assert_eq!(blend.mix, 0.75);
    }

    #[test]
    fn reset_and_copy() {
        let a = ParamSet::new();
        let b = ParamSet::new();
        a.set(WalshParam::Mix, 0.1);
        a.copy_to(&b);
        assert_eq!(b.get(WalshParam::Mix), 0.1);
        b.reset_to_defaults();
        assert_eq!(b.get(WalshParam::Mix), 1.0);
    }
}
