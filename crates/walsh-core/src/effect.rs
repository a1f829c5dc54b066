//! Host-facing effect interface and the spectral editor instance.
//!
//! The [`Effect`] trait is what a host adapter drives: per-channel block
//! processing at either precision, sample-rate and block-size changes,
//! reset, and latency reporting. It is object-safe, so hosts can hold a
//! `Box<dyn Effect>`.
//!
//! [`WalshMachine`] implements it on top of [`WalshEngine`]. Its controls
//! live in a shared [`ParamSet`]; a setter on another thread writes there
//! and the machine picks the values up at the start of the next call.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;

use crate::engine::WalshEngine;
use crate::params::{ParamSet, WalshParam};
use crate::sample::Sample;
use crate::shaper::{MAX_AMOUNT_CURVE, MIN_AMOUNT_CURVE};

/// Block-processing audio effect with independent channels.
///
/// # Example
///
/// ```rust
/// use walsh_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process_block(&mut self, _channel: usize, input: &[f32], output: &mut [f32]) {
///         for (o, i) in output.iter_mut().zip(input) {
///             *o = i * self.gain;
///         }
///     }
///
///     fn process_block_f64(&mut self, _channel: usize, input: &[f64], output: &mut [f64]) {
///         for (o, i) in output.iter_mut().zip(input) {
///             *o = i * f64::from(self.gain);
///         }
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///     fn set_block_size(&mut self, _block_size: usize) {}
///     fn reset(&mut self) {}
/// }
///
/// let mut gain: Box<dyn Effect> = Box::new(Gain { gain: 0.5 });
/// let mut out = [0.0f32; 2];
/// gain.process_block(0, &[1.0, -1.0], &mut out);
/// assert_eq!(out, [0.5, -0.5]);
/// assert_eq!(gain.latency_samples(), 0);
/// ```
pub trait Effect {
    /// Process one block of one channel at single precision.
    ///
    /// `output` must be the same length as `input` and is fully written.
    fn process_block(&mut self, channel: usize, input: &[f32], output: &mut [f32]);

    /// Process one block of one channel at double precision.
    fn process_block_f64(&mut self, channel: usize, input: &[f64], output: &mut [f64]);

    /// Update the sample rate in Hz.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Tell the effect the host's usual block size.
    fn set_block_size(&mut self, block_size: usize);

    /// Clear all internal state without touching parameters.
    fn reset(&mut self);

    /// Processing latency in samples, for host delay compensation.
    ///
    /// Default returns 0 (no latency).
    fn latency_samples(&self) -> usize {
        0
    }
}

/// Sequency-domain spectral editor driven by a shared [`ParamSet`].
///
/// # Example
///
/// ```rust
/// use walsh_core::{Effect, WalshMachine, WalshParam};
///
/// let mut machine = WalshMachine::new(48000.0, 2);
/// machine.set_block_size(64);
/// machine.set_param(WalshParam::Amount, 0.0);
/// assert_eq!(machine.latency_samples(), 128 - 64);
///
/// let params = machine.params();
/// params.set(WalshParam::WindowSize, 0.0); // 1-sample window
///
/// let mut out = [0.0f32; 64];
/// machine.process_block(0, &[0.25; 64], &mut out);
/// assert_eq!(out, [0.25; 64]);
/// assert_eq!(machine.latency_samples(), 0);
/// ```
#[derive(Debug)]
pub struct WalshMachine {
    engine: WalshEngine,
    params: Arc<ParamSet>,
    amount_curve: f64,
}

impl WalshMachine {
    /// Machine with default controls for `num_channels` channels.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` is zero.
    pub fn new(sample_rate: f32, num_channels: usize) -> Self {
        Self::with_params(sample_rate, num_channels, Arc::new(ParamSet::new()))
    }

    /// Machine reading its controls from an existing shared set.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` is zero.
    pub fn with_params(sample_rate: f32, num_channels: usize, params: Arc<ParamSet>) -> Self {
        let mut engine = WalshEngine::new(num_channels);
        let window = params.snapshot().window_size();
        engine.configure(
            window.power(),
            f64::from(sample_rate),
            engine.host_block_size(),
        );
        Self {
            engine,
            params,
            amount_curve: 1.0,
        }
    }

    /// Builder form of [`set_amount_curve`](Self::set_amount_curve).
    pub fn with_amount_curve(mut self, curve: f64) -> Self {
        self.set_amount_curve(curve);
        self
    }

    /// Shared handle to the controls.
    pub fn params(&self) -> Arc<ParamSet> {
        Arc::clone(&self.params)
    }

    /// Write one control (clamped to `[0, 1]`).
    pub fn set_param(&self, param: WalshParam, value: f32) {
        self.params.set(param, value);
    }

    /// Read one control.
    pub fn param(&self, param: WalshParam) -> f32 {
        self.params.get(param)
    }

    /// Root applied to the amount control, clamped to `[0.1, 10]`.
    pub fn set_amount_curve(&mut self, curve: f64) {
        if curve.is_nan() {
            return;
        }
        self.amount_curve = curve.clamp(MIN_AMOUNT_CURVE, MAX_AMOUNT_CURVE);
    }

    /// Current amount curve.
    pub fn amount_curve(&self) -> f64 {
        self.amount_curve
    }

    /// Change the channel count. New channels start silent.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` is zero.
    pub fn set_channel_count(&mut self, num_channels: usize) {
        self.engine.set_channel_count(num_channels);
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.engine.channel_count()
    }

    /// The underlying engine.
    pub fn engine(&self) -> &WalshEngine {
        &self.engine
    }

    fn process<S: Sample>(&mut self, channel: usize, input: &[S], output: &mut [S]) {
        let snapshot = self.params.snapshot();
        self.engine.set_window_power(snapshot.window_size().power());
        let blend = snapshot.blend_params(self.engine.sample_rate(), self.amount_curve);
        self.engine.process_block(channel, input, output, &blend);
    }
}

impl Effect for WalshMachine {
    fn process_block(&mut self, channel: usize, input: &[f32], output: &mut [f32]) {
        self.process(channel, input, output);
    }

    fn process_block_f64(&mut self, channel: usize, input: &[f64], output: &mut [f64]) {
        self.process(channel, input, output);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.engine.set_sample_rate(f64::from(sample_rate));
    }

    fn set_block_size(&mut self, block_size: usize) {
        self.engine.set_host_block_size(block_size);
    }

    fn reset(&mut self) {
        self.engine.reset();
    }

    fn latency_samples(&self) -> usize {
        let window = self.params.snapshot().window_size();
        window.latency_for_block(self.engine.host_block_size())
    }
}
