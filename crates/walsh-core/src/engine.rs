//! Streaming spectral editor: window buffer, transform, shaper and compositor.
//!
//! [`WalshEngine`] owns everything one stream needs: a shift register per
//! channel, the cached transform, the shaper's ranking scratch, the
//! coefficient buffer and the compositor's wet buffer. All of it is sized
//! when the window changes, so [`process_block`](WalshEngine::process_block)
//! never allocates.
//!
//! Each window runs the same pipeline:
//!
//! ```text
//! dry window ──► forward (÷N) ──► band mask ──► rank threshold ──► normalize
//!                                                                      │
//! output ◄── dry/wet blend ◄── inverse ◄────────────────────────────────┘
//! ```
//!
//! See [`window`](crate::window) for the two block-size regimes.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::compositor::Compositor;
use crate::params::BlendParams;
use crate::sample::Sample;
use crate::shaper::CoefficientShaper;
use crate::transform::SequencyTransform;
use crate::window::{ChannelBuffer, WindowSize};

/// Default sample rate before [`configure`](WalshEngine::configure) is called.
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;

/// Default host block size before [`configure`](WalshEngine::configure) is called.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Multi-channel sequency-domain editor.
///
/// # Example
///
/// ```rust
/// use walsh_core::{BlendParams, WalshEngine};
///
/// let mut engine = WalshEngine::new(1);
/// engine.configure(3, 48000.0, 4);
/// assert_eq!(engine.required_latency_samples(), 4);
///
/// // Untouched coefficients, fully wet: the signal passes through.
/// let input = [0.5f32, -0.25, 1.0, 0.0];
/// let mut output = [0.0f32; 4];
/// engine.process_block(0, &input, &mut output, &BlendParams::passthrough());
/// assert_eq!(output, input);
/// ```
#[derive(Debug, Clone)]
pub struct WalshEngine {
    window: WindowSize,
    sample_rate: f64,
    host_block_size: usize,
    latency: usize,
    channels: Vec<ChannelBuffer>,
    transform: SequencyTransform,
    shaper: CoefficientShaper,
    compositor: Compositor,
    coefficients: Vec<f64>,
    frame: Vec<f64>,
}

impl WalshEngine {
    /// Engine for `num_channels` channels with the default window (2^7),
    /// [`DEFAULT_SAMPLE_RATE`] and [`DEFAULT_BLOCK_SIZE`].
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` is zero.
    pub fn new(num_channels: usize) -> Self {
        assert!(num_channels > 0, "engine needs at least one channel");
        let window = WindowSize::default();
        let len = window.len();
        Self {
            window,
            sample_rate: DEFAULT_SAMPLE_RATE,
            host_block_size: DEFAULT_BLOCK_SIZE,
            latency: window.latency_for_block(DEFAULT_BLOCK_SIZE),
            channels: vec![ChannelBuffer::new(len); num_channels],
            transform: SequencyTransform::new(window.power()),
            shaper: CoefficientShaper::with_capacity(len),
            compositor: Compositor::new(len),
            coefficients: vec![0.0; len],
            frame: vec![0.0; len],
        }
    }

    /// Set window exponent, sample rate and host block size.
    ///
    /// Recomputes latency and zeroes every channel buffer. The exponent is
    /// clamped to the supported range.
    pub fn configure(&mut self, window_power: u32, sample_rate: f64, host_block_size: usize) {
        self.sample_rate = sample_rate;
        self.host_block_size = host_block_size;
        if !self.set_window_power(window_power) {
            self.reset();
            self.update_latency();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "engine_configure: window {} ({} samples), {} Hz, block {}, latency {}",
            self.window.power(),
            self.window.len(),
            self.sample_rate,
            self.host_block_size,
            self.latency
        );
    }

    /// Change the window exponent (clamped).
    ///
    /// A change discards every channel's buffered history and recomputes
    /// latency; a partly filled window is never carried across sizes.
    /// Returns `true` if the window changed.
    pub fn set_window_power(&mut self, power: u32) -> bool {
        let window = WindowSize::from_power(power);
        if window == self.window {
            return false;
        }
        self.window = window;

        let len = window.len();
        self.transform.set_power(window.power());
        self.shaper.reserve(len);
        self.compositor.resize(len);
        self.coefficients.clear();
        self.coefficients.resize(len, 0.0);
        self.frame.clear();
        self.frame.resize(len, 0.0);
        for channel in &mut self.channels {
            channel.resize(len);
        }
        self.update_latency();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "engine_window: {} samples, buffers reset, latency {}",
            len,
            self.latency
        );
        true
    }

    /// Change the sample rate used to map band limits to indices.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Change the host block size used for latency reporting.
    pub fn set_host_block_size(&mut self, block_size: usize) {
        self.host_block_size = block_size;
        self.update_latency();
    }

    /// Change the number of channels. New channels start silent.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` is zero.
    pub fn set_channel_count(&mut self, num_channels: usize) {
        assert!(num_channels > 0, "engine needs at least one channel");
        if num_channels == self.channels.len() {
            return;
        }
        self.channels
            .resize(num_channels, ChannelBuffer::new(self.window.len()));

        #[cfg(feature = "tracing")]
        tracing::debug!("engine_channels: {num_channels}");
    }

    /// Zero every channel's buffered history.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
    }

    /// Samples of latency the host should compensate:
    /// `max(window - host_block_size, 0)`.
    pub fn required_latency_samples(&self) -> usize {
        self.latency
    }

    /// Current window.
    pub fn window(&self) -> WindowSize {
        self.window
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Host block size latency is reported for.
    pub fn host_block_size(&self) -> usize {
        self.host_block_size
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Buffered history of one channel, oldest first.
    pub fn channel_buffer(&self, channel: usize) -> &ChannelBuffer {
        &self.channels[channel]
    }

    /// Process one block of one channel.
    ///
    /// Blocks at least one window long are cut into window-sized strides; a
    /// trailing partial stride, and any block shorter than the window, go
    /// through the channel's shift register. Every output sample is written.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is out of range or the slices differ in length.
    pub fn process_block<S: Sample>(
        &mut self,
        channel: usize,
        input: &[S],
        output: &mut [S],
        params: &BlendParams,
    ) {
        assert!(
            channel < self.channels.len(),
            "channel {channel} out of range ({} channels)",
            self.channels.len()
        );
        assert_eq!(
            input.len(),
            output.len(),
            "input and output must have the same length"
        );
        if input.is_empty() {
            return;
        }

        let len = self.window.len();
        let strides = input.len() / len;
        let strided = strides * len;

        for (dry, wet) in input[..strided]
            .chunks_exact(len)
            .zip(output[..strided].chunks_exact_mut(len))
        {
            for (dst, &src) in self.frame.iter_mut().zip(dry) {
                *dst = src.to_f64();
            }
            self.run_window(params);
            self.compositor.mix_into(&self.frame, 0, params.mix, wet);
        }

        if strided > 0 {
            self.channels[channel].load_history(&input[..strided]);
        }

        let tail = &input[strided..];
        if !tail.is_empty() {
            let buffer = &mut self.channels[channel];
            buffer.push_block(tail);
            self.frame.copy_from_slice(buffer.as_slice());
            self.run_window(params);
            self.compositor
                .mix_into(&self.frame, len - tail.len(), params.mix, &mut output[strided..]);
        }
    }

    /// Forward, shape and invert the window held in `frame`.
    fn run_window(&mut self, params: &BlendParams) {
        self.transform
            .forward_normalized(&self.frame, &mut self.coefficients);
        self.shaper
            .shape(&mut self.coefficients, &params.shape, self.sample_rate);
        self.compositor
            .resynthesize(&mut self.transform, &self.coefficients);
    }

    fn update_latency(&mut self) {
        self.latency = self.window.latency_for_block(self.host_block_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaper::ShapeSettings;

    fn removing(amount: f64) -> BlendParams {
        BlendParams {
            shape: ShapeSettings {
                amount,
                ..ShapeSettings::default()
            },
            mix: 1.0,
        }
    }

    #[test]
    fn latency_tracks_window_and_block() {
        let mut engine = WalshEngine::new(2);
        engine.configure(10, 44100.0, 256);
        assert_eq!(engine.required_latency_samples(), 768);
        engine.set_host_block_size(2048);
        assert_eq!(engine.required_latency_samples(), 0);
        engine.set_window_power(12);
        assert_eq!(engine.required_latency_samples(), 2048);
    }

    #[test]
    fn window_power_is_clamped() {
        let mut engine = WalshEngine::new(1);
        engine.configure(99, 48000.0, 64);
        assert_eq!(engine.window().len(), 16384);
        assert_eq!(engine.channel_buffer(0).len(), 16384);
    }

    #[test]
    fn window_change_discards_history() {
        let mut engine = WalshEngine::new(1);
        engine.configure(2, 48000.0, 1);
        let mut out = [0.0f32; 2];
        engine.process_block(0, &[1.0f32, 1.0], &mut out, &BlendParams::passthrough());
        assert!(engine.channel_buffer(0).as_slice().iter().any(|s| *s != 0.0));

        assert!(engine.set_window_power(3));
        assert!(!engine.set_window_power(3));
        assert_eq!(engine.channel_buffer(0).len(), 8);
        assert!(engine.channel_buffer(0).as_slice().iter().all(|s| *s == 0.0));
    }

    #[test]
    fn configure_resets_even_without_window_change() {
        let mut engine = WalshEngine::new(1);
        engine.configure(2, 48000.0, 1);
        let mut out = [0.0f64; 1];
        engine.process_block(0, &[3.0f64], &mut out, &BlendParams::passthrough());
        engine.configure(2, 48000.0, 1);
        assert!(engine.channel_buffer(0).as_slice().iter().all(|s| *s == 0.0));
    }

    #[test]
    fn small_blocks_emit_tail_of_shift_register() {
        let mut engine = WalshEngine::new(1);
        engine.configure(2, 48000.0, 2);
        let mut out = [0.0f64; 2];

        engine.process_block(0, &[0.0f64, 1.0], &mut out, &BlendParams::passthrough());
        assert_eq!(out, [0.0, 1.0]);
        engine.process_block(0, &[2.0f64, 3.0], &mut out, &BlendParams::passthrough());
        assert_eq!(out, [2.0, 3.0]);

        // Register now holds [0, 1, 2, 3] with coefficients
        // [1.5, -1, 0, -0.5]. Removing the two smallest leaves
        // [0.5, 0.5, 2.5, 2.5], of which the last two are emitted.
        let lossy = removing(0.7);
        let mut engine = WalshEngine::new(1);
        engine.configure(2, 48000.0, 2);
        engine.process_block(0, &[0.0f64, 1.0], &mut out, &BlendParams::passthrough());
        engine.process_block(0, &[2.0f64, 3.0], &mut out, &lossy);
        assert_eq!(out, [2.5, 2.5]);
    }

    #[test]
    fn large_block_processes_each_stride() {
        let mut engine = WalshEngine::new(1);
        engine.configure(2, 48000.0, 8);
        let input = [0.0f64, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0];
        let mut out = [0.0f64; 8];
        engine.process_block(0, &input, &mut out, &removing(0.7));
        assert_eq!(out, [0.5, 0.5, 2.5, 2.5, 0.5, 0.5, 2.5, 2.5]);
        assert_eq!(engine.channel_buffer(0).as_slice(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn dry_mix_returns_input() {
        let mut engine = WalshEngine::new(1);
        engine.configure(3, 48000.0, 3);
        let input = [0.2f32, -0.7, 0.4];
        let mut out = [0.0f32; 3];
        let params = BlendParams {
            mix: 0.0,
            ..removing(1.0)
        };
        engine.process_block(0, &input, &mut out, &params);
        assert_eq!(out, input);
    }

    #[test]
    fn channels_are_independent() {
        let mut engine = WalshEngine::new(2);
        engine.configure(2, 48000.0, 1);
        let mut out = [0.0f32; 1];
        engine.process_block(0, &[1.0f32], &mut out, &BlendParams::passthrough());
        assert!(engine.channel_buffer(1).as_slice().iter().all(|s| *s == 0.0));

        engine.set_channel_count(3);
        assert_eq!(engine.channel_count(), 3);
        assert_eq!(engine.channel_buffer(2).len(), 4);
        assert_eq!(engine.channel_buffer(0).as_slice()[3], 1.0);
    }

    #[test]
    fn empty_block_is_a_no_op() {
        let mut engine = WalshEngine::new(1);
        let mut out: [f32; 0] = [];
        engine.process_block(0, &[], &mut out, &BlendParams::passthrough());
        assert!(engine.channel_buffer(0).as_slice().iter().all(|s| *s == 0.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn rejects_unknown_channel() {
        let mut engine = WalshEngine::new(1);
        let mut out = [0.0f32; 1];
        engine.process_block(1, &[0.0f32], &mut out, &BlendParams::passthrough());
    }
}
