//! Walsh Core - sequency-domain spectral editing for real-time audio
//!
//! This crate decomposes audio into windows of Walsh functions (square-wave
//! basis functions ordered by sequency, their count of sign changes), lets
//! the caller edit the coefficients, and resynthesizes the result with zero
//! allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Transform
//!
//! - [`bit_reverse`] / [`Permutation`] - Bit-reversal ordering that seeds the butterflies
//! - [`SequencyTransform`] - Cached fast Walsh-Hadamard transform in sequency order
//! - [`transform`], [`transform_normalized`], [`inverse_transform`] - Standalone one-shot forms
//!
//! ## Shaping
//!
//! - [`CoefficientShaper`] - Band mask, magnitude-rank threshold, L1 normalization
//! - [`RankedCoefficient`] - Coefficient paired with its sequency index for ranking
//! - [`ShapeSettings`] / [`BandLimits`] - Per-window shaping controls
//!
//! ## Streaming
//!
//! - [`WalshEngine`] - Window buffering, pipeline, dry/wet output for many channels
//! - [`ChannelBuffer`] - Per-channel shift register
//! - [`WindowSize`] - Clamped power-of-two window with latency rules
//! - [`Compositor`] - Inverse transform and dry/wet blend
//!
//! ## Effect Instance
//!
//! - [`Effect`] - Object-safe host-facing trait (`f32` and `f64` entry points)
//! - [`WalshMachine`] - The editor driven by a lock-free [`ParamSet`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! walsh-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use walsh_core::{inverse_transform, transform_normalized};
//!
//! let mut coeffs: Vec<f64> = transform_normalized(&[0.0f32, 1.0, 2.0, 3.0], 2);
//! assert_eq!(coeffs, [1.5, -1.0, 0.0, -0.5]);
//!
//! // Drop the highest-sequency component and resynthesize.
//! coeffs[3] = 0.0;
//! let edited: Vec<f32> = inverse_transform(&coeffs, 2);
//! assert_eq!(edited, [0.5, 0.5, 2.5, 2.5]);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: scratch is sized on window changes, never per call
//! - **Wide arithmetic**: everything between input and output runs in `f64`
//! - **Clamp, don't fail**: out-of-range controls are clamped silently

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod compositor;
pub mod effect;
pub mod engine;
pub mod params;
pub mod permutation;
pub mod sample;
pub mod shaper;
pub mod transform;
pub mod window;

// Re-export main types at crate root
pub use compositor::{Compositor, wet_dry_mix};
pub use effect::{Effect, WalshMachine};
pub use engine::{DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_RATE, WalshEngine};
pub use params::{BlendParams, ParamSet, ParamSnapshot, WalshParam};
pub use permutation::{Permutation, bit_reversal_permutation, bit_reverse};
pub use sample::Sample;
pub use shaper::{
    BandLimits, CoefficientShaper, MAX_AMOUNT_CURVE, MIN_AMOUNT_CURVE, RankedCoefficient,
    ShapeSettings, apply_band_mask, index_for_frequency, normalize_energy,
};
pub use transform::{SequencyTransform, inverse_transform, normalize, transform, transform_normalized};
pub use window::{ChannelBuffer, MAX_WINDOW_LEN, MAX_WINDOW_POWER, MIN_WINDOW_POWER, WindowSize};
