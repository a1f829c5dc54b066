//! File I/O for the walsh sequency-domain editor.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for planar multi-channel audio
//! - **Presets**: [`Preset`] TOML files holding the editor's control values
//! - **Errors**: one [`Error`] type for both
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use walsh_core::{Effect, WalshMachine};
//! use walsh_io::{Preset, read_wav, write_wav};
//!
//! let (mut channels, spec) = read_wav("input.wav")?;
//! let preset = Preset::load("crushed.toml")?;
//!
//! let mut machine = WalshMachine::new(spec.sample_rate as f32, channels.len())
//!     .with_amount_curve(preset.curve());
//! preset.apply(&machine.params());
//! for (c, channel) in channels.iter_mut().enumerate() {
//!     let input = channel.clone();
//!     machine.process_block(c, &input, channel);
//! }
//!
//! write_wav("output.wav", &channels, spec)?;
//! ```

mod error;
mod preset;
mod wav;

pub use error::{Error, Result};
pub use preset::Preset;
pub use wav::{WavHeader, WavSpec, deinterleave, interleave, read_wav, read_wav_header, write_wav};
