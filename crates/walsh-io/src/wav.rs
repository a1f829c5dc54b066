//! WAV file reading and writing.
//!
//! Audio is handled as planar channels (`channels[c][frame]`) because the
//! engine processes each channel independently. Integer PCM is scaled to
//! `[-1.0, 1.0)` on read and back on write; 32-bit files are IEEE float.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Header fields of a WAV file, read without decoding any samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub spec: WavSpec,
    /// Samples per channel.
    pub frames: u64,
    /// IEEE float samples rather than integer PCM.
    pub float: bool,
}

impl WavHeader {
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / f64::from(self.spec.sample_rate.max(1))
    }

    /// Short encoding label, e.g. `"PCM 16-bit"`.
    pub fn encoding(&self) -> String {
        let kind = if self.float { "float" } else { "PCM" };
        format!("{kind} {}-bit", self.spec.bits_per_sample)
    }
}

/// Read the header of a WAV file.
///
/// `walsh inspect` uses this to validate the channel and offset before
/// loading sample data.
pub fn read_wav_header<P: AsRef<Path>>(path: P) -> Result<WavHeader> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let frames = u64::from(reader.len()) / u64::from(spec.channels.max(1));

    Ok(WavHeader {
        spec: spec.into(),
        frames,
        float: spec.sample_format == SampleFormat::Float,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (8, 16 or 24 integer; 32 float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Split interleaved frames into planar channels.
///
/// A trailing partial frame is dropped.
pub fn deinterleave(interleaved: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let channels = channels.max(1);
    let frames = interleaved.len() / channels;
    let mut planar: Vec<Vec<f32>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    planar
}

/// Merge planar channels into interleaved frames.
///
/// Channels must all have the same length.
pub fn interleave(channels: &[Vec<f32>]) -> Result<Vec<f32>> {
    let frames = check_planar(channels)?;
    let mut interleaved = Vec::with_capacity(frames * channels.len());
    for frame in 0..frames {
        for channel in channels {
            interleaved.push(channel[frame]);
        }
    }
    Ok(interleaved)
}

/// Frame count shared by all channels.
fn check_planar(channels: &[Vec<f32>]) -> Result<usize> {
    let frames = channels.first().map_or(0, Vec::len);
    for (index, channel) in channels.iter().enumerate() {
        if channel.len() != frames {
            return Err(Error::RaggedChannels {
                channel: index,
                expected: frames,
                found: channel.len(),
            });
        }
    }
    Ok(frames)
}

/// Read a WAV file into planar `f32` channels along with its spec.
///
/// # Example
/// ```ignore
/// let (channels, spec) = read_wav("input.wav")?;
/// println!("{} channels of {} frames", channels.len(), channels[0].len());
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());

    let samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let channels = deinterleave(&samples, usize::from(spec.channels));
    tracing::debug!(
        "wav_read: {} ({} ch, {} Hz, {} bit, {} frames)",
        path.display(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        channels.first().map_or(0, Vec::len)
    );
    Ok((channels, spec))
}

/// Write planar channels to a WAV file.
///
/// `channels.len()` must equal `spec.channels` and every channel must have
/// the same length. Integer formats are clamped to the representable range.
///
/// # Example
/// ```ignore
/// let silence = vec![vec![0.0f32; 48000]; 2];
/// write_wav("output.wav", &silence, WavSpec::default())?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, channels: &[Vec<f32>], spec: WavSpec) -> Result<()> {
    let path = path.as_ref();
    if channels.len() != usize::from(spec.channels) {
        return Err(Error::ChannelMismatch {
            expected: usize::from(spec.channels),
            found: channels.len(),
        });
    }
    if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
        return Err(Error::UnsupportedBitDepth(spec.bits_per_sample));
    }
    let interleaved = interleave(channels)?;

    let hound_spec = hound::WavSpec::from(spec);
    let mut writer = WavWriter::create(path, hound_spec)?;

    if spec.bits_per_sample == 32 {
        for &sample in &interleaved {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for &sample in &interleaved {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    tracing::debug!(
        "wav_write: {} ({} ch, {} Hz, {} bit, {} frames)",
        path.display(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        channels.first().map_or(0, Vec::len)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_roundtrip_f32_stereo() {
        let left: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
        let right: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).cos()).collect();
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        };

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[left.clone(), right.clone()], spec).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec, spec);
        assert_eq!(loaded, vec![left, right]);
    }

    #[test]
    fn test_roundtrip_i16_mono() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin() * 0.9).collect();
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
        };

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[samples.clone()], spec).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec.sample_rate, 44100);
        assert_eq!(loaded[0].len(), samples.len());

        // 16-bit has less precision
        for (a, b) in samples.iter().zip(loaded[0].iter()) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn test_int_write_clamps_full_scale() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[vec![2.0, -2.0]], spec).unwrap();
        let (loaded, _) = read_wav(file.path()).unwrap();
        assert_eq!(loaded[0][0], 32767.0 / 32768.0);
        assert_eq!(loaded[0][1], -1.0);
    }

    #[test]
    fn test_deinterleave_and_interleave() {
        let planar = deinterleave(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 3);
        assert_eq!(planar, vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        assert_eq!(
            interleave(&planar).unwrap(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn test_ragged_channels_rejected() {
        let err = interleave(&[vec![0.0; 3], vec![0.0; 2]]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedChannels {
                channel: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let file = NamedTempFile::new().unwrap();
        let err = write_wav(file.path(), &[vec![0.0; 4]], WavSpec::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::ChannelMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_unsupported_bit_depth() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            channels: 1,
            bits_per_sample: 12,
            ..WavSpec::default()
        };
        let err = write_wav(file.path(), &[vec![0.0; 4]], spec).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBitDepth(12)));
    }
}
