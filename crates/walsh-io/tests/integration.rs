//! Integration tests for walsh-io WAV and preset files.

use tempfile::{NamedTempFile, tempdir};
use walsh_core::{Effect, ParamSet, WalshMachine, WalshParam};
use walsh_io::{Error, Preset, WavSpec, read_wav, read_wav_header, write_wav};

fn sine_wave(sample_rate: u32, freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

#[test]
fn wav_roundtrip_multichannel_f32() {
    let sr = 44100;
    let channels = vec![
        sine_wave(sr, 220.0, 4410),
        sine_wave(sr, 440.0, 4410),
        sine_wave(sr, 880.0, 4410),
    ];
    let spec = WavSpec {
        channels: 3,
        sample_rate: sr,
        bits_per_sample: 32,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &channels, spec).unwrap();

    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec, spec);
    assert_eq!(loaded, channels);
}

#[test]
fn wav_roundtrip_24bit() {
    let sr = 48000;
    let channels = vec![sine_wave(sr, 1000.0, 4800), sine_wave(sr, 500.0, 4800)];
    let spec = WavSpec {
        channels: 2,
        sample_rate: sr,
        bits_per_sample: 24,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &channels, spec).unwrap();
    let (loaded, _) = read_wav(file.path()).unwrap();

    for (orig, back) in channels.iter().zip(&loaded) {
        for (a, b) in orig.iter().zip(back) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }
}

#[test]
fn wav_header_reports_frames_and_encoding() {
    let spec = WavSpec {
        channels: 2,
        sample_rate: 22050,
        bits_per_sample: 16,
    };
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[vec![0.0; 22050], vec![0.0; 22050]], spec).unwrap();

    let header = read_wav_header(file.path()).unwrap();
    assert_eq!(header.spec, spec);
    assert_eq!(header.frames, 22050);
    assert!(!header.float);
    assert!((header.duration_secs() - 1.0).abs() < 1e-9);
    assert_eq!(header.encoding(), "PCM 16-bit");
}

#[test]
fn missing_wav_is_an_error() {
    let dir = tempdir().unwrap();
    let err = read_wav(dir.path().join("absent.wav")).unwrap_err();
    assert!(matches!(err, Error::Wav(_)), "{err}");
}

#[test]
fn preset_save_load_roundtrip_in_nested_dir() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("presets").join("thin.toml");

    let preset = Preset::new("Thin")
        .with_description("Upper half of the sequency range")
        .with_param(WalshParam::LowBand, 0.5)
        .with_param(WalshParam::Amount, 0.25)
        .with_amount_curve(2.0);
    preset.save(&path).unwrap();

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
}

#[test]
fn preset_load_reports_path_on_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    let err = Preset::load(&path).unwrap_err();
    assert!(matches!(err, Error::ReadFile { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn preset_drives_a_machine() {
    let preset = Preset::from_toml(
        r#"
name = "Dry"
[params]
window = 0.2142857
amount = 1.0
mix = 0.0
"#,
    )
    .unwrap();

    let mut machine = WalshMachine::new(48000.0, 1).with_amount_curve(preset.curve());
    preset.apply(&machine.params());
    assert_eq!(machine.params().snapshot().window_size().len(), 8);

    let input = sine_wave(48000, 440.0, 64);
    let mut output = vec![0.0f32; 64];
    machine.process_block(0, &input, &mut output);
    assert_eq!(output, input);

    let captured = Preset::from_params("captured", &ParamSet::new());
    assert_eq!(captured.value(WalshParam::Mix), 1.0);
}
