//! File-based spectral editing command.

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use walsh_core::{Effect, WalshMachine};
use walsh_io::{Preset, WavSpec, read_wav, write_wav};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset file (TOML)
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Control values in [0, 1] (e.g., "amount=0.8"); applied after the preset
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, f32)>,

    /// Root applied to the amount control (overrides the preset)
    #[arg(long)]
    amount_curve: Option<f64>,

    /// Host block size in samples
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,

    /// Drive the 64-bit processing path
    #[arg(long)]
    double: bool,
}

fn parse_key_val(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected key=value)", s))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid value for '{}': '{}'", key, value))?;
    Ok((key.trim().to_string(), value))
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s {
        "16" => Ok(16),
        "24" => Ok(24),
        "32" => Ok(32),
        _ => Err(format!("Unsupported bit depth '{}' (expected 16, 24 or 32)", s)),
    }
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }

    let mut preset = match &args.preset {
        Some(path) => Preset::load(path)
            .with_context(|| format!("loading preset {}", path.display()))?,
        None => Preset::defaults(),
    };
    for (key, value) in &args.param {
        preset.set(key, *value)?;
    }
    let curve = args.amount_curve.unwrap_or_else(|| preset.curve());

    println!("Reading {}...", args.input.display());
    let (channels, spec) = read_wav(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let frames = channels.first().map_or(0, Vec::len);
    println!(
        "  {} channel(s), {} frames, {} Hz, {:.2}s",
        channels.len(),
        frames,
        spec.sample_rate,
        frames as f64 / f64::from(spec.sample_rate)
    );

    let mut machine = WalshMachine::new(spec.sample_rate as f32, channels.len().max(1))
        .with_amount_curve(curve);
    preset.apply(&machine.params());
    machine.set_block_size(args.block_size);

    let snapshot = machine.params().snapshot();
    println!(
        "Preset '{}': window {} samples, latency {} samples, amount curve {:.2}",
        preset.name,
        snapshot.window_size().len(),
        machine.latency_samples(),
        machine.amount_curve()
    );
    tracing::info!(
        window = snapshot.window_size().len(),
        amount = snapshot.amount,
        low = snapshot.low,
        high = snapshot.high,
        normalize = snapshot.normalize,
        mix = snapshot.mix,
        "processing"
    );

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output: Vec<Vec<f32>> = channels.iter().map(|c| vec![0.0; c.len()]).collect();
    let mut in64 = vec![0.0f64; args.block_size];
    let mut out64 = vec![0.0f64; args.block_size];

    let mut start = 0;
    while start < frames {
        let end = (start + args.block_size).min(frames);
        let len = end - start;
        for (c, (input, out)) in channels.iter().zip(output.iter_mut()).enumerate() {
            let input = &input[start..end];
            let out = &mut out[start..end];
            if args.double {
                for (dst, &src) in in64[..len].iter_mut().zip(input) {
                    *dst = f64::from(src);
                }
                machine.process_block_f64(c, &in64[..len], &mut out64[..len]);
                for (dst, &src) in out.iter_mut().zip(&out64[..len]) {
                    *dst = src as f32;
                }
            } else {
                machine.process_block(c, input, out);
            }
        }
        pb.set_position(end as u64);
        start = end;
    }

    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&channels)),
        linear_to_db(peak(&channels))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&output)),
        linear_to_db(peak(&output))
    );

    let out_spec = WavSpec {
        bits_per_sample: args.bit_depth,
        ..spec
    };

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

fn rms(channels: &[Vec<f32>]) -> f32 {
    let count: usize = channels.iter().map(Vec::len).sum();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = channels
        .iter()
        .flatten()
        .map(|s| f64::from(*s) * f64::from(*s))
        .sum();
    (sum / count as f64).sqrt() as f32
}

fn peak(channels: &[Vec<f32>]) -> f32 {
    channels.iter().flatten().map(|s| s.abs()).fold(0.0, f32::max)
}

fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(parse_key_val("amount=0.8"), Ok(("amount".to_string(), 0.8)));
        assert_eq!(parse_key_val(" mix = 1 "), Ok(("mix".to_string(), 1.0)));
        assert!(parse_key_val("amount").is_err());
        assert!(parse_key_val("amount=lots").is_err());
    }

    #[test]
    fn bit_depth_is_restricted() {
        assert_eq!(parse_bit_depth("24"), Ok(24));
        assert!(parse_bit_depth("8").is_err());
    }

    #[test]
    fn stats_helpers() {
        let channels = vec![vec![0.5f32, -0.5], vec![1.0, -1.0]];
        assert!((rms(&channels) - (0.625f32).sqrt()).abs() < 1e-6);
        assert_eq!(peak(&channels), 1.0);
        assert_eq!(linear_to_db(0.0), -120.0);
        assert!((linear_to_db(1.0)).abs() < 1e-6);
    }
}
