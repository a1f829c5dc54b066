//! Sequency spectrum of a single window.

use clap::Args;
use std::path::PathBuf;
use walsh_core::{MAX_WINDOW_POWER, RankedCoefficient, WindowSize, transform_normalized};
use walsh_io::{read_wav, read_wav_header};

#[derive(Args)]
pub struct InspectArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Window exponent (window = 2^P samples, 0..=14)
    #[arg(short = 'w', long, default_value = "10")]
    window_power: u32,

    /// First frame of the window
    #[arg(long, default_value = "0")]
    offset: usize,

    /// Channel to inspect
    #[arg(short, long, default_value = "0")]
    channel: usize,

    /// Number of coefficients to list
    #[arg(short = 'k', long, default_value = "16")]
    top: usize,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    if args.window_power > MAX_WINDOW_POWER {
        tracing::warn!(
            "window power {} clamped to {}",
            args.window_power,
            MAX_WINDOW_POWER
        );
    }
    let window = WindowSize::from_power(args.window_power);

    let header = read_wav_header(&args.input)?;
    if args.channel >= usize::from(header.spec.channels) {
        anyhow::bail!(
            "channel {} out of range ({} channel(s) in {})",
            args.channel,
            header.spec.channels,
            args.input.display()
        );
    }
    if args.offset as u64 >= header.frames {
        tracing::warn!(
            "offset {} is past the last frame ({}); window is silent",
            args.offset,
            header.frames
        );
    }

    let (channels, _) = read_wav(&args.input)?;
    let samples = channels.into_iter().nth(args.channel).unwrap_or_default();

    // Zero-pad past the end of the file.
    let mut frame = vec![0.0f32; window.len()];
    if args.offset < samples.len() {
        let available = &samples[args.offset..];
        let n = available.len().min(frame.len());
        frame[..n].copy_from_slice(&available[..n]);
    }

    let coeffs: Vec<f64> = transform_normalized(&frame, window.power());
    let energy: f64 = coeffs.iter().map(|c| c * c).sum();

    let mut ranked: Vec<RankedCoefficient> = coeffs
        .iter()
        .enumerate()
        .map(|(index, &value)| RankedCoefficient { index, value })
        .collect();
    ranked.sort_unstable_by(|a, b| b.rank_cmp(a));
    ranked.truncate(args.top);

    let share = |c: &RankedCoefficient| {
        if energy > 0.0 {
            c.value * c.value / energy
        } else {
            0.0
        }
    };

    if args.json {
        let rows: Vec<serde_json::Value> = ranked
            .iter()
            .map(|c| {
                serde_json::json!({
                    "index": c.index,
                    "value": c.value,
                    "energy_share": share(c),
                })
            })
            .collect();
        let report = serde_json::json!({
            "file": args.input.display().to_string(),
            "sample_rate": header.spec.sample_rate,
            "encoding": header.encoding(),
            "frames": header.frames,
            "duration_secs": header.duration_secs(),
            "channel": args.channel,
            "offset": args.offset,
            "window": window.len(),
            "energy": energy,
            "coefficients": rows,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}: {}, {} Hz, {} frames ({:.3}s)",
        args.input.display(),
        header.encoding(),
        header.spec.sample_rate,
        header.frames,
        header.duration_secs()
    );
    println!(
        "channel {} @ {}: {}-sample window",
        args.channel,
        args.offset,
        window.len()
    );
    println!("\n  {:>6}  {:>12}  {:>7}", "index", "value", "energy");
    for c in &ranked {
        println!(
            "  {:>6}  {:>12.6}  {:>6.2}%",
            c.index,
            c.value,
            share(c) * 100.0
        );
    }

    Ok(())
}
