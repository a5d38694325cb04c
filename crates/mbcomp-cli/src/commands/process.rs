//! File-based compression command.

use crate::wav::{WavSpec, read_wav_channels, write_wav_channels};
use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use mbcomp_config::load_named_state;
use mbcomp_core::{Band, PerBand, linear_to_db, rms};
use mbcomp_engine::{Engine, EngineConfig, ParamKey};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// State file (TOML path, or a name in the user states directory)
    #[arg(short, long)]
    state: Option<String>,

    /// Parameter override by state key (e.g. "CTLow=-24"); repeatable
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    overrides: Vec<(ParamKey, f32)>,

    /// Mix only one band (low, mid or high)
    #[arg(long, value_parser = parse_solo)]
    solo: Option<Band>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,
}

fn parse_key_val(s: &str) -> Result<(ParamKey, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected key=value)", s))?;
    let key = ParamKey::from_state_key(key.trim())
        .ok_or_else(|| format!("Unknown parameter '{}' (see `mbcomp params`)", key.trim()))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid value for {}: '{}'", key, value.trim()))?;
    Ok((key, value))
}

fn parse_solo(s: &str) -> Result<Band, String> {
    match Band::from_name(s) {
        Some(band) if band != Band::Master => Ok(band),
        _ => Err(format!("Invalid solo band '{}' (expected low, mid or high)", s)),
    }
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s.parse::<u16>() {
        Ok(bits @ (16 | 24 | 32)) => Ok(bits),
        _ => Err(format!("Invalid bit depth '{}' (expected 16, 24 or 32)", s)),
    }
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (mut channels, spec) = read_wav_channels(&args.input)?;
    let frames = channels.first().map_or(0, Vec::len);
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f32 / sample_rate
    );

    let engine_config = EngineConfig {
        sample_rate,
        channels: channels.len(),
        max_block_size: args.block_size,
    };
    let mut engine = Engine::new();
    let params = engine.params();

    if let Some(name) = &args.state {
        let state = load_named_state(name)?;
        if let Some(description) = &state.description {
            println!("Loading state: {}", description);
        }
        state.apply_to(&params);
    }
    for &(key, value) in &args.overrides {
        let stored = params.set(key, value);
        if stored != value {
            tracing::warn!(%key, requested = value, applied = stored, "override clamped");
        }
    }
    params.set_solo(args.solo);

    engine
        .prepare(engine_config)
        .context("cannot configure engine for this file")?;
    println!(
        "Processing (latency {} samples)...",
        engine.latency_samples()
    );

    let input_rms: Vec<f32> = channels.iter().map(|c| rms(c)).collect();

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let meters = engine.meters();
    let mut input_sum = PerBand::splat(0.0f32);
    let mut output_sum = PerBand::splat(0.0f32);
    let mut gain_sum = PerBand::splat(0.0f32);
    let mut blocks = 0usize;
    let mut start = 0;
    while start < frames {
        let end = (start + args.block_size).min(frames);
        let mut slices: Vec<&mut [f32]> =
            channels.iter_mut().map(|c| &mut c[start..end]).collect();
        engine.process(&mut slices);

        let r = meters.read();
        for band in Band::ALL {
            input_sum[band] += r.input[band];
            output_sum[band] += r.output[band];
            gain_sum[band] += r.gain[band];
        }
        blocks += 1;
        start = end;
        pb.set_position(start as u64);
    }
    pb.finish_with_message("done");

    println!("\nStats:");
    for (i, (before, channel)) in input_rms.iter().zip(&channels).enumerate() {
        println!(
            "  Channel {}: RMS {:.1} dB -> {:.1} dB",
            i + 1,
            linear_to_db(*before),
            linear_to_db(rms(channel))
        );
    }

    if blocks > 0 {
        let n = blocks as f32;
        println!("\nBand meters (mean over blocks):");
        println!("  {:8}  {:>10}  {:>10}  {:>10}", "Band", "In dB", "Out dB", "Gain dB");
        for band in Band::ALL {
            println!(
                "  {:8}  {:>10.1}  {:>10.1}  {:>10.2}",
                band.name(),
                linear_to_db(input_sum[band] / n),
                linear_to_db(output_sum[band] / n),
                linear_to_db(gain_sum[band] / n)
            );
        }
    }

    let out_spec = WavSpec {
        bits_per_sample: args.bit_depth,
        ..spec
    };
    println!("\nWriting {}...", args.output.display());
    write_wav_channels(&args.output, &channels, out_spec)?;
    println!("Done!");

    Ok(())
}
