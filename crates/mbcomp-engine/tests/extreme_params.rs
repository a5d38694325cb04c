//! Extreme parameter tests for the engine.
//!
//! Verifies that the engine produces finite output when every parameter is
//! at its minimum or maximum, and when running at extreme sample rates
//! (8 kHz and 192 kHz).

use mbcomp_core::Band;
use mbcomp_engine::{Engine, EngineConfig, EngineParams, GlobalParam, ParamKey};

const DEFAULT_SAMPLE_RATE: f32 = 48000.0;
const LOW_SAMPLE_RATE: f32 = 8000.0;
const HIGH_SAMPLE_RATE: f32 = 192000.0;
const NUM_SAMPLES: usize = 4000;

/// Process `NUM_SAMPLES` through the engine and assert all outputs are finite.
fn assert_finite_output(engine: &mut Engine, label: &str) {
    let mut buf: Vec<f32> = (0..NUM_SAMPLES)
        .map(|i| match i % 3 {
            0 => 0.5,
            1 => -0.5,
            _ => 0.0,
        })
        .collect();
    engine.process(&mut [&mut buf[..]]);

    for (i, &output) in buf.iter().enumerate() {
        assert!(
            output.is_finite(),
            "{}: non-finite output at sample {}: {}",
            label,
            i,
            output
        );
    }
    let meters = engine.meters().read();
    for band in Band::ALL {
        assert!(meters.gain[band].is_finite(), "{label}: {band} gain meter");
        assert!(meters.output[band].is_finite(), "{label}: {band} output meter");
    }
}

fn set_all_params_min(params: &EngineParams) {
    for key in ParamKey::all() {
        params.set(key, key.descriptor().min);
    }
}

fn set_all_params_max(params: &EngineParams) {
    for key in ParamKey::all() {
        params.set(key, key.descriptor().max);
    }
}

fn engine_at(sample_rate: f32) -> Engine {
    let mut engine = Engine::new();
    engine
        .prepare(EngineConfig {
            sample_rate,
            channels: 1,
            max_block_size: 1024,
        })
        .expect("valid config");
    engine
}

#[test]
fn all_params_at_minimum() {
    let mut engine = engine_at(DEFAULT_SAMPLE_RATE);
    set_all_params_min(&engine.params());
    assert_finite_output(&mut engine, "all min");
}

#[test]
fn all_params_at_maximum() {
    let mut engine = engine_at(DEFAULT_SAMPLE_RATE);
    set_all_params_max(&engine.params());
    assert_finite_output(&mut engine, "all max");
    assert_eq!(engine.latency_samples(), 2 * 2400);
}

#[test]
fn low_sample_rate() {
    // 15 kHz splits sit above Nyquist at 8 kHz; cutoffs are clamped
    let mut engine = engine_at(LOW_SAMPLE_RATE);
    set_all_params_max(&engine.params());
    assert_finite_output(&mut engine, "8 kHz, all max");

    let mut engine = engine_at(LOW_SAMPLE_RATE);
    assert_finite_output(&mut engine, "8 kHz, defaults");
}

#[test]
fn high_sample_rate() {
    let mut engine = engine_at(HIGH_SAMPLE_RATE);
    set_all_params_max(&engine.params());
    assert_finite_output(&mut engine, "192 kHz, all max");

    let mut engine = engine_at(HIGH_SAMPLE_RATE);
    set_all_params_min(&engine.params());
    assert_finite_output(&mut engine, "192 kHz, all min");
}

#[test]
fn lookahead_sweep_between_buffers() {
    let mut engine = engine_at(DEFAULT_SAMPLE_RATE);
    let params = engine.params();
    for step in 0..=10 {
        params.set(ParamKey::Global(GlobalParam::Lookahead), step as f32 * 5.0);
        assert_finite_output(&mut engine, &format!("lookahead {} ms", step * 5));
    }
    assert_eq!(engine.latency_samples(), 2 * 2400);
}
