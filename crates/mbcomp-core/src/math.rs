//! Level, time and smoothing-coefficient helpers shared by the DSP stages.
//!
//! All functions are allocation-free and usable in `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`rms`] - Root-mean-square magnitude of a block
//!
//! # Time Conversions
//!
//! | Function | Form | Used by |
//! |----------|------|---------|
//! | [`ms_to_samples`] | `ms · fs / 1000`, truncated | Lookahead length |
//! | [`time_constant_coeff`] | `1 − e^(−1 / (fs·T))` | RMS detector |
//! | [`rise_time_coeff`] | `1 − e^(−2.2 / (fs·T))` | Gain smoothing (10–90 % rise) |

use libm::{expf, logf, sqrtf};

/// Floor applied before taking a logarithm so silence maps to −200 dB, not −∞.
pub const LEVEL_FLOOR: f32 = 1e-10;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use mbcomp_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs are floored at [`LEVEL_FLOOR`], so zero and negative values return
/// −200 dB.
///
/// # Example
/// ```rust
/// use mbcomp_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert!(linear_to_db(0.0).is_finite());
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(LEVEL_FLOOR)) * FACTOR
}

/// Root-mean-square of a block. Empty blocks return 0.
#[inline]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|&x| x * x).sum();
    sqrtf(sum / samples.len() as f32)
}

/// Multiplies every sample by `gain`, skipping the loop at unity.
#[inline]
pub fn apply_gain(samples: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for s in samples.iter_mut() {
        *s *= gain;
    }
}

/// Convert milliseconds to a whole number of samples.
///
/// Negative and non-finite times give zero; fractional samples are truncated.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    let samples = ms * sample_rate / 1000.0;
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// One-pole smoothing coefficient for time constant `time_s` (seconds).
///
/// Used as `y += coeff * (x - y)`; after `time_s` the output has covered
/// 63 % of a step.
#[inline]
pub fn time_constant_coeff(time_s: f32, sample_rate: f32) -> f32 {
    let denom = sample_rate * time_s;
    if denom <= 0.0 {
        return 1.0;
    }
    1.0 - expf(-1.0 / denom)
}

/// One-pole smoothing coefficient whose 10–90 % rise time is `time_ms`.
#[inline]
pub fn rise_time_coeff(time_ms: f32, sample_rate: f32) -> f32 {
    let denom = sample_rate * time_ms / 1000.0;
    if denom <= 0.0 {
        return 1.0;
    }
    1.0 - expf(-2.2 / denom)
}

/// Flush denormal (subnormal) floats to zero.
///
/// Recursive filters can decay into the subnormal range, which is very slow
/// on most CPUs. Values with magnitude below 1e-20 are treated as silence.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conversions() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-4);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-6);

        for db in [-60.0, -12.0, 0.0, 6.0, 40.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} dB came back as {back}");
        }
    }

    #[test]
    fn test_linear_to_db_floor() {
        assert!((linear_to_db(0.0) - (-200.0)).abs() < 0.01);
        assert!((linear_to_db(-1.0) - (-200.0)).abs() < 0.01);
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[0.5; 64]) - 0.5).abs() < 1e-6);
        assert!((rms(&[1.0, -1.0, 1.0, -1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_apply_gain() {
        let mut buf = [1.0, -0.5, 0.25];
        apply_gain(&mut buf, 2.0);
        assert_eq!(buf, [2.0, -1.0, 0.5]);
    }

    #[test]
    fn test_ms_to_samples() {
        assert_eq!(ms_to_samples(10.0, 48000.0), 480);
        assert_eq!(ms_to_samples(10.0, 44100.0), 441);
        // 0.5 ms at 44.1 kHz = 22.05 samples, truncated
        assert_eq!(ms_to_samples(0.5, 44100.0), 22);
        assert_eq!(ms_to_samples(-5.0, 48000.0), 0);
        assert_eq!(ms_to_samples(f32::NAN, 48000.0), 0);
    }

    #[test]
    fn test_smoothing_coeffs() {
        let c = time_constant_coeff(0.005, 48000.0);
        assert!(c > 0.0 && c < 1.0);
        // Same time: the rise-time form is 2.2x faster
        let r = rise_time_coeff(5.0, 48000.0);
        assert!(r > c);
        assert_eq!(time_constant_coeff(0.0, 48000.0), 1.0);
        assert_eq!(rise_time_coeff(0.0, 48000.0), 1.0);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
        assert_eq!(flush_denormal(1e-10), 1e-10);
        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-38), 0.0);
    }
}
