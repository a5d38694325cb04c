//! Three-way allpass crossover.
//!
//! Two first-order [`AllpassStage`]s split a signal into Low, Mid and High
//! bands whose plain sum reproduces the input sample for sample. Each split
//! uses the complementary pair `(x + ap(x)) / 2` (lowpass) and
//! `(x − ap(x)) / 2` (highpass); the second split runs on the first split's
//! highpass remainder.
//!
//! ```text
//!                ┌→ (x + ap₀x)/2 ───────────────────────────→ Low
//! x ─ AllpassStage(f0)
//!                └→ (x − ap₀x)/2 = r ─ AllpassStage(f1) ┬→ (r + ap₁r)/2 → Mid
//!                                                     └→ (r − ap₁r)/2 → High
//! ```
//!
//! Band slopes are a gentle 6 dB/octave; the crossover trades separation for
//! exact reconstruction.

use crate::{AllpassStage, math::apply_gain};

/// Default low split in Hz.
pub const DEFAULT_LOW_SPLIT_HZ: f32 = 500.0;

/// Default high split in Hz.
pub const DEFAULT_HIGH_SPLIT_HZ: f32 = 10000.0;

/// Perfect-reconstruction three-band splitter for one channel.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::Crossover;
///
/// let mut xover = Crossover::new(48000.0);
/// xover.set_splits(200.0, 4000.0);
///
/// let input = [0.3, -0.7, 0.1, 0.9, -0.2, 0.0, 0.5, -0.5];
/// let (mut low, mut mid, mut high) = ([0.0; 8], [0.0; 8], [0.0; 8]);
/// xover.split(&input, &mut low, &mut mid, &mut high);
///
/// for i in 0..8 {
///     assert!((low[i] + mid[i] + high[i] - input[i]).abs() < 1e-6);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Crossover {
    low_split: AllpassStage,
    high_split: AllpassStage,
}

impl Crossover {
    /// Creates a crossover at the default 500 Hz / 10 kHz splits.
    pub fn new(sample_rate: f32) -> Self {
        let mut xover = Self {
            low_split: AllpassStage::new(sample_rate),
            high_split: AllpassStage::new(sample_rate),
        };
        xover.set_splits(DEFAULT_LOW_SPLIT_HZ, DEFAULT_HIGH_SPLIT_HZ);
        xover
    }

    /// Update sample rate for both stages.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.low_split.set_sample_rate(sample_rate);
        self.high_split.set_sample_rate(sample_rate);
    }

    /// Sets both split frequencies in Hz.
    ///
    /// `high_hz` below `low_hz` is raised to `low_hz`.
    #[inline]
    pub fn set_splits(&mut self, low_hz: f32, high_hz: f32) {
        self.low_split.set_cutoff(low_hz);
        self.high_split.set_cutoff(high_hz.max(low_hz));
    }

    /// Current `(low, high)` split frequencies in Hz.
    pub fn splits(&self) -> (f32, f32) {
        (self.low_split.cutoff(), self.high_split.cutoff())
    }

    /// Splits `input` into the three band buffers, overwriting them.
    ///
    /// All four slices must have the same length.
    pub fn split(&mut self, input: &[f32], low: &mut [f32], mid: &mut [f32], high: &mut [f32]) {
        debug_assert_eq!(input.len(), low.len());
        debug_assert_eq!(input.len(), mid.len());
        debug_assert_eq!(input.len(), high.len());

        low.copy_from_slice(input);
        mid.copy_from_slice(input);
        self.low_split.process(input, low, Some(mid));
        apply_gain(low, 0.5);
        apply_gain(mid, 0.5);

        high.copy_from_slice(mid);
        self.high_split.process_in_place(mid, Some(high));
        apply_gain(mid, 0.5);
        apply_gain(high, 0.5);
    }

    /// Clears both stages' memory.
    pub fn reset(&mut self) {
        self.low_split.reset();
        self.high_split.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rms;
    use core::f32::consts::PI;

    #[cfg(not(feature = "std"))]
    use alloc::{vec, vec::Vec};

    /// Steady-state RMS of each band for a sine at `freq`.
    fn band_levels(freq: f32) -> [f32; 3] {
        let sr = 48000.0;
        let n = 9600;
        let input: Vec<f32> = (0..n)
            .map(|i| libm::sinf(2.0 * PI * freq * i as f32 / sr))
            .collect();
        let mut low = vec![0.0; n];
        let mut mid = vec![0.0; n];
        let mut high = vec![0.0; n];

        let mut xover = Crossover::new(sr);
        xover.set_splits(300.0, 6000.0);
        xover.split(&input, &mut low, &mut mid, &mut high);

        let tail = n / 2..;
        [
            rms(&low[tail.clone()]),
            rms(&mid[tail.clone()]),
            rms(&high[tail]),
        ]
    }

    #[test]
    fn test_reconstruction_across_blocks() {
        let mut xover = Crossover::new(44100.0);
        xover.set_splits(120.0, 2500.0);

        let mut seed = 0x1234_5678u32;
        for _ in 0..8 {
            let mut input = [0.0f32; 128];
            for s in &mut input {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                *s = (seed >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0;
            }
            let (mut low, mut mid, mut high) = ([0.0; 128], [0.0; 128], [0.0; 128]);
            xover.split(&input, &mut low, &mut mid, &mut high);

            for i in 0..128 {
                let sum = low[i] + mid[i] + high[i];
                assert!(
                    (sum - input[i]).abs() <= 1e-5 * input[i].abs().max(1.0),
                    "Sample {i}: {sum} != {}",
                    input[i]
                );
            }
        }
    }

    #[test]
    fn test_low_tone_lands_in_low_band() {
        let [low, mid, high] = band_levels(40.0);
        assert!(low > mid && low > high, "low={low} mid={mid} high={high}");
    }

    #[test]
    fn test_mid_tone_lands_in_mid_band() {
        let [low, mid, high] = band_levels(1300.0);
        assert!(mid > low && mid > high, "low={low} mid={mid} high={high}");
    }

    #[test]
    fn test_high_tone_lands_in_high_band() {
        let [low, mid, high] = band_levels(18000.0);
        assert!(high > low && high > mid, "low={low} mid={mid} high={high}");
    }

    #[test]
    fn test_inverted_splits_are_ordered() {
        let mut xover = Crossover::new(48000.0);
        xover.set_splits(5000.0, 1000.0);
        assert_eq!(xover.splits(), (5000.0, 5000.0));
    }
}
