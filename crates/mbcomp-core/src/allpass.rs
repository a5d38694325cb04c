//! First-order allpass stage used as the building block of the crossover.
//!
//! The stage has a flat magnitude response and a phase that rotates from 0° at
//! DC to −180° at Nyquist, passing −90° at the cutoff. Adding the filtered
//! signal to the dry signal cancels everything above the cutoff; subtracting it
//! cancels everything below. That complementary pair is how
//! [`Crossover`](crate::Crossover) splits one signal into bands that sum back
//! to the input.
//!
//! # Transfer Function
//!
//! ```text
//!         c + z^-1
//! H(z) = ----------        c = (tan(π·fc/fs) − 1) / (tan(π·fc/fs) + 1)
//!        1 + c·z^-1
//! ```
//!
//! Difference equation: `y[n] = −c·y[n−1] + c·x[n] + x[n−1]`.

use core::f32::consts::PI;

use libm::tanf;

use crate::flush_denormal;

/// Cutoff is kept below this fraction of the sample rate so `tan` stays finite.
const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Lowest cutoff accepted, in Hz.
const MIN_CUTOFF_HZ: f32 = 1.0;

/// Single first-order recursive allpass.
///
/// [`process`](Self::process) *accumulates*: the filtered signal is added to
/// `out` and, when given, subtracted from `neg`. Seed both accumulators with
/// the dry signal to obtain `dry + ap(dry)` and `dry − ap(dry)` in one pass.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::AllpassStage;
///
/// let mut stage = AllpassStage::new(48000.0);
/// stage.set_cutoff(1000.0);
///
/// let input = [1.0, 0.0, 0.0, 0.0];
/// let mut low = input;
/// let mut high = input;
/// stage.process(&input, &mut low, Some(&mut high));
///
/// // low + high == 2 * input, sample by sample
/// for i in 0..4 {
///     assert!((low[i] + high[i] - 2.0 * input[i]).abs() < 1e-6);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AllpassStage {
    coeff: f32,
    cutoff_hz: f32,
    sample_rate: f32,
    prev_input: f32,
    prev_output: f32,
}

impl AllpassStage {
    /// Creates a stage at 1 kHz for the given sample rate.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `sample_rate` is not positive.
    pub fn new(sample_rate: f32) -> Self {
        let mut stage = Self {
            coeff: 0.0,
            cutoff_hz: 1000.0,
            sample_rate,
            prev_input: 0.0,
            prev_output: 0.0,
        };
        stage.set_sample_rate(sample_rate);
        stage
    }

    /// Sets the sample rate and recomputes the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Sets the cutoff frequency in Hz.
    ///
    /// Cheap enough to call once per buffer. The filter state is kept, so a
    /// cutoff change produces at most a one-sample transient.
    #[inline]
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if cutoff_hz != self.cutoff_hz {
            self.cutoff_hz = cutoff_hz;
            self.recalculate_coeff();
        }
    }

    /// Current cutoff in Hz, as last requested.
    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    /// Current filter coefficient `c`.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Advances the filter by one sample and returns the allpass output.
    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        let output = flush_denormal(-self.coeff * self.prev_output + self.coeff * input + self.prev_input);
        self.prev_input = input;
        self.prev_output = output;
        output
    }

    /// Filters `input`, adding the result into `out` and subtracting it from
    /// `neg` when present.
    ///
    /// All slices must have the same length. The accumulators are not cleared.
    pub fn process(&mut self, input: &[f32], out: &mut [f32], neg: Option<&mut [f32]>) {
        debug_assert_eq!(input.len(), out.len());
        match neg {
            Some(neg) => {
                debug_assert_eq!(input.len(), neg.len());
                for ((&x, o), n) in input.iter().zip(out.iter_mut()).zip(neg.iter_mut()) {
                    let y = self.tick(x);
                    *o += y;
                    *n -= y;
                }
            }
            None => {
                for (&x, o) in input.iter().zip(out.iter_mut()) {
                    *o += self.tick(x);
                }
            }
        }
    }

    /// Same as [`process`](Self::process) with `io` acting as both the input
    /// and the positive accumulator.
    ///
    /// Each sample is read before anything is added to it, so
    /// `io[i] = io[i] + ap(io)[i]`.
    pub fn process_in_place(&mut self, io: &mut [f32], neg: Option<&mut [f32]>) {
        match neg {
            Some(neg) => {
                debug_assert_eq!(io.len(), neg.len());
                for (s, n) in io.iter_mut().zip(neg.iter_mut()) {
                    let y = self.tick(*s);
                    *s += y;
                    *n -= y;
                }
            }
            None => {
                for s in io.iter_mut() {
                    *s += self.tick(*s);
                }
            }
        }
    }

    /// Clears the one-sample memory.
    pub fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }

    fn recalculate_coeff(&mut self) {
        if self.sample_rate <= 0.0 {
            self.coeff = 0.0;
            return;
        }
        let fc = self
            .cutoff_hz
            .clamp(MIN_CUTOFF_HZ, self.sample_rate * MAX_CUTOFF_RATIO);
        let t = tanf(PI * fc / self.sample_rate);
        self.coeff = (t - 1.0) / (t + 1.0);
    }
}
