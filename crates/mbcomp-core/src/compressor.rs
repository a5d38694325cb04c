//! Feed-forward compressor stage with lookahead.
//!
//! One stage runs per band and one on the master bus. The detector sees the
//! undelayed input while the audio path runs through a [`DelayLine`], so the
//! gain has already moved by the time a transient reaches the output.
//!
//! # Signal Flow
//!
//! ```text
//!            ┌→ RmsDetector → dB → Gain Computer → BallisticSmoother ─┐
//! Input ─────┤                                                      × → Output
//!            └→ DelayLine (lookahead) ──────────────────────────────┘
//! ```
//!
//! # Gain Computer
//!
//! Hard knee: `G = min(0, (1 − 1/ratio) · (threshold − X))`, where `X` is the
//! detector level in dB. The smoothed gain approaches `10^(G/20)` using the
//! attack coefficient when the target is below the current gain and the
//! release coefficient otherwise.
//!
//! # Parameters
//!
//! | Parameter | Unit | Notes |
//! |-----------|------|-------|
//! | Threshold | dB | Level where compression begins |
//! | Ratio | n:1 | Values below 1 are raised to 1 |
//! | Attack | ms | 10–90 % rise time of gain reduction |
//! | Release | ms | 10–90 % rise time of recovery |
//! | Lookahead | ms | Audio-path delay; reported as latency |

use crate::{
    BallisticSmoother, DelayLine, Effect, RmsDetector, db_to_linear, linear_to_db, ms_to_samples,
};

/// Longest lookahead storage is reserved for, in milliseconds.
pub const MAX_LOOKAHEAD_MS: f32 = 50.0;

/// Compressor with an RMS-style detector, smoothed gain and lookahead.
///
/// The stage also accumulates the mean square of the applied gain so callers
/// can read a per-block gain meter with [`gain_rms`](Self::gain_rms).
///
/// # Example
///
/// ```rust
/// use mbcomp_core::{CompressorStage, Effect};
///
/// let mut comp = CompressorStage::new(48000.0);
/// comp.set_threshold_db(-20.0);
/// comp.set_ratio(4.0);
/// comp.set_lookahead_ms(5.0);
///
/// let mut block = [0.5f32; 256];
/// comp.process_block_inplace(&mut block);
///
/// assert_eq!(comp.latency_samples(), 240);
/// assert!(comp.gain_rms() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CompressorStage {
    detector: RmsDetector,
    gain: BallisticSmoother,
    delay: DelayLine<f32>,
    threshold_db: f32,
    ratio: f32,
    /// `1 − 1/ratio`, cached.
    slope: f32,
    lookahead_ms: f32,
    sample_rate: f32,
    gain_sq_sum: f32,
    gain_count: usize,
}

impl CompressorStage {
    /// Creates a stage with storage reserved for [`MAX_LOOKAHEAD_MS`].
    ///
    /// Defaults: threshold −10 dB, ratio 1.5, attack 1 ms, release 50 ms,
    /// no lookahead.
    pub fn new(sample_rate: f32) -> Self {
        let ratio = 1.5;
        Self {
            detector: RmsDetector::new(sample_rate),
            gain: BallisticSmoother::new(1.0, sample_rate),
            delay: reserve_delay(sample_rate, 0),
            threshold_db: -10.0,
            ratio,
            slope: 1.0 - 1.0 / ratio,
            lookahead_ms: 0.0,
            sample_rate,
            gain_sq_sum: 0.0,
            gain_count: 0,
        }
    }

    /// Set threshold in dB.
    #[inline]
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.threshold_db = threshold_db;
    }

    /// Set compression ratio (n:1). Values below 1 are raised to 1.
    #[inline]
    pub fn set_ratio(&mut self, ratio: f32) {
        let ratio = ratio.max(1.0);
        if ratio != self.ratio {
            self.ratio = ratio;
            self.slope = 1.0 - 1.0 / ratio;
        }
    }

    /// Set attack time in milliseconds.
    #[inline]
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.gain.set_attack_ms(attack_ms);
    }

    /// Set release time in milliseconds.
    #[inline]
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.gain.set_release_ms(release_ms);
    }

    /// Set lookahead in milliseconds and resize the audio delay.
    ///
    /// Call between blocks. Within [`MAX_LOOKAHEAD_MS`] this does not
    /// allocate; existing delayed audio is kept (newest samples first).
    pub fn set_lookahead_ms(&mut self, lookahead_ms: f32) {
        self.lookahead_ms = lookahead_ms.max(0.0);
        self.delay.resize(ms_to_samples(self.lookahead_ms, self.sample_rate));
    }

    /// Threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Ratio (n:1).
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.gain.attack_ms()
    }

    /// Release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.gain.release_ms()
    }

    /// Lookahead in milliseconds.
    pub fn lookahead_ms(&self) -> f32 {
        self.lookahead_ms
    }

    /// Current smoothed linear gain, in (0, 1].
    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain.get()
    }

    /// Current smoothed gain in dB (always non-positive).
    pub fn gain_reduction_db(&self) -> f32 {
        linear_to_db(self.gain.get())
    }

    /// Current detector level (linear).
    pub fn envelope(&self) -> f32 {
        self.detector.level()
    }

    /// RMS of the gain applied since the last block started.
    ///
    /// [`process_block_inplace`](Effect::process_block_inplace) restarts the
    /// accumulation; returns 1.0 before any sample has been processed.
    pub fn gain_rms(&self) -> f32 {
        if self.gain_count == 0 {
            return 1.0;
        }
        libm::sqrtf(self.gain_sq_sum / self.gain_count as f32)
    }

    /// Restarts the gain meter accumulation.
    pub fn reset_gain_meter(&mut self) {
        self.gain_sq_sum = 0.0;
        self.gain_count = 0;
    }

    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let level = self.detector.process(input);
        let level_db = linear_to_db(level);
        let gain_db = (self.slope * (self.threshold_db - level_db)).min(0.0);
        self.gain.set_target(db_to_linear(gain_db));
        let g = self.gain.advance();

        self.gain_sq_sum += g * g;
        self.gain_count += 1;

        g * self.delay.push(input)
    }
}

impl Effect for CompressorStage {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.tick(input)
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.reset_gain_meter();
        for sample in buffer.iter_mut() {
            *sample = self.tick(*sample);
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.detector.set_sample_rate(sample_rate);
        self.gain.set_sample_rate(sample_rate);

        let lookahead = ms_to_samples(self.lookahead_ms, sample_rate);
        self.delay = reserve_delay(sample_rate, lookahead);
    }

    fn reset(&mut self) {
        self.detector.reset();
        self.gain.set_immediate(1.0);
        self.delay.clear();
        self.reset_gain_meter();
    }

    fn latency_samples(&self) -> usize {
        self.delay.len()
    }
}

/// Delay line holding `MAX_LOOKAHEAD_MS` of storage, resized to `lookahead`.
fn reserve_delay(sample_rate: f32, lookahead: usize) -> DelayLine<f32> {
    let reserve = ms_to_samples(MAX_LOOKAHEAD_MS, sample_rate).max(lookahead);
    let mut delay = DelayLine::with_max_capacity(reserve);
    delay.resize(lookahead);

    #[cfg(feature = "tracing")]
    tracing::debug!(sample_rate, reserve, lookahead, "compressor delay reserved");

    delay
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::vec::Vec;

    fn settle(comp: &mut CompressorStage, level: f32, samples: usize) -> f32 {
        let mut out = 0.0;
        for _ in 0..samples {
            out = comp.process(level);
        }
        out
    }

    #[test]
    fn test_initial_state() {
        let comp = CompressorStage::new(48000.0);
        assert_eq!(comp.gain(), 1.0);
        assert_eq!(comp.envelope(), 0.0);
        assert_eq!(comp.latency_samples(), 0);
        assert_eq!(comp.gain_rms(), 1.0);
    }

    #[test]
    fn test_below_threshold_is_unity() {
        let mut comp = CompressorStage::new(48000.0);
        comp.set_threshold_db(-10.0);
        comp.set_ratio(8.0);
        // -20 dBFS DC
        let out = settle(&mut comp, 0.1, 48000);
        assert!((comp.gain() - 1.0).abs() < 1e-6);
        assert!((out - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_steady_state_gain_matches_curve() {
        let mut comp = CompressorStage::new(48000.0);
        comp.set_threshold_db(-20.0);
        comp.set_ratio(4.0);
        comp.set_attack_ms(1.0);
        comp.set_release_ms(10.0);

        // 0 dBFS DC, 20 dB over → 15 dB of reduction
        settle(&mut comp, 1.0, 48000);
        let expected = db_to_linear(-15.0);
        assert!(
            (comp.gain() - expected).abs() < 1e-3,
            "Gain {} should be ~{expected}",
            comp.gain()
        );
        assert!((comp.gain_reduction_db() + 15.0).abs() < 0.05);
    }

    #[test]
    fn test_ratio_one_never_compresses() {
        let mut comp = CompressorStage::new(48000.0);
        comp.set_threshold_db(-80.0);
        comp.set_ratio(1.0);
        settle(&mut comp, 1.0, 4800);
        assert_eq!(comp.gain(), 1.0);

        // Silence with ratio 1 must not produce NaN
        let out = settle(&mut comp, 0.0, 100);
        assert!(out.is_finite());
    }

    #[test]
    fn test_ratio_below_one_is_raised() {
        let mut comp = CompressorStage::new(48000.0);
        comp.set_ratio(0.25);
        assert_eq!(comp.ratio(), 1.0);
    }

    #[test]
    fn test_lookahead_delays_audio() {
        let sr = 48000.0;
        let mut comp = CompressorStage::new(sr);
        comp.set_threshold_db(0.0);
        comp.set_ratio(1.0);
        comp.set_lookahead_ms(1.0);
        assert_eq!(comp.latency_samples(), 48);

        let mut block = [0.0f32; 64];
        block[0] = 0.5;
        comp.process_block_inplace(&mut block);

        for (i, &s) in block.iter().enumerate() {
            if i == 48 {
                assert!((s - 0.5).abs() < 1e-6);
            } else {
                assert_eq!(s, 0.0, "Unexpected output at {i}");
            }
        }
    }

    #[test]
    fn test_lookahead_resize_within_reserve_keeps_capacity() {
        let mut comp = CompressorStage::new(44100.0);
        let cap = comp.delay.capacity();
        for ms in [10.0, 50.0, 0.0, 25.0] {
            comp.set_lookahead_ms(ms);
            assert_eq!(comp.delay.capacity(), cap);
        }
        assert_eq!(comp.latency_samples(), ms_to_samples(25.0, 44100.0));
    }

    #[test]
    fn test_sample_rate_change_rescales_lookahead() {
        let mut comp = CompressorStage::new(44100.0);
        comp.set_lookahead_ms(10.0);
        assert_eq!(comp.latency_samples(), 441);
        comp.set_sample_rate(96000.0);
        assert_eq!(comp.latency_samples(), 960);
    }

    #[test]
    fn test_gain_rms_tracks_block() {
        let mut comp = CompressorStage::new(48000.0);
        comp.set_threshold_db(-20.0);
        comp.set_ratio(10.0);

        let mut loud = [1.0f32; 4800];
        comp.process_block_inplace(&mut loud);
        let loud_rms = comp.gain_rms();
        assert!(loud_rms < 0.9, "Gain meter should show reduction, got {loud_rms}");

        comp.reset();
        let mut quiet = [0.01f32; 256];
        comp.process_block_inplace(&mut quiet);
        assert!((comp.gain_rms() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut comp = CompressorStage::new(48000.0);
        comp.set_threshold_db(-30.0);
        comp.set_ratio(4.0);
        comp.set_lookahead_ms(2.0);
        settle(&mut comp, 1.0, 2000);

        comp.reset();
        assert_eq!(comp.gain(), 1.0);
        assert_eq!(comp.envelope(), 0.0);
        assert_eq!(comp.process(0.0), 0.0);
    }

    #[test]
    fn test_higher_ratio_reduces_more() {
        let outputs: Vec<f32> = [2.0, 4.0, 10.0]
            .iter()
            .map(|&ratio| {
                let mut comp = CompressorStage::new(48000.0);
                comp.set_threshold_db(-24.0);
                comp.set_ratio(ratio);
                settle(&mut comp, 0.8, 24000)
            })
            .collect();

        assert!(outputs[0] > outputs[1]);
        assert!(outputs[1] > outputs[2]);
    }
}
