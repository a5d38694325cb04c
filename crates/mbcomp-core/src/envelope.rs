//! RMS-style envelope detector for the compressor side chain.
//!
//! The detector tracks the rectified input with a one-pole smoother whose
//! coefficient depends on direction: a short time constant while the signal
//! rises and a long one while it falls. The constants are fixed at 5 ms and
//! 130 ms, matching a classic RMS meter ballistic rather than the user-facing
//! attack and release (those shape the gain, not the detector).

use crate::math::time_constant_coeff;

/// Detector rise time constant in seconds.
pub const DETECTOR_ATTACK_S: f32 = 0.005;

/// Detector fall time constant in seconds.
pub const DETECTOR_RELEASE_S: f32 = 0.130;

/// Asymmetric one-pole level detector.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::RmsDetector;
///
/// let mut det = RmsDetector::new(48000.0);
/// let mut level = 0.0;
/// for _ in 0..4800 {
///     level = det.process(-0.5);
/// }
/// assert!((level - 0.5).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct RmsDetector {
    level: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
}

impl RmsDetector {
    /// Creates a detector at rest (level 0).
    pub fn new(sample_rate: f32) -> Self {
        let mut det = Self {
            level: 0.0,
            attack_coeff: 1.0,
            release_coeff: 1.0,
            sample_rate,
        };
        det.recalculate_coefficients();
        det
    }

    /// Update sample rate and recalculate coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Feeds one sample and returns the updated level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let x = input.abs();
        let coeff = if x > self.level {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.level += coeff * (x - self.level);
        self.level
    }

    /// Current level without processing new input.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Reset the level to zero.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = time_constant_coeff(DETECTOR_ATTACK_S, self.sample_rate);
        self.release_coeff = time_constant_coeff(DETECTOR_RELEASE_S, self.sample_rate);
    }
}

impl Default for RmsDetector {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
