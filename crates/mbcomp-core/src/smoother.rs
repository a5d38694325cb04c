//! Attack/release gain smoothing.
//!
//! [`BallisticSmoother`] is a one-pole follower with two coefficients: one
//! used while the value is falling toward its target (attack, gain being
//! pulled down) and one while it is rising (release, gain recovering).
//! Times are specified as 10–90 % rise times, so a 10 ms attack reaches 90 %
//! of a step in 10 ms.
//!
//! ```text
//! coeff = 1 − e^(−2.2 / (fs · T))
//! y[n]  = y[n−1] + coeff · (target − y[n−1])
//! ```

use crate::math::rise_time_coeff;

/// Asymmetric one-pole smoother for gain values.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::BallisticSmoother;
///
/// let mut gain = BallisticSmoother::new(1.0, 48000.0);
/// gain.set_attack_ms(1.0);
/// gain.set_release_ms(100.0);
///
/// gain.set_target(0.5);
/// for _ in 0..480 {
///     gain.advance();
/// }
/// assert!((gain.get() - 0.5).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct BallisticSmoother {
    current: f32,
    target: f32,
    attack_coeff: f32,
    release_coeff: f32,
    attack_ms: f32,
    release_ms: f32,
    sample_rate: f32,
}

impl BallisticSmoother {
    /// Create a smoother resting at `initial` with 1 ms attack and 50 ms release.
    pub fn new(initial: f32, sample_rate: f32) -> Self {
        let mut smoother = Self {
            current: initial,
            target: initial,
            attack_coeff: 1.0,
            release_coeff: 1.0,
            attack_ms: 1.0,
            release_ms: 50.0,
            sample_rate,
        };
        smoother.recalculate_coeffs();
        smoother
    }

    /// Set the attack (falling) time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        if attack_ms != self.attack_ms {
            self.attack_ms = attack_ms;
            self.attack_coeff = rise_time_coeff(attack_ms, self.sample_rate);
        }
    }

    /// Set the release (rising) time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        if release_ms != self.release_ms {
            self.release_ms = release_ms;
            self.release_coeff = rise_time_coeff(release_ms, self.sample_rate);
        }
    }

    /// Attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Update sample rate and recalculate both coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeffs();
    }

    /// Set the value to move toward.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and snap to it.
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Advance one sample and return the new value.
    ///
    /// A target below the current value uses the attack coefficient, anything
    /// else uses release.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let coeff = if self.target < self.current {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.current += coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Current target.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    fn recalculate_coeffs(&mut self) {
        self.attack_coeff = rise_time_coeff(self.attack_ms, self.sample_rate);
        self.release_coeff = rise_time_coeff(self.release_ms, self.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_reaches_ninety_percent_on_time() {
        let sr = 48000.0;
        let mut s = BallisticSmoother::new(1.0, sr);
        s.set_attack_ms(10.0);
        s.set_target(0.0);

        // 10 ms = 480 samples
        for _ in 0..480 {
            s.advance();
        }
        assert!(
            (s.get() - 0.1).abs() < 0.02,
            "Expected ~90 % of the step after the attack time, got {}",
            s.get()
        );
    }

    #[test]
    fn test_release_slower_than_attack() {
        let sr = 48000.0;
        let mut s = BallisticSmoother::new(1.0, sr);
        s.set_attack_ms(1.0);
        s.set_release_ms(200.0);

        s.set_target(0.5);
        for _ in 0..480 {
            s.advance();
        }
        let after_attack = s.get();
        assert!((after_attack - 0.5).abs() < 0.001);

        s.set_target(1.0);
        for _ in 0..480 {
            s.advance();
        }
        assert!(s.get() < 0.7, "Release should still be recovering, got {}", s.get());
    }

    #[test]
    fn test_set_immediate() {
        let mut s = BallisticSmoother::new(1.0, 44100.0);
        s.set_immediate(0.25);
        assert_eq!(s.get(), 0.25);
        assert_eq!(s.advance(), 0.25);
    }

    #[test]
    fn test_sample_rate_change_keeps_times() {
        let mut s = BallisticSmoother::new(1.0, 44100.0);
        s.set_attack_ms(5.0);
        s.set_sample_rate(96000.0);
        assert_eq!(s.attack_ms(), 5.0);
        s.set_target(0.0);
        // 5 ms at 96 kHz
        for _ in 0..480 {
            s.advance();
        }
        assert!((s.get() - 0.1).abs() < 0.02);
    }
}
