//! Core Effect trait.
//!
//! [`Effect`] is the mono, per-sample and in-place block interface shared by the
//! stages in this crate. It is object-safe, but the engine holds concrete
//! types and dispatches statically.
//!
//! No method allocates; everything here is callable from an audio thread.

/// Core trait for mono audio processors.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut g = Gain { gain: 0.5 };
/// let mut buf = [1.0, -1.0];
/// g.process_block_inplace(&mut buf);
/// assert_eq!(buf, [0.5, -0.5]);
/// ```
pub trait Effect {
    /// Process a single sample, advancing internal state by one step.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate and recompute anything that depends on it.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (envelopes, delay contents, filter history)
    /// without touching parameters.
    fn reset(&mut self);

    /// Processing latency in samples. Default is 0.
    fn latency_samples(&self) -> usize {
        0
    }
}
