//! Error types for engine configuration.

use thiserror::Error;

/// Errors returned by [`Engine::prepare`](crate::Engine::prepare).
///
/// Processing itself never fails; only configuration is validated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Sample rate was zero, negative, or not finite.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Channel count was zero.
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(usize),

    /// Maximum block size was zero.
    #[error("invalid block size: {0}")]
    InvalidBlockSize(usize),
}
