//! mbcomp Core - DSP primitives for a three-band compressor
//!
//! This crate provides the building blocks of the multiband engine, designed
//! for real-time processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe mono processing trait
//!
//! ## Band Splitting
//!
//! - [`AllpassStage`] - First-order allpass accumulating into complementary outputs
//! - [`Crossover`] - Two cascaded stages producing Low/Mid/High that sum to the input
//!
//! ## Dynamics
//!
//! - [`RmsDetector`] - Asymmetric 5 ms / 130 ms level detector
//! - [`BallisticSmoother`] - Attack/release gain smoothing
//! - [`CompressorStage`] - Hard-knee compressor with lookahead and a gain meter
//!
//! ## Delay
//!
//! - [`DelayLine`] - Resizable ring buffer that keeps its newest samples on resize
//!
//! ## Bands and Parameters
//!
//! - [`Band`], [`PerBand`] - Band identifiers and per-band storage
//! - [`ParamDescriptor`], [`ParamUnit`], [`ParamId`] - Parameter metadata
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`rms`], [`ms_to_samples`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for delay storage).
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mbcomp-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use mbcomp_core::{CompressorStage, Crossover, Effect};
//!
//! let mut xover = Crossover::new(48000.0);
//! let mut low_comp = CompressorStage::new(48000.0);
//! low_comp.set_threshold_db(-18.0);
//! low_comp.set_ratio(3.0);
//!
//! let input = [0.25f32; 64];
//! let (mut low, mut mid, mut high) = ([0.0; 64], [0.0; 64], [0.0; 64]);
//! xover.split(&input, &mut low, &mut mid, &mut high);
//! low_comp.process_block_inplace(&mut low);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Borrowed buffers**: Stages receive slices per call and keep no aliases

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod band;
pub mod compressor;
pub mod crossover;
pub mod delay;
pub mod effect;
pub mod envelope;
pub mod math;
pub mod param_info;
pub mod smoother;

// Re-export main types at crate root
pub use allpass::AllpassStage;
pub use band::{Band, PerBand};
pub use compressor::{CompressorStage, MAX_LOOKAHEAD_MS};
pub use crossover::{Crossover, DEFAULT_HIGH_SPLIT_HZ, DEFAULT_LOW_SPLIT_HZ};
pub use delay::DelayLine;
pub use effect::Effect;
pub use envelope::{DETECTOR_ATTACK_S, DETECTOR_RELEASE_S, RmsDetector};
pub use math::{
    LEVEL_FLOOR, apply_gain, db_to_linear, flush_denormal, linear_to_db, ms_to_samples,
    rise_time_coeff, rms, time_constant_coeff,
};
pub use param_info::{ParamDescriptor, ParamId, ParamUnit};
pub use smoother::BallisticSmoother;
