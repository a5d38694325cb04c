//! mbcomp Engine - real-time three-band compressor
//!
//! Wires the primitives from `mbcomp-core` into a multichannel processor:
//!
//! - [`Engine`] - Lifecycle (`prepare`/`release`/`reset`) and the per-buffer entry point
//! - [`EngineParams`] - Lock-free parameter table shared with control threads
//! - [`LevelMeters`] - Twelve lock-free meter readings published per buffer
//! - [`ChannelGraph`] - Crossover, band compressors, mix and master compressor for one channel
//!
//! ## Parameter changes
//!
//! The audio thread takes a [`ParamSnapshot`] at the start of every buffer.
//! Continuous controls apply immediately; a lookahead change resizes every
//! delay line before the first sample of that buffer, within storage
//! reserved at `prepare`.
//!
//! ## Example
//!
//! ```rust
//! use mbcomp_core::Band;
//! use mbcomp_engine::{Engine, EngineConfig, MeterKind};
//!
//! let mut engine = Engine::new();
//! engine.prepare(EngineConfig { sample_rate: 44100.0, channels: 1, max_block_size: 128 })?;
//! engine.params().set_solo(Some(Band::Low));
//!
//! let mut mono = vec![0.0f32; 128];
//! engine.process(&mut [&mut mono[..]]);
//! assert_eq!(engine.meters().get(Band::Low, MeterKind::Gain), 1.0);
//! # Ok::<(), mbcomp_engine::EngineError>(())
//! ```

pub mod channel;
pub mod engine;
pub mod error;
pub mod meters;
pub mod params;

pub use channel::{BandScratch, ChannelGraph};
pub use engine::{Engine, EngineConfig};
pub use error::EngineError;
pub use meters::{LevelMeters, LevelReadings, MeterKind};
pub use params::{
    BandParam, BandSettings, EngineParams, GlobalParam, PARAM_COUNT, ParamKey, ParamSnapshot,
};
