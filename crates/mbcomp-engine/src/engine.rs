//! Engine lifecycle and the per-buffer entry point.

use std::sync::Arc;

use mbcomp_core::{Band, ms_to_samples};

use crate::channel::{BandScratch, ChannelGraph};
use crate::error::EngineError;
use crate::meters::{LevelMeters, LevelReadings};
use crate::params::EngineParams;

/// Session configuration supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Number of audio channels.
    pub channels: usize,
    /// Longest buffer passed in one piece; longer ones are chunked.
    pub max_block_size: usize,
}

impl EngineConfig {
    /// Stereo at `sample_rate` with 512-sample blocks.
    pub fn stereo(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            channels: 2,
            max_block_size: 512,
        }
    }

    /// Checks every field.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }
        if self.channels == 0 {
            return Err(EngineError::InvalidChannelCount(self.channels));
        }
        if self.max_block_size == 0 {
            return Err(EngineError::InvalidBlockSize(self.max_block_size));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Session {
    config: EngineConfig,
    graphs: Vec<ChannelGraph>,
    scratch: BandScratch,
    applied_lookahead_ms: f32,
}

/// Three-band compressor for a fixed number of channels.
///
/// Parameters and meters live behind `Arc`s so a control thread can edit
/// and display them while the audio thread owns the engine.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::Band;
/// use mbcomp_engine::{BandParam, Engine, EngineConfig, ParamKey};
///
/// let mut engine = Engine::new();
/// engine.prepare(EngineConfig::stereo(48000.0)).unwrap();
///
/// let params = engine.params();
/// params.set(ParamKey::Band(Band::Low, BandParam::Ratio), 4.0);
///
/// let mut left = vec![0.1f32; 256];
/// let mut right = vec![0.1f32; 256];
/// engine.process(&mut [&mut left[..], &mut right[..]]);
///
/// let readings = engine.meters().read();
/// assert!(readings.input[Band::Master] > 0.0);
/// ```
#[derive(Debug)]
pub struct Engine {
    params: Arc<EngineParams>,
    meters: Arc<LevelMeters>,
    session: Option<Session>,
}

impl Engine {
    /// Creates an unprepared engine with default parameters.
    pub fn new() -> Self {
        Self::with_params(Arc::new(EngineParams::new()))
    }

    /// Creates an unprepared engine reading from an existing parameter table.
    pub fn with_params(params: Arc<EngineParams>) -> Self {
        Self {
            params,
            meters: Arc::new(LevelMeters::new()),
            session: None,
        }
    }

    /// Shared parameter table.
    pub fn params(&self) -> Arc<EngineParams> {
        Arc::clone(&self.params)
    }

    /// Shared meter block.
    pub fn meters(&self) -> Arc<LevelMeters> {
        Arc::clone(&self.meters)
    }

    /// Allocates per-channel state for `config`.
    ///
    /// Replaces any previous session; filter and compressor state start
    /// from silence.
    pub fn prepare(&mut self, config: EngineConfig) -> Result<(), EngineError> {
        config.validate()?;

        let snapshot = self.params.snapshot();
        let graphs = (0..config.channels)
            .map(|_| {
                let mut graph = ChannelGraph::new(config.sample_rate);
                graph.configure(&snapshot);
                graph
            })
            .collect();

        self.session = Some(Session {
            config,
            graphs,
            scratch: BandScratch::new(config.max_block_size),
            applied_lookahead_ms: snapshot.lookahead_ms,
        });
        self.meters.publish(&LevelReadings::idle());

        tracing::info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            max_block_size = config.max_block_size,
            latency = self.latency_samples(),
            "engine prepared"
        );
        Ok(())
    }

    /// Frees per-channel state. `process` passes audio through until the
    /// next `prepare`.
    pub fn release(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("engine released");
        }
    }

    /// Whether `prepare` has succeeded since the last `release`.
    pub fn is_prepared(&self) -> bool {
        self.session.is_some()
    }

    /// Active configuration, if prepared.
    pub fn config(&self) -> Option<EngineConfig> {
        self.session.as_ref().map(|s| s.config)
    }

    /// Clears all filter, detector, gain and delay state.
    pub fn reset(&mut self) {
        if let Some(session) = &mut self.session {
            for graph in &mut session.graphs {
                graph.reset();
            }
        }
        self.meters.publish(&LevelReadings::idle());
        tracing::debug!("engine reset");
    }

    /// Output delay relative to input, in samples.
    ///
    /// Band and master compressors both delay by the lookahead, so this is
    /// twice the lookahead. Reflects the value applied to the audio path;
    /// a pending lookahead change shows up after the next buffer starts.
    pub fn latency_samples(&self) -> usize {
        match &self.session {
            Some(s) => 2 * ms_to_samples(s.applied_lookahead_ms, s.config.sample_rate),
            None => 0,
        }
    }

    /// Processes one buffer in place, one slice per channel.
    ///
    /// Parameters are read once at the start. Buffers longer than the
    /// configured block size are processed in chunks and the meters show the
    /// last chunk. Extra channels beyond the configured count are left
    /// untouched; mismatched lengths are truncated to the shortest.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) {
        let Some(session) = &mut self.session else {
            return;
        };
        debug_assert!(
            channels.len() <= session.graphs.len(),
            "more channels than configured"
        );
        debug_assert!(
            channels.windows(2).all(|w| w[0].len() == w[1].len()),
            "channel lengths differ"
        );

        let active = channels.len().min(session.graphs.len());
        if active == 0 {
            return;
        }
        let len = channels[..active]
            .iter()
            .map(|c| c.len())
            .min()
            .unwrap_or(0);

        let snapshot = self.params.snapshot();
        session.applied_lookahead_ms = snapshot.lookahead_ms;
        for graph in &mut session.graphs {
            graph.configure(&snapshot);
        }

        let block = session.config.max_block_size;
        let mut start = 0;
        let mut readings = LevelReadings::idle();
        while start < len {
            let end = (start + block).min(len);
            readings = LevelReadings::zero();
            for (graph, channel) in session.graphs.iter_mut().zip(channels.iter_mut()) {
                let r = graph.process(&mut channel[start..end], &mut session.scratch, &snapshot);
                readings.accumulate(&r);
            }
            start = end;
        }

        if len > 0 {
            readings.scale(1.0 / active as f32);
            self.meters.publish(&readings);
        }
    }

    /// Compressor gain currently applied on the first channel, per band.
    pub fn gain_reduction_db(&self, band: Band) -> f32 {
        self.session
            .as_ref()
            .and_then(|s| s.graphs.first())
            .map_or(0.0, |g| g.compressor(band).gain_reduction_db())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
