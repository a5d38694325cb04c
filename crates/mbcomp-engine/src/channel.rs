//! Per-channel processing graph: crossover, three band compressors, mix,
//! master compressor.
//!
//! # Signal Flow
//!
//! ```text
//!          ┌→ Low  → ×pre → Comp → ×post ─┐
//! Input ─→ ├→ Mid  → ×pre → Comp → ×post ─┼→ Σ (solo) → ×pre → Master Comp → ×post → Output
//!          └→ High → ×pre → Comp → ×post ─┘
//! ```

use mbcomp_core::{Band, CompressorStage, Crossover, Effect, PerBand, apply_gain, rms};

use crate::meters::LevelReadings;
use crate::params::{BandSettings, ParamSnapshot};

/// Band buffers shared by every channel of an engine.
///
/// Sized once in `prepare`; processing only takes sub-slices.
#[derive(Debug, Default)]
pub struct BandScratch {
    low: Vec<f32>,
    mid: Vec<f32>,
    high: Vec<f32>,
}

impl BandScratch {
    /// Allocates three buffers of `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            low: vec![0.0; capacity],
            mid: vec![0.0; capacity],
            high: vec![0.0; capacity],
        }
    }

    /// Samples each buffer can hold.
    pub fn capacity(&self) -> usize {
        self.low.len()
    }
}

/// Filters and compressors for one audio channel.
#[derive(Debug, Clone)]
pub struct ChannelGraph {
    crossover: Crossover,
    comps: PerBand<CompressorStage>,
}

impl ChannelGraph {
    /// Creates a graph at `sample_rate` with default settings.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            crossover: Crossover::new(sample_rate),
            comps: PerBand::from_fn(|_| CompressorStage::new(sample_rate)),
        }
    }

    /// Pushes one buffer's parameter values into the filters and compressors.
    ///
    /// A lookahead change resizes every delay line; the caller only does
    /// this between buffers.
    pub fn configure(&mut self, snapshot: &ParamSnapshot) {
        self.crossover
            .set_splits(snapshot.low_split_hz, snapshot.high_split_hz);

        for (band, comp) in self.comps.iter_mut() {
            let s: &BandSettings = &snapshot.bands[band];
            comp.set_attack_ms(s.attack_ms);
            comp.set_release_ms(s.release_ms);
            comp.set_threshold_db(s.threshold_db);
            comp.set_ratio(s.ratio);
            if comp.lookahead_ms() != snapshot.lookahead_ms {
                comp.set_lookahead_ms(snapshot.lookahead_ms);
            }
        }
    }

    /// Reference to one band's compressor.
    pub fn compressor(&self, band: Band) -> &CompressorStage {
        &self.comps[band]
    }

    /// Delay introduced by this channel, in samples.
    ///
    /// The master compressor runs after the band compressors, so their
    /// lookahead adds up.
    pub fn latency_samples(&self) -> usize {
        self.comps[Band::Low].latency_samples() + self.comps[Band::Master].latency_samples()
    }

    /// Clears filter memory, detectors, gains and delay lines.
    pub fn reset(&mut self) {
        self.crossover.reset();
        for (_, comp) in self.comps.iter_mut() {
            comp.reset();
        }
    }

    /// Processes `io` in place and returns this channel's meter readings.
    ///
    /// `io.len()` must not exceed the scratch capacity.
    pub fn process(
        &mut self,
        io: &mut [f32],
        scratch: &mut BandScratch,
        snapshot: &ParamSnapshot,
    ) -> LevelReadings {
        let n = io.len();
        debug_assert!(n <= scratch.capacity());

        let mut readings = LevelReadings::idle();
        let low = &mut scratch.low[..n];
        let mid = &mut scratch.mid[..n];
        let high = &mut scratch.high[..n];

        self.crossover.split(io, low, mid, high);

        for (band, buf) in [(Band::Low, low), (Band::Mid, mid), (Band::High, high)] {
            let settings = &snapshot.bands[band];
            apply_gain(buf, settings.pre_gain());
            readings.input[band] = rms(buf);
            self.comps[band].process_block_inplace(buf);
            readings.output[band] = rms(buf);
            readings.gain[band] = self.comps[band].gain_rms();
        }

        io.fill(0.0);
        for band in Band::SPLIT {
            if !snapshot.is_audible(band) {
                continue;
            }
            let post = snapshot.bands[band].post_gain();
            let buf = match band {
                Band::Low => &scratch.low[..n],
                Band::Mid => &scratch.mid[..n],
                _ => &scratch.high[..n],
            };
            for (out, &x) in io.iter_mut().zip(buf) {
                *out += x * post;
            }
        }

        let master = &snapshot.bands[Band::Master];
        apply_gain(io, master.pre_gain());
        readings.input[Band::Master] = rms(io);
        self.comps[Band::Master].process_block_inplace(io);
        apply_gain(io, master.post_gain());
        readings.output[Band::Master] = rms(io);
        readings.gain[Band::Master] = self.comps[Band::Master].gain_rms();

        readings
    }
}
