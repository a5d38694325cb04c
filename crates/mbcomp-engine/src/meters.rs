//! Level meters published by the audio thread once per buffer.
//!
//! Twelve readings are exposed: input RMS, output RMS and compressor gain
//! RMS for each of Low, Mid, High and Master. Band input and output levels
//! are measured after the band pre-gain and before the band post-gain. The
//! master input is measured after the master pre-gain and the master output
//! after the master post-gain. Every reading is the mean over channels.

use std::sync::atomic::{AtomicU32, Ordering};

use mbcomp_core::{Band, PerBand};

/// Which of the three per-band readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeterKind {
    /// RMS entering the compressor (linear).
    Input,
    /// RMS leaving the compressor (linear).
    Output,
    /// RMS of the applied gain (linear, 1.0 means no reduction).
    Gain,
}

impl MeterKind {
    /// All kinds, in slot order.
    pub const ALL: [MeterKind; 3] = [MeterKind::Input, MeterKind::Output, MeterKind::Gain];

    const fn slot(self, band: Band) -> usize {
        self as usize * Band::COUNT + band.index()
    }
}

const METER_SLOTS: usize = MeterKind::ALL.len() * Band::COUNT;

/// One buffer's worth of readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelReadings {
    /// Input RMS per band.
    pub input: PerBand<f32>,
    /// Output RMS per band.
    pub output: PerBand<f32>,
    /// Gain RMS per band.
    pub gain: PerBand<f32>,
}

impl LevelReadings {
    /// Readings before anything has been processed: silent levels, unity gain.
    pub const fn idle() -> Self {
        Self {
            input: PerBand::splat(0.0),
            output: PerBand::splat(0.0),
            gain: PerBand::splat(1.0),
        }
    }

    /// Reading for a band and kind.
    pub fn get(&self, band: Band, kind: MeterKind) -> f32 {
        match kind {
            MeterKind::Input => self.input[band],
            MeterKind::Output => self.output[band],
            MeterKind::Gain => self.gain[band],
        }
    }

    /// Adds another channel's readings in.
    pub(crate) fn accumulate(&mut self, other: &LevelReadings) {
        for band in Band::ALL {
            self.input[band] += other.input[band];
            self.output[band] += other.output[band];
            self.gain[band] += other.gain[band];
        }
    }

    /// Multiplies every reading by `factor`.
    pub(crate) fn scale(&mut self, factor: f32) {
        for band in Band::ALL {
            self.input[band] *= factor;
            self.output[band] *= factor;
            self.gain[band] *= factor;
        }
    }

    /// All zero, used as the starting point for a channel average.
    pub(crate) const fn zero() -> Self {
        Self {
            input: PerBand::splat(0.0),
            output: PerBand::splat(0.0),
            gain: PerBand::splat(0.0),
        }
    }
}

impl Default for LevelReadings {
    fn default() -> Self {
        Self::idle()
    }
}

/// Lock-free meter block; written by the audio thread, read anywhere.
#[derive(Debug)]
pub struct LevelMeters {
    slots: [AtomicU32; METER_SLOTS],
}

impl LevelMeters {
    /// Creates meters showing [`LevelReadings::idle`].
    pub fn new() -> Self {
        let meters = Self {
            slots: std::array::from_fn(|_| AtomicU32::new(0)),
        };
        meters.publish(&LevelReadings::idle());
        meters
    }

    /// Stores a full set of readings.
    pub fn publish(&self, readings: &LevelReadings) {
        for band in Band::ALL {
            for kind in MeterKind::ALL {
                self.slots[kind.slot(band)]
                    .store(readings.get(band, kind).to_bits(), Ordering::Release);
            }
        }
    }

    /// Reads one meter.
    #[inline]
    pub fn get(&self, band: Band, kind: MeterKind) -> f32 {
        f32::from_bits(self.slots[kind.slot(band)].load(Ordering::Acquire))
    }

    /// Reads all twelve meters.
    pub fn read(&self) -> LevelReadings {
        LevelReadings {
            input: PerBand::from_fn(|b| self.get(b, MeterKind::Input)),
            output: PerBand::from_fn(|b| self.get(b, MeterKind::Output)),
            gain: PerBand::from_fn(|b| self.get(b, MeterKind::Gain)),
        }
    }
}

impl Default for LevelMeters {
    fn default() -> Self {
        Self::new()
    }
}
