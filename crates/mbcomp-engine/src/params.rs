//! Lock-free parameter store shared between the control and audio threads.
//!
//! Every parameter lives in an `AtomicU32` holding the bit pattern of an
//! `f32`. The control side writes with [`EngineParams::set`] (values are
//! clamped to their descriptor range there, never on the audio thread), and
//! the audio thread reads everything once per buffer with
//! [`EngineParams::snapshot`]. Individual loads are independent, so a buffer
//! may see a mix of old and new values while a preset is being applied; that
//! is acceptable for continuous controls.
//!
//! # Parameter Table
//!
//! | Key | Band | Unit | Min | Max | Default |
//! |-----|------|------|-----|-----|---------|
//! | `at<Band>` | each | ms | 0.16 | 2600 | 1 |
//! | `rt<Band>` | each | ms | 0.16 | 2600 | 50 |
//! | `CT<Band>` | each | dB | −80 | 0 | −10 |
//! | `CR<Band>` | each | :1 | 1 | 60 | 1.5 |
//! | `pre<Band>` | each | dB | −20 | 40 | 0 |
//! | `post<Band>` | each | dB | 0 | 40 | 0 |
//! | `la` | global | ms | 0 | 50 | 10 |
//! | `f0` | global | Hz | 30 | 15000 | 500 |
//! | `f1` | global | Hz | 30 | 15000 | 10000 |
//!
//! `<Band>` is one of `Low`, `Mid`, `High`, `Master`.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use mbcomp_core::{Band, MAX_LOOKAHEAD_MS, ParamDescriptor, ParamId, PerBand, db_to_linear};

/// Per-band compressor control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandParam {
    /// Attack time (ms).
    Attack,
    /// Release time (ms).
    Release,
    /// Threshold (dB).
    Threshold,
    /// Ratio (n:1).
    Ratio,
    /// Gain before the compressor (dB).
    PreGain,
    /// Gain after the compressor (dB).
    PostGain,
}

impl BandParam {
    /// All band parameters, in table order.
    pub const ALL: [BandParam; 6] = [
        BandParam::Attack,
        BandParam::Release,
        BandParam::Threshold,
        BandParam::Ratio,
        BandParam::PreGain,
        BandParam::PostGain,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Control shared by all bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalParam {
    /// Lookahead (ms), used by every compressor including the master.
    Lookahead,
    /// Low/Mid split (Hz).
    LowSplit,
    /// Mid/High split (Hz).
    HighSplit,
}

impl GlobalParam {
    /// All global parameters, in table order.
    pub const ALL: [GlobalParam; 3] = [
        GlobalParam::Lookahead,
        GlobalParam::LowSplit,
        GlobalParam::HighSplit,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

const BAND_PARAM_COUNT: usize = BandParam::ALL.len();
const BAND_BLOCK: usize = Band::COUNT * BAND_PARAM_COUNT;

/// Total number of parameters.
pub const PARAM_COUNT: usize = BAND_BLOCK + GlobalParam::ALL.len();

const STATE_KEYS: [&str; PARAM_COUNT] = [
    "atLow", "rtLow", "CTLow", "CRLow", "preLow", "postLow", //
    "atMid", "rtMid", "CTMid", "CRMid", "preMid", "postMid", //
    "atHigh", "rtHigh", "CTHigh", "CRHigh", "preHigh", "postHigh", //
    "atMaster", "rtMaster", "CTMaster", "CRMaster", "preMaster", "postMaster", //
    "la", "f0", "f1",
];

const NAMES: [&str; PARAM_COUNT] = [
    "Low Attack", "Low Release", "Low Threshold", "Low Ratio", "Low Pre-Gain", "Low Post-Gain",
    "Mid Attack", "Mid Release", "Mid Threshold", "Mid Ratio", "Mid Pre-Gain", "Mid Post-Gain",
    "High Attack", "High Release", "High Threshold", "High Ratio", "High Pre-Gain",
    "High Post-Gain", "Master Attack", "Master Release", "Master Threshold", "Master Ratio",
    "Master Pre-Gain", "Master Post-Gain", "Lookahead", "Low Split", "High Split",
];

/// Address of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// A per-band control.
    Band(Band, BandParam),
    /// A global control.
    Global(GlobalParam),
}

impl ParamKey {
    /// Dense index in `0..PARAM_COUNT`; also the numeric [`ParamId`].
    pub const fn index(self) -> usize {
        match self {
            ParamKey::Band(band, param) => band.index() * BAND_PARAM_COUNT + param.index(),
            ParamKey::Global(param) => BAND_BLOCK + param.index(),
        }
    }

    /// Inverse of [`index`](Self::index).
    pub const fn from_index(index: usize) -> Option<ParamKey> {
        if index < BAND_BLOCK {
            match Band::from_index(index / BAND_PARAM_COUNT) {
                Some(band) => Some(ParamKey::Band(band, BandParam::ALL[index % BAND_PARAM_COUNT])),
                None => None,
            }
        } else if index < PARAM_COUNT {
            Some(ParamKey::Global(GlobalParam::ALL[index - BAND_BLOCK]))
        } else {
            None
        }
    }

    /// Every key, in index order.
    pub fn all() -> impl Iterator<Item = ParamKey> {
        (0..PARAM_COUNT).filter_map(ParamKey::from_index)
    }

    /// Persisted state key (e.g. `"CTLow"`, `"la"`).
    pub const fn state_key(self) -> &'static str {
        STATE_KEYS[self.index()]
    }

    /// Looks a key up by its state key (exact match).
    pub fn from_state_key(key: &str) -> Option<ParamKey> {
        STATE_KEYS
            .iter()
            .position(|&k| k == key)
            .and_then(ParamKey::from_index)
    }

    /// Full metadata for this parameter.
    pub fn descriptor(self) -> ParamDescriptor {
        let index = self.index();
        let name = NAMES[index];
        let desc = match self {
            ParamKey::Band(_, BandParam::Attack) => ParamDescriptor::time_ms(name, 0.16, 2600.0, 1.0),
            ParamKey::Band(_, BandParam::Release) => {
                ParamDescriptor::time_ms(name, 0.16, 2600.0, 50.0)
            }
            ParamKey::Band(_, BandParam::Threshold) => {
                ParamDescriptor::gain_db(name, -80.0, 0.0, -10.0)
            }
            ParamKey::Band(_, BandParam::Ratio) => ParamDescriptor::ratio(name, 1.0, 60.0, 1.5),
            ParamKey::Band(_, BandParam::PreGain) => ParamDescriptor::gain_db(name, -20.0, 40.0, 0.0),
            ParamKey::Band(_, BandParam::PostGain) => ParamDescriptor::gain_db(name, 0.0, 40.0, 0.0),
            ParamKey::Global(GlobalParam::Lookahead) => {
                ParamDescriptor::time_ms(name, 0.0, MAX_LOOKAHEAD_MS, 10.0)
            }
            ParamKey::Global(GlobalParam::LowSplit) => {
                ParamDescriptor::frequency_hz(name, 30.0, 15000.0, 500.0)
            }
            ParamKey::Global(GlobalParam::HighSplit) => {
                ParamDescriptor::frequency_hz(name, 30.0, 15000.0, 10000.0)
            }
        };
        desc.with_id(ParamId(index as u32), STATE_KEYS[index])
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state_key())
    }
}

/// Solo selector value meaning "nothing soloed".
const SOLO_NONE: u8 = Band::Master as u8;

/// Atomic parameter table plus the solo selector.
///
/// Share it with `Arc`; see [`Engine::params`](crate::Engine::params).
///
/// # Example
///
/// ```rust
/// use mbcomp_core::Band;
/// use mbcomp_engine::{BandParam, EngineParams, ParamKey};
///
/// let params = EngineParams::new();
/// let key = ParamKey::Band(Band::Low, BandParam::Ratio);
///
/// assert_eq!(params.set(key, 100.0), 60.0); // clamped
/// assert_eq!(params.get(key), 60.0);
///
/// params.set_solo(Some(Band::Mid));
/// assert_eq!(params.snapshot().solo, Some(Band::Mid));
/// ```
#[derive(Debug)]
pub struct EngineParams {
    values: [AtomicU32; PARAM_COUNT],
    solo: AtomicU8,
}

impl EngineParams {
    /// Creates a table holding every default.
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|i| {
                let default = ParamKey::from_index(i).map_or(0.0, |k| k.descriptor().default);
                AtomicU32::new(default.to_bits())
            }),
            solo: AtomicU8::new(SOLO_NONE),
        }
    }

    /// Read the current value of a parameter (lock-free).
    #[inline]
    pub fn get(&self, key: ParamKey) -> f32 {
        f32::from_bits(self.values[key.index()].load(Ordering::Acquire))
    }

    /// Write a parameter value (lock-free), clamped to its descriptor range.
    ///
    /// Returns the value actually stored.
    pub fn set(&self, key: ParamKey, value: f32) -> f32 {
        let clamped = key.descriptor().clamp(value);
        self.values[key.index()].store(clamped.to_bits(), Ordering::Release);
        clamped
    }

    /// Soloed band, or `None` when every band is mixed.
    pub fn solo(&self) -> Option<Band> {
        match self.solo.load(Ordering::Acquire) {
            SOLO_NONE => None,
            i => Band::from_index(i as usize),
        }
    }

    /// Select a band to solo. `Some(Band::Master)` is the same as `None`.
    pub fn set_solo(&self, band: Option<Band>) {
        let raw = band.map_or(SOLO_NONE, |b| b as u8);
        self.solo.store(raw, Ordering::Release);
    }

    /// Restores every parameter to its default and clears solo.
    pub fn reset_to_defaults(&self) {
        for key in ParamKey::all() {
            self.values[key.index()].store(key.descriptor().default.to_bits(), Ordering::Release);
        }
        self.set_solo(None);
        tracing::debug!("parameters reset to defaults");
    }

    /// Every `(key, value)` pair, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, f32)> + '_ {
        ParamKey::all().map(|k| (k, self.get(k)))
    }

    /// Reads every parameter once for the coming buffer.
    ///
    /// The high split is raised to the low split if the two are out of order.
    pub fn snapshot(&self) -> ParamSnapshot {
        let band_settings = |band: Band| {
            let get = |param| self.get(ParamKey::Band(band, param));
            BandSettings {
                attack_ms: get(BandParam::Attack),
                release_ms: get(BandParam::Release),
                threshold_db: get(BandParam::Threshold),
                ratio: get(BandParam::Ratio),
                pre_gain_db: get(BandParam::PreGain),
                post_gain_db: get(BandParam::PostGain),
            }
        };
        let low_split_hz = self.get(ParamKey::Global(GlobalParam::LowSplit));
        let high_split_hz = self.get(ParamKey::Global(GlobalParam::HighSplit));

        ParamSnapshot {
            bands: PerBand::from_fn(band_settings),
            lookahead_ms: self.get(ParamKey::Global(GlobalParam::Lookahead)),
            low_split_hz,
            high_split_hz: high_split_hz.max(low_split_hz),
            solo: self.solo(),
        }
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self::new()
    }
}

/// One band's controls as read for a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSettings {
    /// Attack time (ms).
    pub attack_ms: f32,
    /// Release time (ms).
    pub release_ms: f32,
    /// Threshold (dB).
    pub threshold_db: f32,
    /// Ratio (n:1).
    pub ratio: f32,
    /// Pre-compressor gain (dB).
    pub pre_gain_db: f32,
    /// Post-compressor gain (dB).
    pub post_gain_db: f32,
}

impl BandSettings {
    /// Pre-gain as a linear factor.
    #[inline]
    pub fn pre_gain(&self) -> f32 {
        db_to_linear(self.pre_gain_db)
    }

    /// Post-gain as a linear factor.
    #[inline]
    pub fn post_gain(&self) -> f32 {
        db_to_linear(self.post_gain_db)
    }
}

/// Every parameter value for one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Per-band settings, including the master.
    pub bands: PerBand<BandSettings>,
    /// Lookahead (ms).
    pub lookahead_ms: f32,
    /// Low/Mid split (Hz).
    pub low_split_hz: f32,
    /// Mid/High split (Hz), never below `low_split_hz`.
    pub high_split_hz: f32,
    /// Soloed band; `None` mixes all three.
    pub solo: Option<Band>,
}

impl ParamSnapshot {
    /// Whether `band` contributes to the mix.
    #[inline]
    pub fn is_audible(&self, band: Band) -> bool {
        self.solo.is_none_or(|s| s == band)
    }
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        EngineParams::new().snapshot()
    }
}
