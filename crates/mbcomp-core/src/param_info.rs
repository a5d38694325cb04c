//! Parameter metadata for display, validation and persistence.
//!
//! Each user-facing control is described by a [`ParamDescriptor`] carrying
//! everything a front end needs without knowing the DSP behind it:
//!
//! - [`ParamUnit`]: display unit and suffix
//! - [`ParamId`]: stable numeric ID for automation and state
//! - `string_id`: stable textual key, also used as the persisted state key
//!
//! # Example
//!
//! ```rust
//! use mbcomp_core::{ParamDescriptor, ParamId, ParamUnit};
//!
//! let threshold = ParamDescriptor::gain_db("Low Threshold", -80.0, 0.0, -10.0)
//!     .with_id(ParamId(2), "CTLow");
//!
//! assert_eq!(threshold.unit, ParamUnit::Decibels);
//! assert_eq!(threshold.clamp(12.0), 0.0);
//! assert_eq!(threshold.string_id, "CTLow");
//! ```
//!
//! # no_std Support
//!
//! This module is fully `no_std` compatible with no heap allocations required.

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` never changes for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Low Attack").
    pub name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value for this parameter.
    pub min: f32,

    /// Maximum allowed value for this parameter.
    pub max: f32,

    /// Default value when the engine is created or reset.
    pub default: f32,

    /// Stable numeric ID.
    ///
    /// Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Stable textual ID, used as the key in persisted state.
    ///
    /// Default: `""` (unassigned).
    pub string_id: &'static str,
}

impl ParamDescriptor {
    const fn base(name: &'static str, unit: ParamUnit, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            unit,
            min,
            max,
            default,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Time parameter with custom name and range (milliseconds).
    ///
    /// # Arguments
    ///
    /// * `name` - Full parameter name (e.g., "Low Attack")
    /// * `min` - Minimum time in ms
    /// * `max` - Maximum time in ms
    /// * `default` - Default time in ms
    pub const fn time_ms(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self::base(name, ParamUnit::Milliseconds, min, max, default)
    }

    /// Gain parameter with custom name and range (decibels).
    pub const fn gain_db(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self::base(name, ParamUnit::Decibels, min, max, default)
    }

    /// Compression ratio parameter (n:1).
    pub const fn ratio(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self::base(name, ParamUnit::Ratio, min, max, default)
    }

    /// Frequency parameter in Hz.
    pub const fn frequency_hz(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self::base(name, ParamUnit::Hertz, min, max, default)
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// Call after a factory method.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mbcomp_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::time_ms("Lookahead", 0.0, 50.0, 10.0)
    ///     .with_id(ParamId(24), "la");
    /// assert_eq!(desc.id, ParamId(24));
    /// assert_eq!(desc.string_id, "la");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mbcomp_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Gain", -20.0, 40.0, 0.0);
    /// assert_eq!(desc.clamp(0.0), 0.0);
    /// assert_eq!(desc.clamp(-100.0), -20.0);
    /// assert_eq!(desc.clamp(100.0), 40.0);
    /// assert_eq!(desc.clamp(f32::NAN), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - threshold and gain parameters.
    Decibels,

    /// Hertz (Hz) - crossover frequencies.
    Hertz,

    /// Milliseconds (ms) - attack, release and lookahead.
    Milliseconds,

    /// Ratio (n:1) - compression ratio.
    Ratio,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mbcomp_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Ratio.suffix(), ":1");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Ratio => ":1",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_set_units() {
        assert_eq!(
            ParamDescriptor::time_ms("A", 0.16, 2600.0, 1.0).unit,
            ParamUnit::Milliseconds
        );
        assert_eq!(
            ParamDescriptor::gain_db("G", -20.0, 40.0, 0.0).unit,
            ParamUnit::Decibels
        );
        assert_eq!(
            ParamDescriptor::ratio("R", 1.0, 60.0, 1.5).unit,
            ParamUnit::Ratio
        );
        assert_eq!(
            ParamDescriptor::frequency_hz("F", 30.0, 15000.0, 500.0).unit,
            ParamUnit::Hertz
        );
    }

    #[test]
    fn test_clamp() {
        let desc = ParamDescriptor::ratio("Ratio", 1.0, 60.0, 1.5);
        assert_eq!(desc.clamp(0.5), 1.0);
        assert_eq!(desc.clamp(100.0), 60.0);
        assert_eq!(desc.clamp(4.0), 4.0);
        assert_eq!(desc.clamp(f32::NAN), 1.5);
        assert_eq!(desc.clamp(f32::INFINITY), 60.0);
    }

    #[test]
    fn test_with_id() {
        let desc = ParamDescriptor::gain_db("Post", 0.0, 40.0, 0.0).with_id(ParamId(5), "postLow");
        assert_eq!(desc.id, ParamId(5));
        assert_eq!(desc.string_id, "postLow");
    }
}
