//! Band identifiers and fixed-size per-band storage.

use core::ops::{Index, IndexMut};

/// One of the three crossover bands, or the master bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    /// Below the low split.
    Low = 0,
    /// Between the two splits.
    Mid = 1,
    /// Above the high split.
    High = 2,
    /// Full mix after the bands are summed.
    Master = 3,
}

impl Band {
    /// Every band, in processing order.
    pub const ALL: [Band; 4] = [Band::Low, Band::Mid, Band::High, Band::Master];

    /// The three crossover bands.
    pub const SPLIT: [Band; 3] = [Band::Low, Band::Mid, Band::High];

    /// Number of variants.
    pub const COUNT: usize = 4;

    /// Position in [`Band::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`index`](Self::index).
    pub const fn from_index(index: usize) -> Option<Band> {
        match index {
            0 => Some(Band::Low),
            1 => Some(Band::Mid),
            2 => Some(Band::High),
            3 => Some(Band::Master),
            _ => None,
        }
    }

    /// Display and state-key name (`"Low"`, `"Mid"`, `"High"`, `"Master"`).
    pub const fn name(self) -> &'static str {
        match self {
            Band::Low => "Low",
            Band::Mid => "Mid",
            Band::High => "High",
            Band::Master => "Master",
        }
    }

    /// Case-insensitive lookup by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Band> {
        Band::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }
}

impl core::fmt::Display for Band {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per [`Band`], indexable by band.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerBand<T>(pub [T; Band::COUNT]);

impl<T> PerBand<T> {
    /// Builds each slot from its band.
    pub fn from_fn(mut f: impl FnMut(Band) -> T) -> Self {
        Self(Band::ALL.map(&mut f))
    }

    /// Iterates `(band, &value)` pairs in band order.
    pub fn iter(&self) -> impl Iterator<Item = (Band, &T)> {
        Band::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterates `(band, &mut value)` pairs in band order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Band, &mut T)> {
        Band::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T: Copy> PerBand<T> {
    /// Every slot set to `value`.
    pub const fn splat(value: T) -> Self {
        Self([value; Band::COUNT])
    }
}

impl<T> Index<Band> for PerBand<T> {
    type Output = T;

    #[inline]
    fn index(&self, band: Band) -> &T {
        &self.0[band.index()]
    }
}

impl<T> IndexMut<Band> for PerBand<T> {
    #[inline]
    fn index_mut(&mut self, band: Band) -> &mut T {
        &mut self.0[band.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for band in Band::ALL {
            assert_eq!(Band::from_index(band.index()), Some(band));
        }
        assert_eq!(Band::from_index(4), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Band::from_name("low"), Some(Band::Low));
        assert_eq!(Band::from_name("MASTER"), Some(Band::Master));
        assert_eq!(Band::from_name("bass"), None);
    }

    #[test]
    fn test_per_band_indexing() {
        let mut values = PerBand::from_fn(|b| b.index() as f32);
        assert_eq!(values[Band::High], 2.0);
        values[Band::Mid] = 9.0;
        assert_eq!(values.0, [0.0, 9.0, 2.0, 3.0]);

        for (i, (band, _)) in values.iter().enumerate() {
            assert_eq!(band, Band::ALL[i]);
        }
    }

    #[test]
    fn test_splat() {
        let gains = PerBand::splat(1.0f32);
        assert!(gains.iter().all(|(_, &g)| g == 1.0));
    }
}
