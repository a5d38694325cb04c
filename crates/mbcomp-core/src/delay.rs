//! Resizable ring-buffer delay line used for compressor lookahead.
//!
//! [`DelayLine`] holds the last `len()` samples pushed into it. Each
//! [`push`](DelayLine::push) stores the new sample and hands back the sample it
//! replaced, so a line of length `n` delays its input by exactly `n` samples.
//! A line of length zero is a pass-through.
//!
//! # Resizing
//!
//! [`resize`](DelayLine::resize) keeps the chronological tail of the contents:
//! the newest `min(old, new)` samples stay the newest samples, and when the line
//! grows the additional (older) slots are zero-filled. It is logically a
//! flatten-then-reallocate, but it runs in place. Reserve storage up front with
//! [`with_max_capacity`](DelayLine::with_max_capacity) and every resize up to
//! that capacity is allocation-free.
//!
//! | Operation | Cost | Allocates |
//! |-----------|------|-----------|
//! | `push` | O(1) | never |
//! | `resize(n)`, `n <= capacity()` | O(n) | never |
//! | `resize(n)`, `n > capacity()` | O(n) | yes |

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

/// Fixed-length circular delay line with an in-place, history-preserving resize.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::DelayLine;
///
/// let mut delay = DelayLine::<f32>::new(2);
/// assert_eq!(delay.push(1.0), 0.0);
/// assert_eq!(delay.push(2.0), 0.0);
/// assert_eq!(delay.push(3.0), 1.0);
///
/// // Growing keeps the newest samples and zero-fills older history.
/// delay.resize(3);
/// assert_eq!(delay.push(4.0), 0.0);
/// assert_eq!(delay.push(5.0), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine<T> {
    /// Ring storage; `buffer.len()` is the delay length.
    buffer: Vec<T>,
    /// Oldest slot, about to be overwritten.
    cursor: usize,
}

impl<T: Copy + Default> DelayLine<T> {
    /// Creates a delay line of `size` samples, zero-filled.
    pub fn new(size: usize) -> Self {
        let mut buffer = Vec::with_capacity(size);
        buffer.resize(size, T::default());
        Self { buffer, cursor: 0 }
    }

    /// Creates an empty (pass-through) line with storage reserved for
    /// `max_size` samples.
    ///
    /// Later calls to [`resize`](Self::resize) with `n <= max_size` do not
    /// touch the allocator, which makes them safe between audio buffers.
    pub fn with_max_capacity(max_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(max_size),
            cursor: 0,
        }
    }

    /// Pushes `sample` into the line and returns the sample it replaced.
    ///
    /// With a length of zero the input is returned unchanged.
    #[inline]
    pub fn push(&mut self, sample: T) -> T {
        let len = self.buffer.len();
        if len == 0 {
            return sample;
        }

        let oldest = core::mem::replace(&mut self.buffer[self.cursor], sample);
        self.cursor += 1;
        if self.cursor >= len {
            self.cursor = 0;
        }
        oldest
    }

    /// Changes the delay length to `size`, preserving the newest samples.
    ///
    /// Shrinking drops the oldest samples. Growing inserts zeroed slots that
    /// are older than everything already in the line.
    pub fn resize(&mut self, size: usize) {
        let old = self.buffer.len();
        if old == size {
            return;
        }

        self.flatten();
        if size < old {
            self.buffer.drain(..old - size);
        } else {
            self.buffer.resize(size, T::default());
            self.buffer.rotate_right(size - old);
        }
        self.cursor = 0;
    }

    /// Rotates the ring so the oldest sample sits at index 0.
    fn flatten(&mut self) {
        if self.cursor != 0 {
            self.buffer.rotate_left(self.cursor);
            self.cursor = 0;
        }
    }

    /// Current delay length in samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` when the line is a pass-through.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of samples the line can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Zeroes the contents without changing the length.
    pub fn clear(&mut self) {
        self.buffer.fill(T::default());
        self.cursor = 0;
    }
}

impl<T: Copy + Default> Default for DelayLine<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_zero_length_is_passthrough() {
        let mut delay = DelayLine::<f32>::new(0);
        assert!(delay.is_empty());
        for i in 0..10 {
            let x = i as f32 * 0.25;
            assert_eq!(delay.push(x), x);
        }
    }

    #[test]
    fn test_round_trip_returns_values_in_order() {
        let mut delay = DelayLine::<f32>::new(5);
        let first: Vec<f32> = (1..=5).map(|i| i as f32).collect();

        for &x in &first {
            assert_eq!(delay.push(x), 0.0);
        }

        let out: Vec<f32> = (0..5).map(|_| delay.push(-1.0)).collect();
        assert_eq!(out, first);
    }

    #[test]
    fn test_grow_preserves_newest_and_zero_fills() {
        let mut delay = DelayLine::<f32>::new(3);
        // Wrap the cursor so resize has to flatten a rotated ring
        for i in 1..=5 {
            delay.push(i as f32);
        }
        // Contents (oldest..newest): 3, 4, 5
        delay.resize(5);
        assert_eq!(delay.len(), 5);

        let out: Vec<f32> = (0..5).map(|_| delay.push(0.0)).collect();
        assert_eq!(out, vec![0.0, 0.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_shrink_keeps_newest() {
        let mut delay = DelayLine::<f32>::new(4);
        for i in 1..=6 {
            delay.push(i as f32);
        }
        // Contents: 3, 4, 5, 6
        delay.resize(2);

        assert_eq!(delay.push(0.0), 5.0);
        assert_eq!(delay.push(0.0), 6.0);
        assert_eq!(delay.push(0.0), 0.0);
    }

    #[test]
    fn test_resize_to_zero_then_back() {
        let mut delay = DelayLine::<f32>::new(3);
        delay.push(1.0);
        delay.resize(0);
        assert_eq!(delay.push(7.0), 7.0);

        delay.resize(2);
        assert_eq!(delay.push(1.0), 0.0);
        assert_eq!(delay.push(2.0), 0.0);
        assert_eq!(delay.push(3.0), 1.0);
    }

    #[test]
    fn test_resize_within_capacity_does_not_reallocate() {
        let mut delay = DelayLine::<f32>::with_max_capacity(64);
        let cap = delay.capacity();
        assert!(cap >= 64);

        for size in [10, 64, 3, 0, 40] {
            delay.resize(size);
            assert_eq!(delay.len(), size);
            assert_eq!(delay.capacity(), cap);
        }
    }

    #[test]
    fn test_clear() {
        let mut delay = DelayLine::<f32>::new(2);
        delay.push(1.0);
        delay.push(2.0);
        delay.clear();
        assert_eq!(delay.push(0.0), 0.0);
        assert_eq!(delay.push(0.0), 0.0);
    }
}
