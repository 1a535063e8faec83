//! Rolling sample history
//!
//! Fixed-capacity FIFO of the most recent samples, oldest first. Storage is
//! a `heapless::Deque` sized at build time; the active capacity is chosen at
//! startup from the display width and never exceeds the storage size.

use heapless::Deque;

use crate::sample::Millivolts;

/// Fixed-capacity, insertion-ordered sample history
#[derive(Debug, Clone)]
pub struct HistoryBuffer<const MAX: usize> {
    samples: Deque<Millivolts, MAX>,
    capacity: usize,
}

impl<const MAX: usize> Default for HistoryBuffer<MAX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX: usize> HistoryBuffer<MAX> {
    /// Create an empty history using the full storage size as capacity
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
            capacity: MAX,
        }
    }

    /// Create an empty history holding at most `capacity` samples
    ///
    /// `capacity` is limited to the storage size `MAX`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Deque::new(),
            capacity: capacity.min(MAX),
        }
    }

    /// Append a sample, evicting the oldest one when full
    pub fn push_sample(&mut self, sample: Millivolts) {
        if self.capacity == 0 {
            return;
        }

        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }

        // len < capacity <= MAX here, so there is always room
        let _ = self.samples.push_back(sample);
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if no sample has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True once the next push will evict
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest sample still held
    pub fn oldest(&self) -> Option<Millivolts> {
        self.samples.front().copied()
    }

    /// Most recently pushed sample
    pub fn newest(&self) -> Option<Millivolts> {
        self.samples.back().copied()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Millivolts> + '_ {
        self.samples.iter().copied()
    }

    /// Drop all samples, keeping the capacity
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mv(values: &[u16]) -> Vec<Millivolts> {
        values.iter().copied().map(Millivolts).collect()
    }

    #[test]
    fn test_fills_in_order() {
        let mut history: HistoryBuffer<8> = HistoryBuffer::with_capacity(5);
        for v in [200, 1400, 2600] {
            history.push_sample(Millivolts(v));
        }

        assert_eq!(history.len(), 3);
        assert!(!history.is_full());
        assert_eq!(history.iter().collect::<Vec<_>>(), mv(&[200, 1400, 2600]));
    }

    #[test]
    fn test_sixth_sample_evicts_first() {
        let mut history: HistoryBuffer<5> = HistoryBuffer::new();
        for v in 1..=6 {
            history.push_sample(Millivolts(v * 100));
        }

        assert_eq!(history.len(), 5);
        assert_eq!(history.oldest(), Some(Millivolts(200)));
        assert_eq!(history.newest(), Some(Millivolts(600)));
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            mv(&[200, 300, 400, 500, 600])
        );
    }

    #[test]
    fn test_capacity_limited_to_storage() {
        let history: HistoryBuffer<4> = HistoryBuffer::with_capacity(100);
        assert_eq!(history.capacity(), 4);
    }

    #[test]
    fn test_zero_capacity_ignores_pushes() {
        let mut history: HistoryBuffer<4> = HistoryBuffer::with_capacity(0);
        history.push_sample(Millivolts(1000));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut history: HistoryBuffer<4> = HistoryBuffer::with_capacity(3);
        history.push_sample(Millivolts(1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 3);
    }

    proptest! {
        #[test]
        fn prop_short_sequences_kept_verbatim(
            samples in proptest::collection::vec(any::<u16>(), 0..=16),
        ) {
            let mut history: HistoryBuffer<16> = HistoryBuffer::new();
            for &s in &samples {
                history.push_sample(Millivolts(s));
            }

            prop_assert_eq!(history.len(), samples.len());
            prop_assert_eq!(history.iter().collect::<Vec<_>>(), mv(&samples));
        }

        #[test]
        fn prop_retains_most_recent(
            samples in proptest::collection::vec(any::<u16>(), 0..64),
            capacity in 1usize..=16,
        ) {
            let mut history: HistoryBuffer<16> = HistoryBuffer::with_capacity(capacity);
            for &s in &samples {
                history.push_sample(Millivolts(s));
                prop_assert!(history.len() <= capacity);
            }

            let start = samples.len().saturating_sub(capacity);
            prop_assert_eq!(history.iter().collect::<Vec<_>>(), mv(&samples[start..]));
        }
    }
}
