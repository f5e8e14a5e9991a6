//! Bounded FIFO history of numeric samples.
//!
//! Samples live in one `Vec` with a moving start offset. Evicted samples are
//! dropped lazily: once the dead prefix reaches `capacity` it is drained in a
//! single pass, so `push` is O(1) amortized and the retained window is always
//! available as one contiguous slice.

use crate::domain::error::SigtraderError;

#[derive(Debug, Clone)]
pub struct RollingSeries {
    values: Vec<f64>,
    start: usize,
    capacity: usize,
}

impl RollingSeries {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RollingSeries {
            values: Vec::with_capacity(capacity * 2),
            start: 0,
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
        if self.values.len() - self.start > self.capacity {
            self.start += 1;
            if self.start >= self.capacity {
                self.values.drain(..self.start);
                self.start = 0;
            }
        }
    }

    /// The last `n` samples, oldest first.
    pub fn tail(&self, n: usize) -> Result<&[f64], SigtraderError> {
        let window = self.as_slice();
        if window.len() < n {
            return Err(SigtraderError::InsufficientHistory {
                have: window.len(),
                need: n,
            });
        }
        Ok(&window[window.len() - n..])
    }

    pub fn last_value(&self) -> Result<f64, SigtraderError> {
        self.as_slice()
            .last()
            .copied()
            .ok_or(SigtraderError::InsufficientHistory { have: 0, need: 1 })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[self.start..]
    }

    pub fn len(&self) -> usize {
        self.values.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn push_within_capacity_keeps_everything() {
        let mut series = RollingSeries::new(5);
        for v in [1.0, 2.0, 3.0] {
            series.push(v);
        }
        assert_eq!(series.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn push_evicts_oldest() {
        let mut series = RollingSeries::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            series.push(v);
        }
        assert_eq!(series.as_slice(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn eviction_survives_compaction() {
        let mut series = RollingSeries::new(4);
        for i in 0..100 {
            series.push(i as f64);
        }
        assert_eq!(series.as_slice(), &[96.0, 97.0, 98.0, 99.0]);
        assert!(series.values.len() <= 2 * series.capacity());
    }

    #[test]
    fn tail_returns_newest() {
        let mut series = RollingSeries::new(10);
        for v in [1.0, 2.0, 3.0, 4.0] {
            series.push(v);
        }
        assert_eq!(series.tail(2).unwrap(), &[3.0, 4.0]);
        assert_eq!(series.tail(0).unwrap(), &[] as &[f64]);
    }

    #[test]
    fn tail_insufficient_history() {
        let mut series = RollingSeries::new(10);
        series.push(1.0);
        match series.tail(3) {
            Err(SigtraderError::InsufficientHistory { have, need }) => {
                assert_eq!(have, 1);
                assert_eq!(need, 3);
            }
            other => panic!("expected InsufficientHistory, got {:?}", other),
        }
    }

    #[test]
    fn last_value_empty_fails() {
        let series = RollingSeries::new(3);
        assert!(series.is_empty());
        assert!(matches!(
            series.last_value(),
            Err(SigtraderError::InsufficientHistory { have: 0, need: 1 })
        ));
    }

    #[test]
    fn last_value_returns_newest() {
        let mut series = RollingSeries::new(2);
        series.push(7.0);
        series.push(8.0);
        series.push(9.0);
        assert_eq!(series.last_value().unwrap(), 9.0);
    }

    #[test]
    fn zero_capacity_holds_one() {
        let mut series = RollingSeries::new(0);
        series.push(1.0);
        series.push(2.0);
        assert_eq!(series.capacity(), 1);
        assert_eq!(series.as_slice(), &[2.0]);
    }

    proptest! {
        #[test]
        fn window_matches_suffix(
            cap in 1usize..20,
            values in prop::collection::vec(-1e6f64..1e6, 0..200),
        ) {
            let mut series = RollingSeries::new(cap);
            for &v in &values {
                series.push(v);
            }
            let keep = values.len().min(cap);
            prop_assert_eq!(series.len(), keep);
            prop_assert_eq!(series.as_slice(), &values[values.len() - keep..]);
        }
    }
}
