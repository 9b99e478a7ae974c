use std::collections::VecDeque;

use crate::util::mean;

/// Window length in seconds of history.
pub const WINDOW_SECONDS: usize = 10;

/// Upper bound on the up-front allocation; larger windows grow on demand.
const PREALLOCATE_MAX: usize = 256;

/// Fixed-capacity, chronologically ordered per-tick samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SlidingWindow {
    /// A window holding ten seconds of ticks, seeded with one zero sample.
    pub fn for_tick_rate(tick_rate: u32) -> Self {
        Self::with_capacity(WINDOW_SECONDS * tick_rate.max(1) as usize)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut samples = VecDeque::with_capacity(capacity.min(PREALLOCATE_MAX));
        samples.push_back(0.0);
        Self { samples, capacity }
    }

    pub fn append(&mut self, sample: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Drop every sample. Callers append right after.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Back to the single bootstrap sample.
    pub fn restart(&mut self) {
        self.reset();
        self.samples.push_back(0.0);
    }

    pub fn average(&self) -> f64 {
        mean(&self.samples).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &f64> + ExactSizeIterator + Clone {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }
}

impl FromIterator<f64> for SlidingWindow {
    /// Build a window whose capacity is exactly the number of samples given.
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let samples: VecDeque<f64> = iter.into_iter().collect();
        let capacity = samples.len().max(1);
        Self { samples, capacity }
    }
}
