use std::fmt;
use std::num::NonZeroUsize;

use crate::error::{DspError, Result};

/// Fixed-capacity circular store of real samples
///
/// Index 0 always denotes the most recently pushed value and index
/// `len() - 1` the oldest value still held. Reads at or beyond `len()`
/// return 0 rather than clamping to the oldest slot, so a partially filled
/// buffer behaves like a delay line preloaded with zeros.
///
/// Statistics (`mean`, `variance`, `autocorrelation`) only consider the
/// samples currently held, and all of them return 0 on an empty buffer.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Vec<f64>,
    /// Slot of the most recent write; meaningless while `len == 0`
    head: usize,
    len: usize,
}

impl RingBuffer {
    /// Create an empty buffer holding at most `capacity` samples
    ///
    /// # Errors
    /// Returns `DspError::InvalidCapacity` for a zero capacity
    pub fn new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or(DspError::InvalidCapacity(capacity))
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        Self {
            data: vec![0.0; capacity],
            head: capacity - 1,
            len: 0,
        }
    }

    /// Write a value into the next slot, evicting the oldest once full
    pub fn push(&mut self, value: f64) {
        self.head += 1;
        if self.head == self.data.len() {
            self.head = 0;
        }
        self.data[self.head] = value;
        if self.len < self.data.len() {
            self.len += 1;
        }
    }

    /// The `index`-th most recent value, 0 for indices at or beyond `len()`
    pub fn read(&self, index: usize) -> f64 {
        if index >= self.len {
            return 0.0;
        }
        self.data[self.slot(index)]
    }

    /// Remove and return the oldest value, zeroing its slot
    ///
    /// Returns 0 on an empty buffer.
    pub fn pop_oldest(&mut self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        let slot = self.slot(self.len - 1);
        let value = self.data[slot];
        self.data[slot] = 0.0;
        self.len -= 1;
        value
    }

    /// Mean of the held samples
    pub fn mean(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.iter().sum::<f64>() / self.len as f64
    }

    /// Population variance of the held samples
    pub fn variance(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        let mean = self.mean();
        self.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / self.len as f64
    }

    /// Mean-removed lagged product at lag `|lag|`
    ///
    /// Averaged over the `len() - |lag|` available pairs, so lag 0 equals
    /// [`variance`](Self::variance). Returns 0 when `len() <= |lag|`.
    pub fn autocorrelation(&self, lag: isize) -> f64 {
        let lag = lag.unsigned_abs();
        if self.len <= lag {
            return 0.0;
        }
        let mean = self.mean();
        let pairs = self.len - lag;
        let sum: f64 = (0..pairs)
            .map(|i| (self.read(i) - mean) * (self.read(i + lag) - mean))
            .sum();
        sum / pairs as f64
    }

    /// Held samples from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.data[self.slot(i)])
    }

    /// Drop every held sample
    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.head = self.data.len() - 1;
        self.len = 0;
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Current occupancy
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    fn slot(&self, index: usize) -> usize {
        let n = self.data.len();
        (self.head + n - index % n) % n
    }
}

impl fmt::Display for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N={} n={}", self.capacity(), self.len)?;
        for (i, value) in self.iter().enumerate() {
            write!(f, " x({})={}", i, value)?;
        }
        Ok(())
    }
}
