/// Periodic sample source replaying a fixed table
///
/// A fresh table holds zeros; fill it with [`set`](Self::set) and pull
/// samples with [`next_value`](Self::next_value), which wraps back to the
/// first entry after the last one.
#[derive(Debug, Clone)]
pub struct WaveTable {
    table: Vec<f64>,
    position: usize,
    last: f64,
}

impl WaveTable {
    pub fn new(len: usize) -> Self {
        Self {
            table: vec![0.0; len],
            position: 0,
            last: 0.0,
        }
    }

    pub fn from_samples(samples: &[f64]) -> Self {
        Self {
            table: samples.to_vec(),
            position: 0,
            last: 0.0,
        }
    }

    /// Store `value` at `index`; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.table.get_mut(index) {
            *slot = value;
        }
    }

    /// Emit the current entry and step to the next one
    ///
    /// An empty table always yields 0.
    pub fn next_value(&mut self) -> f64 {
        if self.table.is_empty() {
            return 0.0;
        }
        self.last = self.table[self.position];
        self.position += 1;
        if self.position == self.table.len() {
            self.position = 0;
        }
        self.last
    }

    /// The value most recently emitted
    pub fn last_value(&self) -> f64 {
        self.last
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Iterator for WaveTable {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.table.is_empty() {
            None
        } else {
            Some(self.next_value())
        }
    }
}
