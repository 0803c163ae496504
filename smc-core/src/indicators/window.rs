//! Fixed-capacity rolling window indexed from the most recent value.
//!
//! Index 0 is the current (newest) value, index k is k pushes back. Capacity
//! is fixed at construction; pushing into a full window evicts the oldest
//! value. Storage is a preallocated arena with a write cursor, so steady-state
//! pushes never allocate.

/// Ring buffer over the trailing `capacity` values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buf: Vec<T>,
    capacity: usize,
    /// Slot the next push writes to.
    cursor: usize,
}

impl<T: Copy> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "RollingWindow capacity must be >= 1");
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Append a value, returning the evicted oldest value once full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.buf.len() < self.capacity {
            self.buf.push(value);
            self.cursor = self.buf.len() % self.capacity;
            None
        } else {
            let evicted = std::mem::replace(&mut self.buf[self.cursor], value);
            self.cursor = (self.cursor + 1) % self.capacity;
            Some(evicted)
        }
    }

    /// Value `k` pushes back (0 = most recent). `None` beyond available history.
    pub fn get(&self, k: usize) -> Option<T> {
        if k >= self.buf.len() {
            return None;
        }
        let newest = (self.cursor + self.capacity - 1) % self.capacity;
        let idx = (newest + self.capacity - k) % self.capacity;
        Some(self.buf[idx])
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when indices `0..k` are all available.
    pub fn has(&self, k: usize) -> bool {
        self.buf.len() >= k
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.buf.len()).filter_map(move |k| self.get(k))
    }
}
