//! Shuffled index stack for the in-memory cycle.
//!
//! The stack holds the indices *not yet dispensed* in the current cycle, so
//! "remaining" is just its length and no seen-set is needed.

use rand::Rng;

use crate::error::CycleError;

/// Fisher–Yates: walk positions from last to first, at `i` pick a uniform
/// `j` in `[0, i]` and swap. Every permutation is equally likely.
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[derive(Debug)]
pub struct ShuffleStack<R> {
    indices: Vec<usize>,
    rng: R,
}

impl<R: Rng> ShuffleStack<R> {
    /// An empty stack. Call [`initialize`](Self::initialize) to start a cycle.
    pub fn new(rng: R) -> Self {
        Self {
            indices: Vec::new(),
            rng,
        }
    }

    /// Refill with a fresh uniformly random permutation of `[0, len)`.
    pub fn initialize(&mut self, len: usize) {
        self.indices.clear();
        self.indices.extend(0..len);
        shuffle_in_place(&mut self.indices, &mut self.rng);
    }

    pub fn take_next(&mut self) -> Result<usize, CycleError> {
        self.indices.pop().ok_or(CycleError::CycleExhausted)
    }

    pub fn remaining(&self) -> usize {
        self.indices.len()
    }
}
