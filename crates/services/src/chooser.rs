use std::collections::VecDeque;
use std::sync::Mutex;

use rand::Rng;

/// Picks a roster index in `0..len`. `len` is always at least 1.
pub trait IndexChooser: Send + Sync {
    fn choose(&self, len: usize) -> usize;
}

/// Uniform choice with replacement; consecutive repeats are possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChooser;

impl IndexChooser for RandomChooser {
    fn choose(&self, len: usize) -> usize {
        rand::rng().random_range(0..len.max(1))
    }
}

/// Replays a fixed list of indices, then keeps returning the last one.
///
/// Indices are wrapped into range so a pinned script works for any roster.
#[derive(Debug, Default)]
pub struct SequenceChooser {
    queue: Mutex<VecDeque<usize>>,
    last: Mutex<usize>,
}

impl SequenceChooser {
    #[must_use]
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            queue: Mutex::new(indices.into_iter().collect()),
            last: Mutex::new(0),
        }
    }
}

impl IndexChooser for SequenceChooser {
    fn choose(&self, len: usize) -> usize {
        let mut last = self.last.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let next = self
            .queue
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();
        if let Some(index) = next {
            *last = index;
        }
        *last % len.max(1)
    }
}
