//! Per-slideshow counter and total count.

/// Current position and total slide count, fixed at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideIndex {
    count: usize,
    counter: usize,
}

impl SlideIndex {
    pub const fn new(count: usize) -> Self {
        Self { count, counter: 0 }
    }

    pub const fn count(&self) -> usize {
        self.count
    }

    pub const fn counter(&self) -> usize {
        self.counter
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Wraps any target into `[0, count)`; `None` when there are no slides.
    pub fn normalize(&self, target: i64) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let count = i64::try_from(self.count).ok()?;
        usize::try_from(target.rem_euclid(count)).ok()
    }

    /// Raw target one step away from the current counter.
    pub fn step_target(&self, delta: i64) -> i64 {
        i64::try_from(self.counter).unwrap_or(i64::MAX).saturating_add(delta)
    }

    /// Stores an already-normalized counter.
    pub(crate) fn set(&mut self, counter: usize) {
        debug_assert!(counter < self.count, "counter {counter} out of 0..{}", self.count);
        self.counter = counter;
    }
}
