//! Frame scheduling hook
//!
//! The event manager asks the host for a frame after a flush of resampled
//! touch events, so the interpolated positions reach the screen even when no
//! vsync-driven flush is otherwise pending.

use std::cell::Cell;

/// Host pipeline that can be asked for another frame
pub trait FrameScheduler {
    /// Request a redraw on the next vsync
    fn request_frame(&self);
}

/// Scheduler that only counts requests
///
/// Useful for headless hosts and tests.
#[derive(Debug, Default)]
pub struct FrameCounter {
    requested: Cell<usize>,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames requested so far
    pub fn requested(&self) -> usize {
        self.requested.get()
    }

    /// Check and clear pending requests
    pub fn take_requested(&self) -> usize {
        self.requested.replace(0)
    }
}

impl FrameScheduler for FrameCounter {
    fn request_frame(&self) {
        tracing::trace!("frame requested");
        self.requested.set(self.requested.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_counts_and_clears() {
        let counter = FrameCounter::new();
        counter.request_frame();
        counter.request_frame();
        assert_eq!(counter.requested(), 2);
        assert_eq!(counter.take_requested(), 2);
        assert_eq!(counter.requested(), 0);
    }
}
