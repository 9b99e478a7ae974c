use crate::window::SlidingWindow;

/// Seconds of silence after which typing is considered stopped.
pub const IDLE_SECONDS: usize = 2;

/// Decides whether the trailing samples of a window show that typing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleDetector {
    span: usize,
}

impl IdleDetector {
    pub fn for_tick_rate(tick_rate: u32) -> Self {
        Self::with_span(IDLE_SECONDS * tick_rate.max(1) as usize)
    }

    pub fn with_span(span: usize) -> Self {
        Self { span }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    /// True iff the last `span` samples are all exactly zero. A window shorter
    /// than `span` is never idle.
    pub fn is_idle(&self, window: &SlidingWindow) -> bool {
        if window.len() < self.span {
            return false;
        }
        window.iter().rev().take(self.span).all(|&sample| sample == 0.0)
    }
}
