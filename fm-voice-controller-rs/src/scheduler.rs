//! Rate-limited redraw scheduling.
//!
//! The host calls `tick()` at its own pace (about 60 Hz). A repaint is due
//! when the dirty flag is set, or when `interval` ticks have passed since
//! the last repaint even without a change. The forced refresh bounds how
//! long a missed dirty signal or drifted host value can stay on screen.

/// Tick counter deciding when the screen must be repainted.
///
/// The dirty flag itself lives in the controller state; the scheduler only
/// counts ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RedrawScheduler {
    interval: u32,
    ticks: u32,
}

impl RedrawScheduler {
    /// Force a repaint at least every `interval` ticks. An interval of 0 is
    /// treated as 1 (repaint every tick).
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ticks: 0,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Ticks counted since the last completed repaint.
    pub fn ticks_since_repaint(&self) -> u32 {
        self.ticks
    }

    /// Count one host tick and report whether a repaint is due.
    ///
    /// The counter keeps running until [`repainted()`](Self::repainted) is
    /// called, so a failed repaint is retried on the next tick.
    pub fn tick(&mut self, dirty: bool) -> bool {
        self.ticks = self.ticks.saturating_add(1);
        dirty || self.ticks >= self.interval
    }

    /// A repaint completed; start counting again from zero.
    pub fn repainted(&mut self) {
        self.ticks = 0;
    }
}
