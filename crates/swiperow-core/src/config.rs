#![forbid(unsafe_code)]

//! Engine configuration: close-animation timing and tap slop.

use std::time::Duration;

/// Tunable parameters shared by the engine and its binder.
#[derive(Debug, Clone)]
pub struct SwipeConfig {
    /// Duration of the animated close transition (default: 250ms).
    pub close_duration: Duration,
    /// Hit-test tolerance around the action surface, in display units
    /// (default: 8.0).
    ///
    /// Kept configurable rather than hard-coding a device-density constant
    /// so hosts can scale it to their touch-target guidelines.
    pub tap_slop: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            close_duration: Duration::from_millis(250),
            tap_slop: 8.0,
        }
    }
}

impl SwipeConfig {
    /// Config with a custom close duration. Zero is clamped to 1ns so a
    /// close still takes one `advance` call to complete.
    #[must_use]
    pub fn with_close_duration(mut self, d: Duration) -> Self {
        self.close_duration = if d.is_zero() {
            Duration::from_nanos(1)
        } else {
            d
        };
        self
    }

    /// Config with a custom tap slop (negative values clamp to zero).
    #[must_use]
    pub fn with_tap_slop(mut self, slop: f32) -> Self {
        self.tap_slop = slop.max(0.0);
        self
    }
}
