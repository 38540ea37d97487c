#![forbid(unsafe_code)]

//! Close animations: fixed-duration ease-in-ease-out return to rest.
//!
//! A [`CloseAnimation`] is fire-and-forget: the engine starts one per
//! closing row and samples it on each [`advance`](crate::engine::SwipeEngine::advance)
//! call. All sampling takes an explicit `now` so tests are deterministic;
//! the animation never reads the clock itself.
//!
//! # Invariants
//!
//! 1. `value(now)` is monotonic toward 0.0 as `now` advances.
//! 2. `value` at or past the end is exactly 0.0.
//! 3. Zero duration is clamped to 1ns to avoid division by zero.

use std::time::Duration;

use web_time::Instant;

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Cubic ease-in-ease-out over `t` in `[0, 1]`.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

// ---------------------------------------------------------------------------
// CloseAnimation
// ---------------------------------------------------------------------------

/// One in-flight close: eases a translation from `from` back to 0.0.
#[derive(Debug, Clone, Copy)]
pub struct CloseAnimation {
    from: f32,
    start: Instant,
    duration: Duration,
}

impl CloseAnimation {
    /// Start a close from translation `from` at time `start`.
    #[must_use]
    pub fn new(from: f32, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            start,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
        }
    }

    /// Translation to render at `now`.
    #[must_use]
    pub fn value(&self, now: Instant) -> f32 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return 0.0;
        }
        self.from * (1.0 - ease_in_out(progress))
    }

    /// Whether the animation has run its full duration at `now`.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
