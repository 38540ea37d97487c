#![forbid(unsafe_code)]

//! Row geometry: extents, thresholds, and translation clamping.
//!
//! [`RowExtent`] captures the two widths that drive every reveal decision:
//! the full row width `L` and the action-surface width `W`. All thresholds
//! are derived from these, never stored separately, so they cannot drift.
//!
//! # Invariants
//!
//! 1. `0 < action_width <= row_width` (enforced at construction by clamping).
//! 2. `open_threshold() + close_threshold() == 1.0` (hysteresis is symmetric
//!    around the action surface's visual midpoint).
//! 3. `clamp_translation` output is always in `[-action_width, 0]`.
//!
//! # Failure Modes
//!
//! - Zero or negative widths: clamped to 1.0 to avoid division by zero.
//! - Non-finite drag input: `clamp_translation` maps NaN to the closed
//!   position (0.0) rather than propagating it into view transforms.

// ---------------------------------------------------------------------------
// Points and rects
// ---------------------------------------------------------------------------

/// A point in row-local display units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in row-local display units.
///
/// Used for hit-testing taps against a row's action surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `point` lies inside the rect (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: PointF) -> bool {
        self.contains_with_slop(point, 0.0)
    }

    /// Whether `point` lies inside the rect grown by `slop` on every side.
    ///
    /// `slop` compensates for touch imprecision; it is a configurable
    /// parameter rather than a device constant (see [`crate::config`]).
    #[must_use]
    pub fn contains_with_slop(&self, point: PointF, slop: f32) -> bool {
        point.x >= self.x - slop
            && point.x <= self.x + self.width + slop
            && point.y >= self.y - slop
            && point.y <= self.y + self.height + slop
    }
}

// ---------------------------------------------------------------------------
// RowExtent
// ---------------------------------------------------------------------------

/// The widths a reveal variant needs: full row width `L` and action-surface
/// width `W`.
///
/// The underlying recognizer reports drag deltas as travel across the *full*
/// row width even though visible travel is clamped to the action surface.
/// [`RowExtent`] owns the remapping constants for that unit mismatch:
/// [`swiping_offset`](RowExtent::swiping_offset) and the hysteretic threshold
/// pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowExtent {
    row_width: f32,
    action_width: f32,
}

impl RowExtent {
    /// Create an extent, clamping degenerate widths.
    ///
    /// `row_width` is clamped to at least 1.0; `action_width` to
    /// `[1.0, row_width]`.
    #[must_use]
    pub fn new(row_width: f32, action_width: f32) -> Self {
        let row_width = if row_width.is_finite() {
            row_width.max(1.0)
        } else {
            1.0
        };
        let action_width = if action_width.is_finite() {
            action_width.clamp(1.0, row_width)
        } else {
            1.0
        };
        Self {
            row_width,
            action_width,
        }
    }

    /// Full row width `L`.
    #[inline]
    #[must_use]
    pub fn row_width(&self) -> f32 {
        self.row_width
    }

    /// Action-surface width `W`.
    #[inline]
    #[must_use]
    pub fn action_width(&self) -> f32 {
        self.action_width
    }

    /// Fraction of `L` a closed row must travel leftward to commit open:
    /// `W / 2 / L`, the action surface's visual midpoint.
    #[must_use]
    pub fn open_threshold(&self) -> f32 {
        self.action_width / 2.0 / self.row_width
    }

    /// Fraction of `L` an already-open row must travel to commit closed:
    /// `1 - W / 2 / L`.
    ///
    /// The recognizer measures deltas against the full row width while the
    /// open row's rest translation is only `-W`, so closing motion must
    /// cover almost the whole width in recognizer units to cross back past
    /// the same physical midpoint.
    #[must_use]
    pub fn close_threshold(&self) -> f32 {
        1.0 - self.open_threshold()
    }

    /// Remap constant `L - W` added to raw deltas when the dragged row is
    /// the one already open.
    #[must_use]
    pub fn swiping_offset(&self) -> f32 {
        self.row_width - self.action_width
    }

    /// Translation of a fully revealed row: `-W`.
    #[must_use]
    pub fn rest_offset(&self) -> f32 {
        -self.action_width
    }

    /// Clamp a (possibly remapped) delta into the renderable range
    /// `[-W, 0]`. NaN maps to the closed position.
    #[must_use]
    pub fn clamp_translation(&self, dx: f32) -> f32 {
        if dx.is_nan() {
            return 0.0;
        }
        dx.clamp(-self.action_width, 0.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
