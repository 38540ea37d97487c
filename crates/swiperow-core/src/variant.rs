#![forbid(unsafe_code)]

//! Variant strategies: how a drag delta becomes an offset and a commit.
//!
//! The engine owns the drag lifecycle; a [`SwipeVariant`] owns the math.
//! Two variants ship:
//!
//! - [`RevealWithAction`]: clamped slide to a fixed action-surface width
//!   with a persistent open state and hysteretic thresholds.
//! - [`SimpleSwipe`]: free-sliding dismissal with no anchor and no
//!   persistent state; release reports a plain commit decision.
//!
//! The two share a lifecycle but diverge in rendering and commit math, so
//! the seam is a strategy object rather than inheritance: the engine calls
//! [`render_offset`](SwipeVariant::render_offset) per drag sample and
//! [`decide_commit`](SwipeVariant::decide_commit) once on release.
//!
//! # Invariants
//!
//! 1. `RevealWithAction::render_offset` output is always in `[-W, 0]`.
//! 2. Rightward deltas never render as positive offsets in either variant.
//! 3. `decide_commit` is pure: same inputs, same outcome.

use crate::geometry::RowExtent;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Release verdict for a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The drag crossed its threshold; the row commits to the revealed
    /// (or, for [`SimpleSwipe`], dismissed) state.
    Open,
    /// The drag fell short; the row returns to rest.
    Closed,
}

impl CommitOutcome {
    /// Returns true for [`CommitOutcome::Open`].
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Strategy seam between the drag lifecycle and variant-specific math.
///
/// `already_open` is true when the row being dragged is the one currently
/// parked at the revealed offset; variants use it to remap recognizer-space
/// deltas and to pick the hysteretic threshold.
pub trait SwipeVariant {
    /// Translation to render for a raw recognizer delta `dx` (signed,
    /// positive = rightward, measured across the full row width).
    fn render_offset(&self, dx: f32, already_open: bool) -> f32;

    /// Verdict for a release at raw delta `dx`.
    fn decide_commit(&self, dx: f32, already_open: bool) -> CommitOutcome;

    /// Translation of a row resting in the committed-open state.
    fn rest_offset(&self) -> f32;

    /// Whether a committed-open row stays open until explicitly closed.
    ///
    /// False for dismissal variants, where commit hands the row to the
    /// host (e.g. for removal) and the engine keeps no open state.
    fn persists_open(&self) -> bool;
}

// ---------------------------------------------------------------------------
// RevealWithAction
// ---------------------------------------------------------------------------

/// Clamped slide revealing a fixed-width action surface.
///
/// Opening commits at the action surface's visual midpoint (`W/2/L` of the
/// full width); closing an already-open row requires `1 - W/2/L` because
/// the recognizer keeps measuring against the full row width while the open
/// row's rest translation is only `-W`. Deltas for the open row are
/// remapped by `swiping_offset = L - W` before clamping.
#[derive(Debug, Clone, Copy)]
pub struct RevealWithAction {
    extent: RowExtent,
}

impl RevealWithAction {
    #[must_use]
    pub fn new(extent: RowExtent) -> Self {
        Self { extent }
    }

    /// The extent this variant derives its thresholds from.
    #[must_use]
    pub fn extent(&self) -> RowExtent {
        self.extent
    }

    fn fraction(&self, dx: f32) -> f32 {
        dx.abs() / self.extent.row_width()
    }
}

impl SwipeVariant for RevealWithAction {
    fn render_offset(&self, dx: f32, already_open: bool) -> f32 {
        let remapped = if already_open {
            dx + self.extent.swiping_offset()
        } else {
            dx
        };
        self.extent.clamp_translation(remapped)
    }

    fn decide_commit(&self, dx: f32, already_open: bool) -> CommitOutcome {
        if already_open {
            // Hysteresis: the open row stays open unless the release travels
            // past the closing threshold in recognizer units.
            if self.fraction(dx) >= self.extent.close_threshold() {
                CommitOutcome::Closed
            } else {
                CommitOutcome::Open
            }
        } else if dx < 0.0 && self.fraction(dx) >= self.extent.open_threshold() {
            CommitOutcome::Open
        } else {
            CommitOutcome::Closed
        }
    }

    fn rest_offset(&self) -> f32 {
        self.extent.rest_offset()
    }

    fn persists_open(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// SimpleSwipe
// ---------------------------------------------------------------------------

/// Free-sliding dismissal: no anchor, no persistent open state.
///
/// The rendered translation is the raw delta (leftward only); a release
/// past `commit_fraction` of the row width reports a commit, which the
/// host typically answers by removing the row.
#[derive(Debug, Clone, Copy)]
pub struct SimpleSwipe {
    row_width: f32,
    commit_fraction: f32,
}

impl SimpleSwipe {
    /// Dismissal across `row_width` committing at half the width.
    #[must_use]
    pub fn new(row_width: f32) -> Self {
        Self {
            row_width: if row_width.is_finite() {
                row_width.max(1.0)
            } else {
                1.0
            },
            commit_fraction: 0.5,
        }
    }

    /// Override the commit fraction (clamped to `(0, 1]`).
    #[must_use]
    pub fn commit_fraction(mut self, fraction: f32) -> Self {
        self.commit_fraction = fraction.clamp(f32::EPSILON, 1.0);
        self
    }
}

impl SwipeVariant for SimpleSwipe {
    fn render_offset(&self, dx: f32, _already_open: bool) -> f32 {
        // Directional filter only: rightward motion renders nothing.
        if dx.is_finite() && dx < 0.0 { dx } else { 0.0 }
    }

    fn decide_commit(&self, dx: f32, _already_open: bool) -> CommitOutcome {
        if dx < 0.0 && dx.abs() / self.row_width >= self.commit_fraction {
            CommitOutcome::Open
        } else {
            CommitOutcome::Closed
        }
    }

    fn rest_offset(&self) -> f32 {
        0.0
    }

    fn persists_open(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
