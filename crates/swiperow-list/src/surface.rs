#![forbid(unsafe_code)]

//! Row surface contract: what a row view must expose to participate.
//!
//! A row has a *content surface* (the draggable foreground) and, for the
//! reveal variant, an *action surface* (a fixed-width control docked behind
//! it). The engine never touches views; the binder applies effects through
//! these traits.
//!
//! Rows that do not expose the capability are simply excluded from gesture
//! handling: a provider returning `None` is a silent no-op, not an error.

use swiperow_core::geometry::RectF;

// ---------------------------------------------------------------------------
// RowSurface
// ---------------------------------------------------------------------------

/// Capability a row view exposes to the binder.
pub trait RowSurface {
    /// Move the content surface horizontally. `x` is always in `[-W, 0]`
    /// for the reveal variant; free for the simple variant.
    fn set_translation(&mut self, x: f32);

    /// Bounding rectangle of the action surface in row-local coordinates,
    /// or `None` if this row carries no action surface.
    fn action_rect(&self) -> Option<RectF>;

    /// Mirror of the rollback flag: true while a close animation owns the
    /// view. Hosts use it to suppress per-row input of their own.
    fn set_rollback(&mut self, active: bool);
}

/// Resolves the surface for a row position at interaction time.
///
/// Resolution happens per effect rather than at attach time because list
/// virtualization recycles views; a position's surface is only meaningful
/// at the moment an effect is applied.
pub trait SurfaceProvider {
    /// The surface for `row`, or `None` if the row is off-screen or does
    /// not implement the capability.
    fn surface(&mut self, row: usize) -> Option<&mut dyn RowSurface>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
