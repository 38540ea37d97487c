#![forbid(unsafe_code)]

//! The per-list swipe state machine.
//!
//! A [`SwipeEngine`] tracks at most one dragging row and at most one open
//! row, both by list position. Positions are not stable identity: any
//! structural change to the bound list must be answered with
//! [`hard_reset`](SwipeEngine::hard_reset), never by translating old
//! indices to new ones.
//!
//! # State Machine
//!
//! Per row: `Closed` → `Dragging` → `Open` → `Closing` → `Closed`.
//!
//! - `Closed → Dragging`: drag start, gated (see below).
//! - `Dragging → Open`: release past the variant's opening threshold.
//! - `Dragging → Closed`: release short of the threshold (snap, no
//!   animation), or an open row released past the closing threshold.
//! - `Open → Closing`: a new drag starting elsewhere, a tap, or an
//!   external close request; animated.
//! - `Closing → Closed`: animation completes; the recognizer must forget
//!   its latched state for the row ([`SwipeEffect::CloseEnded`]).
//! - any → `Closed`: `hard_reset` on list mutation, unconditional.
//!
//! # Invariants
//!
//! 1. At most one row is `Dragging` and at most one is `Open` at any time;
//!    they may be different rows simultaneously (auto-close in flight).
//! 2. A row with an outstanding close animation cannot start a new drag
//!    (the rollback flag gates it).
//! 3. Only leftward motion is rendered; rightward drag on a closed row is
//!    a no-op pass-through.
//! 4. `hard_reset` clears positions immediately; in-flight animations are
//!    not cancelled and still clear their own rollback flags on completion.
//!
//! # Failure Modes
//!
//! - Drag start while another row drags, or on a closing row: silently
//!   ignored (empty effect list), never an error.
//! - Release without a tracked drag: ignored.
//!
//! All methods take `now` explicitly and emit [`SwipeEffect`]s instead of
//! touching views, so every sequence is deterministic under test.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use web_time::Instant;

use crate::animation::CloseAnimation;
use crate::config::SwipeConfig;
use crate::variant::{CommitOutcome, SwipeVariant};

// ---------------------------------------------------------------------------
// Identity and state types
// ---------------------------------------------------------------------------

/// Process-unique engine identity, used for sibling-coordinator
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(u64);

impl EngineId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Observable state of one row position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// At rest, translation 0.
    Closed,
    /// Actively tracked by a drag.
    Dragging,
    /// Parked at the revealed offset.
    Open,
    /// Owned by an in-flight close animation (rollback flag set).
    Closing,
}

/// Output events the binder applies to row surfaces and the recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEffect {
    /// Set the row's content-surface translation.
    Translate { row: usize, x: f32 },
    /// An animated close began; the row's rollback flag is now set.
    CloseBegan { row: usize },
    /// A close finished. The consumer must clear the rollback mirror and
    /// call [`forget`](crate::recognizer::DragRecognizer::forget) for the
    /// row; the paired `Translate { x: 0.0 }` precedes this effect.
    CloseEnded { row: usize },
    /// A release was decided. For non-persistent variants this is the
    /// commit/no-commit report.
    Committed { row: usize, outcome: CommitOutcome },
}

// ---------------------------------------------------------------------------
// SwipeEngine
// ---------------------------------------------------------------------------

/// Per-list gesture engine. Owns the drag state exclusively; binders and
/// coordinators only call methods, never touch state.
pub struct SwipeEngine {
    id: EngineId,
    config: SwipeConfig,
    variant: Box<dyn SwipeVariant>,
    dragging: Option<usize>,
    open: Option<usize>,
    /// Rows owned by an in-flight close animation. Presence in this map is
    /// the rollback flag.
    closing: AHashMap<usize, CloseAnimation>,
}

impl std::fmt::Debug for SwipeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeEngine")
            .field("id", &self.id)
            .field("dragging", &self.dragging)
            .field("open", &self.open)
            .field("closing", &self.closing.len())
            .finish_non_exhaustive()
    }
}

impl SwipeEngine {
    /// Create an engine for one list with the given variant strategy.
    #[must_use]
    pub fn new(variant: impl SwipeVariant + 'static, config: SwipeConfig) -> Self {
        Self {
            id: EngineId::next(),
            config,
            variant: Box::new(variant),
            dragging: None,
            open: None,
            closing: AHashMap::new(),
        }
    }

    /// This engine's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> EngineId {
        self.id
    }

    /// The engine's configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// The currently open row, if any.
    #[inline]
    #[must_use]
    pub fn open_row(&self) -> Option<usize> {
        self.open
    }

    /// The currently dragging row, if any.
    #[inline]
    #[must_use]
    pub fn dragging_row(&self) -> Option<usize> {
        self.dragging
    }

    /// Whether `row` has an outstanding close animation (rollback flag).
    #[inline]
    #[must_use]
    pub fn is_closing(&self, row: usize) -> bool {
        self.closing.contains_key(&row)
    }

    /// Observable state of `row`. A row that is both open and re-dragged
    /// reports `Dragging`.
    #[must_use]
    pub fn state_of(&self, row: usize) -> RowState {
        if self.closing.contains_key(&row) {
            RowState::Closing
        } else if self.dragging == Some(row) {
            RowState::Dragging
        } else if self.open == Some(row) {
            RowState::Open
        } else {
            RowState::Closed
        }
    }

    // -- drag lifecycle -----------------------------------------------------

    /// Begin tracking a drag on `row`.
    ///
    /// Gated: ignored while another row drags, and ignored while `row`
    /// itself is mid-close (a tap or drag landing during the animation must
    /// not corrupt state). If a *different* row is open, it transitions to
    /// `Closing` synchronously and the new drag proceeds independently.
    pub fn drag_start(&mut self, row: usize, now: Instant) -> Vec<SwipeEffect> {
        if self.dragging.is_some() || self.closing.contains_key(&row) {
            return Vec::new();
        }

        let mut out = Vec::new();
        if let Some(open) = self.open
            && open != row
        {
            self.begin_close(open, now, &mut out);
        }
        self.dragging = Some(row);

        #[cfg(feature = "tracing")]
        tracing::trace!(engine = self.id.0, row, "drag start");

        out
    }

    /// Render a drag sample. `dx` is the raw recognizer delta: signed,
    /// positive = rightward, measured across the full row width.
    pub fn drag_move(&mut self, dx: f32) -> Vec<SwipeEffect> {
        let Some(row) = self.dragging else {
            return Vec::new();
        };
        let already_open = self.open == Some(row);
        // Rightward drag on a closed row is a no-op pass-through.
        if dx >= 0.0 && !already_open {
            return Vec::new();
        }
        vec![SwipeEffect::Translate {
            row,
            x: self.variant.render_offset(dx, already_open),
        }]
    }

    /// Decide the outcome of a release at final delta `dx`.
    pub fn drag_release(&mut self, dx: f32, _now: Instant) -> Vec<SwipeEffect> {
        let Some(row) = self.dragging.take() else {
            return Vec::new();
        };
        let already_open = self.open == Some(row);
        let outcome = self.variant.decide_commit(dx, already_open);

        #[cfg(feature = "tracing")]
        tracing::debug!(engine = self.id.0, row, dx, ?outcome, "drag release");

        let mut out = Vec::new();
        match outcome {
            CommitOutcome::Open if self.variant.persists_open() => {
                self.open = Some(row);
                out.push(SwipeEffect::Translate {
                    row,
                    x: self.variant.rest_offset(),
                });
            }
            CommitOutcome::Open => {
                // Non-persistent variant: commit is reported, the host
                // owns what happens to the row (typically removal).
            }
            CommitOutcome::Closed => {
                out.push(SwipeEffect::Translate { row, x: 0.0 });
                if already_open {
                    // The open row closed by release: the recognizer's
                    // latched state must be dropped too.
                    self.open = None;
                    out.push(SwipeEffect::CloseEnded { row });
                }
            }
        }
        out.push(SwipeEffect::Committed { row, outcome });
        out
    }

    // -- external close requests ---------------------------------------------

    /// Close the open row, if any. Animated closes set the rollback flag
    /// and complete through [`advance`](SwipeEngine::advance); instant
    /// closes emit their terminal effects immediately.
    ///
    /// If the open row is also mid-drag (a scroll stealing the gesture),
    /// the drag is abandoned.
    pub fn close_open(&mut self, now: Instant, animated: bool) -> Vec<SwipeEffect> {
        let Some(row) = self.open else {
            return Vec::new();
        };
        if self.dragging == Some(row) {
            self.dragging = None;
        }

        let mut out = Vec::new();
        if animated {
            self.begin_close(row, now, &mut out);
        } else {
            self.open = None;
            out.push(SwipeEffect::Translate { row, x: 0.0 });
            out.push(SwipeEffect::CloseEnded { row });
        }
        out
    }

    /// Abandon any drag and close the open row (animated). Used by
    /// sibling coordination and explicit UI requests.
    pub fn close_all(&mut self, now: Instant) -> Vec<SwipeEffect> {
        self.dragging = None;
        self.close_open(now, true)
    }

    /// Unconditional position invalidation after a list mutation.
    ///
    /// Both positions are cleared immediately; in-flight close animations
    /// are not cancelled (they complete through `advance` and clear their
    /// own rollback flags), but no decision logic trusts them anymore.
    pub fn hard_reset(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            engine = self.id.0,
            dragging = ?self.dragging,
            open = ?self.open,
            "hard reset"
        );

        self.dragging = None;
        self.open = None;
    }

    // -- animation pump ------------------------------------------------------

    /// Advance all close animations to `now`, emitting per-frame
    /// translations and, for completed closes, the terminal
    /// `Translate { x: 0.0 }` + [`SwipeEffect::CloseEnded`] pair.
    ///
    /// Call once per frame while [`has_active_closes`](SwipeEngine::has_active_closes).
    pub fn advance(&mut self, now: Instant) -> Vec<SwipeEffect> {
        if self.closing.is_empty() {
            return Vec::new();
        }

        // Hash order is not deterministic; sort rows so effect order is.
        let mut rows: Vec<usize> = self.closing.keys().copied().collect();
        rows.sort_unstable();

        let mut out = Vec::new();
        for row in rows {
            let Some(anim) = self.closing.get(&row).copied() else {
                continue;
            };
            if anim.is_complete(now) {
                self.closing.remove(&row);
                out.push(SwipeEffect::Translate { row, x: 0.0 });
                out.push(SwipeEffect::CloseEnded { row });
            } else {
                out.push(SwipeEffect::Translate {
                    row,
                    x: anim.value(now),
                });
            }
        }
        out
    }

    /// Whether any close animation is still in flight.
    #[must_use]
    pub fn has_active_closes(&self) -> bool {
        !self.closing.is_empty()
    }

    // -- internal ------------------------------------------------------------

    fn begin_close(&mut self, row: usize, now: Instant, out: &mut Vec<SwipeEffect>) {
        self.open = None;
        self.closing.insert(
            row,
            CloseAnimation::new(self.variant.rest_offset(), now, self.config.close_duration),
        );
        out.push(SwipeEffect::CloseBegan { row });

        #[cfg(feature = "tracing")]
        tracing::trace!(engine = self.id.0, row, "close began");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RowExtent;
    use crate::variant::{RevealWithAction, SimpleSwipe};
    use std::time::Duration;

    const MS_250: Duration = Duration::from_millis(250);

    fn engine() -> SwipeEngine {
        SwipeEngine::new(
            RevealWithAction::new(RowExtent::new(400.0, 80.0)),
            SwipeConfig::default(),
        )
    }

    fn t0() -> Instant {
        Instant::now()
    }

    fn open_row(engine: &mut SwipeEngine, row: usize, now: Instant) {
        engine.drag_start(row, now);
        engine.drag_move(-50.0);
        engine.drag_release(-50.0, now);
        assert_eq!(engine.state_of(row), RowState::Open);
    }

    // --- drag lifecycle ---

    #[test]
    fn drag_past_threshold_opens() {
        let mut e = engine();
        let t = t0();

        assert!(e.drag_start(1, t).is_empty());
        assert_eq!(e.state_of(1), RowState::Dragging);

        let effects = e.drag_move(-50.0);
        assert_eq!(effects, vec![SwipeEffect::Translate { row: 1, x: -50.0 }]);

        let effects = e.drag_release(-50.0, t);
        assert_eq!(
            effects,
            vec![
                SwipeEffect::Translate { row: 1, x: -80.0 },
                SwipeEffect::Committed {
                    row: 1,
                    outcome: CommitOutcome::Open
                },
            ]
        );
        assert_eq!(e.open_row(), Some(1));
    }

    #[test]
    fn short_drag_snaps_back_closed() {
        let mut e = engine();
        let t = t0();

        e.drag_start(1, t);
        let effects = e.drag_release(-30.0, t);
        assert_eq!(
            effects,
            vec![
                SwipeEffect::Translate { row: 1, x: 0.0 },
                SwipeEffect::Committed {
                    row: 1,
                    outcome: CommitOutcome::Closed
                },
            ]
        );
        assert_eq!(e.state_of(1), RowState::Closed);
        assert!(!e.has_active_closes());
    }

    #[test]
    fn rightward_drag_is_passthrough() {
        let mut e = engine();
        let t = t0();

        e.drag_start(1, t);
        assert!(e.drag_move(40.0).is_empty());
        let effects = e.drag_release(40.0, t);
        assert!(matches!(
            effects.last(),
            Some(SwipeEffect::Committed {
                outcome: CommitOutcome::Closed,
                ..
            })
        ));
    }

    #[test]
    fn release_without_drag_ignored() {
        let mut e = engine();
        assert!(e.drag_release(-50.0, t0()).is_empty());
        assert!(e.drag_move(-50.0).is_empty());
    }

    // --- gating ---

    #[test]
    fn second_drag_while_dragging_ignored() {
        let mut e = engine();
        let t = t0();

        e.drag_start(1, t);
        assert!(e.drag_start(2, t).is_empty());
        assert_eq!(e.dragging_row(), Some(1));
        assert_eq!(e.state_of(2), RowState::Closed);
    }

    #[test]
    fn drag_on_closing_row_ignored() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        e.close_open(t, true);
        assert_eq!(e.state_of(1), RowState::Closing);

        // Rollback flag gates a new drag on the same row.
        assert!(e.drag_start(1, t + Duration::from_millis(10)).is_empty());
        assert_eq!(e.dragging_row(), None);
    }

    #[test]
    fn drag_on_other_row_mid_close_allowed() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        e.close_open(t, true);

        // The two rows are independent: reentrancy is tolerated.
        assert!(e.drag_start(2, t + Duration::from_millis(10)).is_empty());
        assert_eq!(e.dragging_row(), Some(2));
        assert_eq!(e.state_of(1), RowState::Closing);
    }

    // --- auto-close on new drag ---

    #[test]
    fn new_drag_auto_closes_open_row() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        let effects = e.drag_start(2, t);
        assert_eq!(effects, vec![SwipeEffect::CloseBegan { row: 1 }]);
        assert_eq!(e.state_of(1), RowState::Closing);
        assert_eq!(e.state_of(2), RowState::Dragging);
        assert_eq!(e.open_row(), None);
    }

    #[test]
    fn redrag_of_open_row_does_not_close_it() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        assert!(e.drag_start(1, t).is_empty());
        assert_eq!(e.open_row(), Some(1));
        assert_eq!(e.state_of(1), RowState::Dragging);
    }

    // --- hysteresis ---

    #[test]
    fn open_row_survives_release_short_of_closing_threshold() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        e.drag_start(1, t);
        // 0.75 of the row width, below the 0.9 closing threshold.
        let effects = e.drag_release(-300.0, t);
        assert_eq!(e.open_row(), Some(1));
        assert!(effects.contains(&SwipeEffect::Translate { row: 1, x: -80.0 }));
    }

    #[test]
    fn open_row_closes_past_closing_threshold() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        e.drag_start(1, t);
        let effects = e.drag_release(-360.0, t);
        assert_eq!(e.open_row(), None);
        assert_eq!(e.state_of(1), RowState::Closed);
        // Release-driven close still requires the recognizer to forget.
        assert!(effects.contains(&SwipeEffect::CloseEnded { row: 1 }));
    }

    // --- close animation pump ---

    #[test]
    fn animated_close_runs_to_completion() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        let effects = e.close_open(t, true);
        assert_eq!(effects, vec![SwipeEffect::CloseBegan { row: 1 }]);
        assert!(e.has_active_closes());

        // Mid-flight frame: translation strictly between -80 and 0.
        let frames = e.advance(t + Duration::from_millis(125));
        assert_eq!(frames.len(), 1);
        if let SwipeEffect::Translate { row, x } = frames[0] {
            assert_eq!(row, 1);
            assert!(x > -80.0 && x < 0.0, "mid-flight x: {x}");
        } else {
            panic!("expected Translate, got {:?}", frames[0]);
        }

        let frames = e.advance(t + MS_250);
        assert_eq!(
            frames,
            vec![
                SwipeEffect::Translate { row: 1, x: 0.0 },
                SwipeEffect::CloseEnded { row: 1 },
            ]
        );
        assert!(!e.has_active_closes());
        assert_eq!(e.state_of(1), RowState::Closed);
    }

    #[test]
    fn instant_close_emits_terminal_effects() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        let effects = e.close_open(t, false);
        assert_eq!(
            effects,
            vec![
                SwipeEffect::Translate { row: 1, x: 0.0 },
                SwipeEffect::CloseEnded { row: 1 },
            ]
        );
        assert!(!e.has_active_closes());
    }

    #[test]
    fn close_open_without_open_row_is_noop() {
        let mut e = engine();
        assert!(e.close_open(t0(), true).is_empty());
    }

    #[test]
    fn advance_with_no_closes_is_empty() {
        let mut e = engine();
        assert!(e.advance(t0()).is_empty());
    }

    #[test]
    fn advance_orders_multiple_closes_by_row() {
        let mut e = engine();
        let t = t0();

        // Two closes in flight via open → new drag → hard interleaving.
        open_row(&mut e, 3, t);
        e.drag_start(1, t); // auto-closes 3
        e.drag_release(-50.0, t); // opens 1
        e.close_open(t, true); // closes 1

        let frames = e.advance(t + Duration::from_millis(10));
        let rows: Vec<usize> = frames
            .iter()
            .map(|f| match f {
                SwipeEffect::Translate { row, .. } => *row,
                SwipeEffect::CloseBegan { row }
                | SwipeEffect::CloseEnded { row }
                | SwipeEffect::Committed { row, .. } => *row,
            })
            .collect();
        assert_eq!(rows, vec![1, 3]);
    }

    // --- hard reset ---

    #[test]
    fn hard_reset_clears_positions_immediately() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        e.drag_start(2, t); // row 1 now closing, row 2 dragging
        e.hard_reset();

        assert_eq!(e.open_row(), None);
        assert_eq!(e.dragging_row(), None);
        // The in-flight animation is not cancelled.
        assert!(e.has_active_closes());

        // It still completes and clears its own rollback flag.
        let frames = e.advance(t + MS_250);
        assert!(frames.contains(&SwipeEffect::CloseEnded { row: 1 }));
        assert!(!e.has_active_closes());
    }

    #[test]
    fn close_all_abandons_drag() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        e.drag_start(2, t);
        // The first close (auto-close of row 1) is already in flight; this
        // drops the drag on row 2.
        e.close_all(t);
        assert_eq!(e.dragging_row(), None);
        assert_eq!(e.open_row(), None);
    }

    #[test]
    fn scroll_close_abandons_drag_of_open_row() {
        let mut e = engine();
        let t = t0();

        open_row(&mut e, 1, t);
        e.drag_start(1, t);
        let effects = e.close_open(t, true);
        assert_eq!(effects, vec![SwipeEffect::CloseBegan { row: 1 }]);
        assert_eq!(e.dragging_row(), None);
    }

    // --- simple variant through the engine ---

    #[test]
    fn simple_variant_commit_does_not_persist() {
        let mut e = SwipeEngine::new(SimpleSwipe::new(400.0), SwipeConfig::default());
        let t = t0();

        e.drag_start(0, t);
        let effects = e.drag_move(-250.0);
        assert_eq!(effects, vec![SwipeEffect::Translate { row: 0, x: -250.0 }]);

        let effects = e.drag_release(-250.0, t);
        assert_eq!(
            effects,
            vec![SwipeEffect::Committed {
                row: 0,
                outcome: CommitOutcome::Open
            }]
        );
        assert_eq!(e.open_row(), None);
        assert_eq!(e.state_of(0), RowState::Closed);
    }

    // --- identity ---

    #[test]
    fn engine_ids_are_unique() {
        let a = engine();
        let b = engine();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn debug_format() {
        let e = engine();
        assert!(format!("{e:?}").contains("SwipeEngine"));
    }
}
