#![forbid(unsafe_code)]

//! Interaction binding: glues one engine to one concrete list.
//!
//! The binder owns the three streams the engine cannot see on its own:
//!
//! - the recognizer attachment (bind/unbind, forget-after-close),
//! - list notifications (structural mutation ⇒ hard reset, scroll start
//!   ⇒ animated close),
//! - tap arbitration between "perform the action", "close the open row",
//!   and "pass through to the normal row click".
//!
//! # Tap Arbitration
//!
//! | Engine state | Tap location | Outcome |
//! |--------------|--------------|---------|
//! | row mid-close | anywhere on that row | [`TapOutcome::Ignored`] |
//! | no row open | any row | [`TapOutcome::PassThrough`] (click fires) |
//! | row open | open row's action surface (± slop) | [`TapOutcome::Action`] (action fires, then close) |
//! | row open | anywhere else | [`TapOutcome::CloseOnly`] (click suppressed) |
//!
//! The first tap while a row is open is always consumed: it either fires
//! the action or closes the row, never both, and never the row click.
//!
//! # Failure Modes
//!
//! - Rows whose provider returns no surface are skipped silently.
//! - A panicking action callback propagates to the caller; the engine's
//!   visual state is untouched until the callback returns, so a host that
//!   recovers sees the row still open.

use std::cell::RefCell;
use std::rc::Rc;

use swiperow_core::engine::{EngineId, SwipeEffect, SwipeEngine};
use swiperow_core::geometry::PointF;
use swiperow_core::recognizer::DragRecognizer;
use web_time::Instant;

use crate::coordinator::SiblingCoordinator;
use crate::surface::SurfaceProvider;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a tap was arbitrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Hit the open row's action surface: action callback fired, close
    /// started.
    Action,
    /// A row was open: tap consumed to close it, row click suppressed.
    CloseOnly,
    /// Nothing open: tap handed to the normal row click handler.
    PassThrough,
    /// The tapped row is mid-close: tap dropped entirely.
    Ignored,
}

type RowCallback = Box<dyn FnMut(usize)>;
type CommitCallback = Box<dyn FnMut(usize, bool)>;

/// Glues a [`SwipeEngine`] to one list's recognizer, notifications, and
/// callbacks.
pub struct InteractionBinder<R: DragRecognizer> {
    engine: Rc<RefCell<SwipeEngine>>,
    recognizer: R,
    coordinator: Option<Rc<RefCell<SiblingCoordinator>>>,
    on_action: Option<RowCallback>,
    on_click: Option<RowCallback>,
    on_commit: Option<CommitCallback>,
    attached: bool,
}

impl<R: DragRecognizer> std::fmt::Debug for InteractionBinder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionBinder")
            .field("engine", &self.engine.borrow().id())
            .field("attached", &self.attached)
            .field("coordinated", &self.coordinator.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<R: DragRecognizer> InteractionBinder<R> {
    /// Create an unattached binder.
    #[must_use]
    pub fn new(engine: Rc<RefCell<SwipeEngine>>, recognizer: R) -> Self {
        Self {
            engine,
            recognizer,
            coordinator: None,
            on_action: None,
            on_click: None,
            on_commit: None,
            attached: false,
        }
    }

    /// Join a sibling coordinator (builder pattern). Registration happens
    /// on [`attach`](InteractionBinder::attach).
    #[must_use]
    pub fn with_coordinator(mut self, coordinator: Rc<RefCell<SiblingCoordinator>>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    /// Callback for taps inside the action surface, invoked synchronously
    /// *before* the close animation starts (builder pattern).
    #[must_use]
    pub fn on_action(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_action = Some(Box::new(callback));
        self
    }

    /// Normal row click callback, invoked only on pass-through (builder
    /// pattern).
    #[must_use]
    pub fn on_row_click(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }

    /// Release verdict callback `(row, committed)`. The dismissal variant's
    /// hosts use this to remove the row (builder pattern).
    #[must_use]
    pub fn on_commit(mut self, callback: impl FnMut(usize, bool) + 'static) -> Self {
        self.on_commit = Some(Box::new(callback));
        self
    }

    /// The bound engine.
    #[must_use]
    pub fn engine(&self) -> &Rc<RefCell<SwipeEngine>> {
        &self.engine
    }

    /// The recognizer binding (mainly for tests and host wiring).
    #[must_use]
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl<R: DragRecognizer> InteractionBinder<R> {
    /// Bind the recognizer and register with the coordinator. Idempotent.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.recognizer.bind();
        if let Some(coordinator) = &self.coordinator {
            coordinator.borrow_mut().register(&self.engine);
        }
        self.attached = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(engine = ?self.engine.borrow().id(), "binder attached");
    }

    /// Unbind and unregister. Idempotent and safe on the teardown path.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.recognizer.unbind();
        if let Some(coordinator) = &self.coordinator {
            let id = self.engine.borrow().id();
            coordinator.borrow_mut().unregister(id);
        }
        self.attached = false;

        #[cfg(feature = "tracing")]
        tracing::debug!(engine = ?self.engine.borrow().id(), "binder detached");
    }

    /// Whether the binder is currently attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The bound list reported a structural change (insert/remove/move/
    /// update). Positions are no longer trustworthy: unconditional hard
    /// reset, never index translation.
    pub fn notify_mutated(&mut self) {
        self.engine.borrow_mut().hard_reset();
    }

    /// The bound list started scroll-dragging: close the open row.
    pub fn notify_scroll_began(&mut self, now: Instant, surfaces: &mut dyn SurfaceProvider) {
        let effects = self.engine.borrow_mut().close_open(now, true);
        self.apply_effects(&effects, surfaces);
    }
}

// ---------------------------------------------------------------------------
// Drag and animation forwarding
// ---------------------------------------------------------------------------

impl<R: DragRecognizer> InteractionBinder<R> {
    /// A drag began on `row`. Applies local effects and, when the drag is
    /// accepted, fans a close request out to sibling lists.
    ///
    /// Sibling effects are returned keyed by engine id for the host to
    /// route to each sibling binder via
    /// [`apply_effects`](InteractionBinder::apply_effects).
    pub fn drag_started(
        &mut self,
        row: usize,
        now: Instant,
        surfaces: &mut dyn SurfaceProvider,
    ) -> Vec<(EngineId, Vec<SwipeEffect>)> {
        let (effects, accepted, id) = {
            let mut engine = self.engine.borrow_mut();
            let was_dragging = engine.dragging_row();
            let effects = engine.drag_start(row, now);
            let accepted = was_dragging.is_none() && engine.dragging_row() == Some(row);
            (effects, accepted, engine.id())
        };
        self.apply_effects(&effects, surfaces);
        if !accepted {
            return Vec::new();
        }
        match &self.coordinator {
            Some(coordinator) => coordinator.borrow_mut().close_others(id, now),
            None => Vec::new(),
        }
    }

    /// Forward a drag sample.
    pub fn drag_moved(&mut self, dx: f32, surfaces: &mut dyn SurfaceProvider) {
        let effects = self.engine.borrow_mut().drag_move(dx);
        self.apply_effects(&effects, surfaces);
    }

    /// Forward a drag release.
    pub fn drag_released(&mut self, dx: f32, now: Instant, surfaces: &mut dyn SurfaceProvider) {
        let effects = self.engine.borrow_mut().drag_release(dx, now);
        self.apply_effects(&effects, surfaces);
    }

    /// Pump close animations one frame.
    pub fn advance(&mut self, now: Instant, surfaces: &mut dyn SurfaceProvider) {
        let effects = self.engine.borrow_mut().advance(now);
        self.apply_effects(&effects, surfaces);
    }

    /// Apply engine effects to surfaces, the recognizer, and callbacks.
    pub fn apply_effects(&mut self, effects: &[SwipeEffect], surfaces: &mut dyn SurfaceProvider) {
        for effect in effects {
            match *effect {
                SwipeEffect::Translate { row, x } => {
                    if let Some(surface) = surfaces.surface(row) {
                        surface.set_translation(x);
                    }
                }
                SwipeEffect::CloseBegan { row } => {
                    if let Some(surface) = surfaces.surface(row) {
                        surface.set_rollback(true);
                    }
                    // The engine gates re-drags of a closing row; the
                    // recognizer is told the same so it never latches a
                    // gesture the engine will drop.
                    self.recognizer.set_row_enabled(row, false);
                }
                SwipeEffect::CloseEnded { row } => {
                    if let Some(surface) = surfaces.surface(row) {
                        surface.set_rollback(false);
                    }
                    // The recognizer keeps its own latched notion of the
                    // swiped row; every close ends with an explicit forget
                    // before the row is re-armed.
                    self.recognizer.forget(row);
                    self.recognizer.set_row_enabled(row, true);
                }
                SwipeEffect::Committed { row, outcome } => {
                    if let Some(callback) = self.on_commit.as_mut() {
                        callback(row, outcome.is_open());
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tap arbitration
// ---------------------------------------------------------------------------

impl<R: DragRecognizer> InteractionBinder<R> {
    /// Arbitrate a tap on `row` at `point` (row-local coordinates).
    pub fn on_tap(
        &mut self,
        row: usize,
        point: PointF,
        now: Instant,
        surfaces: &mut dyn SurfaceProvider,
    ) -> TapOutcome {
        let (closing, open, slop) = {
            let engine = self.engine.borrow();
            (
                engine.is_closing(row),
                engine.open_row(),
                engine.config().tap_slop,
            )
        };

        // A tap landing mid-animation is dropped: movement gating already
        // blocks a drag, and the arbiter must not re-trigger the close.
        if closing {
            return TapOutcome::Ignored;
        }

        let Some(open_row) = open else {
            if let Some(callback) = self.on_click.as_mut() {
                callback(row);
            }
            return TapOutcome::PassThrough;
        };

        if row == open_row {
            let hit = surfaces
                .surface(open_row)
                .and_then(|s| s.action_rect())
                .is_some_and(|rect| rect.contains_with_slop(point, slop));
            if hit {
                // Action fires before the close starts; a failure inside
                // the callback propagates but does not keep the row open
                // once control returns here.
                if let Some(callback) = self.on_action.as_mut() {
                    callback(row);
                }
                let effects = self.engine.borrow_mut().close_open(now, true);
                self.apply_effects(&effects, surfaces);
                return TapOutcome::Action;
            }
        }

        // Anything else while a row is open: consume the tap to close it.
        let effects = self.engine.borrow_mut().close_open(now, true);
        self.apply_effects(&effects, surfaces);
        TapOutcome::CloseOnly
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
