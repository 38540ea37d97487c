#![forbid(unsafe_code)]

//! Core: the swipe-to-reveal gesture engine for list rows.
//!
//! # Role in swiperow
//! `swiperow-core` is the decision layer. It owns per-list drag state,
//! threshold math, and close animations, and emits [`engine::SwipeEffect`]
//! values that the list layer (`swiperow-list`) applies to row surfaces.
//!
//! # Primary responsibilities
//! - **SwipeEngine**: the per-list state machine (`Closed` / `Dragging` /
//!   `Open` / `Closing`), gating, auto-close, and hard reset.
//! - **Variants**: [`variant::RevealWithAction`] (clamped, hysteretic) and
//!   [`variant::SimpleSwipe`] (free-sliding dismissal) behind one strategy
//!   seam.
//! - **Geometry**: extents, thresholds, and translation clamping.
//! - **Recognizer contract**: the explicit `forget(row)` capability that
//!   keeps the host gesture layer and the engine from drifting apart.
//!
//! # How it fits in the system
//! The engine knows nothing about what rows mean; it operates purely on
//! integer positions in one list. Positions are not stable identity, so
//! the binder answers every structural list change with
//! [`engine::SwipeEngine::hard_reset`].

pub mod animation;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod recognizer;
pub mod variant;

pub use config::SwipeConfig;
pub use engine::{EngineId, RowState, SwipeEffect, SwipeEngine};
pub use geometry::{PointF, RectF, RowExtent};
pub use variant::{CommitOutcome, RevealWithAction, SimpleSwipe, SwipeVariant};
