#![forbid(unsafe_code)]

//! List glue for the swiperow engine.
//!
//! # Role in swiperow
//! `swiperow-list` connects a [`swiperow_core::SwipeEngine`] to one
//! concrete list: the recognizer attachment, the mutation and scroll
//! notification hooks, tap arbitration, and (for nested lists-of-lists)
//! sibling coordination.
//!
//! # Primary responsibilities
//! - **RowSurface / SurfaceProvider**: the capability a row view exposes.
//! - **InteractionBinder**: applies engine effects to surfaces, drives the
//!   recognizer's explicit forget-after-close, arbitrates taps.
//! - **SiblingCoordinator**: closes open rows across peer nested lists.
//!
//! The binder and coordinator only call engine methods, never touch its
//! state; encapsulation is the whole synchronization discipline in this
//! single-threaded model.

pub mod binder;
pub mod coordinator;
pub mod surface;

pub use binder::{InteractionBinder, TapOutcome};
pub use coordinator::SiblingCoordinator;
pub use surface::{RowSurface, SurfaceProvider};
