#![forbid(unsafe_code)]

//! Sibling coordination for nested lists.
//!
//! When rows live inside nested scrollable sub-lists (day rows inside a
//! month section, months inside an outer list), opening a row in one
//! sub-list must close any open row in every *sibling* sub-list. Siblings
//! are whatever engines registered with the same coordinator instance;
//! there is no global open-row invariant across the screen.
//!
//! Engines are held weakly: a child list tearing down without
//! unregistering is pruned on the next fan-out rather than kept alive.
//!
//! # Invariants
//!
//! 1. `close_others` never calls back into the requesting engine.
//! 2. Fan-out order is deterministic (ascending engine id).
//! 3. Registration is idempotent per engine id.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use swiperow_core::engine::{EngineId, SwipeEffect, SwipeEngine};
use web_time::Instant;

/// Fans close requests out across peer engines of nested sibling lists.
#[derive(Default)]
pub struct SiblingCoordinator {
    engines: AHashMap<EngineId, Weak<RefCell<SwipeEngine>>>,
}

impl std::fmt::Debug for SiblingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiblingCoordinator")
            .field("registered", &self.engines.len())
            .finish()
    }
}

impl SiblingCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child engine. Re-registering the same engine replaces
    /// its handle.
    pub fn register(&mut self, engine: &Rc<RefCell<SwipeEngine>>) {
        let id = engine.borrow().id();
        self.engines.insert(id, Rc::downgrade(engine));
    }

    /// Remove a child engine. Unknown ids are a no-op.
    pub fn unregister(&mut self, id: EngineId) {
        self.engines.remove(&id);
    }

    /// Number of live registered engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engines
            .values()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Whether no live engines are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close the open row of every registered engine except `requester`.
    ///
    /// Returns the effects each sibling emitted, keyed by engine id, for
    /// the host to route to that sibling's surfaces. Dead handles are
    /// pruned as a side effect.
    pub fn close_others(
        &mut self,
        requester: EngineId,
        now: Instant,
    ) -> Vec<(EngineId, Vec<SwipeEffect>)> {
        self.engines.retain(|_, weak| weak.strong_count() > 0);

        let mut ids: Vec<EngineId> = self.engines.keys().copied().collect();
        ids.sort_unstable();

        let mut out = Vec::new();
        for id in ids {
            if id == requester {
                continue;
            }
            let Some(engine) = self.engines.get(&id).and_then(Weak::upgrade) else {
                continue;
            };
            let effects = engine.borrow_mut().close_open(now, true);
            if !effects.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::trace!(requester = ?requester, sibling = ?id, "sibling close");
                out.push((id, effects));
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
