#![forbid(unsafe_code)]

//! Recognizer capability: the host gesture layer the engine drives.
//!
//! The underlying platform recognizer keeps its own latched notion of which
//! row was swiped, independent of the engine's drag state. The two state
//! holders are never assumed to stay in sync implicitly: the contract makes
//! the reset explicit via [`forget`](DragRecognizer::forget), and the engine
//! requests it at the end of every close.
//!
//! # Contract
//!
//! 1. `forget(row)` must drop any latched swipe state for `row`; after it
//!    returns, a fresh drag on that row starts from delta 0.
//! 2. `bind`/`unbind` are idempotent.
//! 3. `set_row_enabled(row, false)` must suppress drag recognition for that
//!    row without affecting others.

// ---------------------------------------------------------------------------
// DragRecognizer
// ---------------------------------------------------------------------------

/// Host-platform horizontal drag recognition, as seen by the binder.
pub trait DragRecognizer {
    /// Attach to the list's scroll surface.
    fn bind(&mut self);

    /// Release the attachment. Must be safe to call when not bound.
    fn unbind(&mut self);

    /// Enable or disable drag recognition for one row. The binder disables
    /// a row when its close animation starts and re-arms it after the
    /// close completes and the row's state is forgotten.
    fn set_row_enabled(&mut self, row: usize, enabled: bool);

    /// Drop latched swipe state for `row` (detach/reattach in platform
    /// terms). Called after every animated close completes.
    fn forget(&mut self, row: usize);
}

// ---------------------------------------------------------------------------
// RecordingRecognizer (test double)
// ---------------------------------------------------------------------------

/// Records every call for later assertion. Test helper only.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct RecordingRecognizer {
    /// Chronological call log.
    pub calls: Vec<RecognizerCall>,
    bound: bool,
}

/// One recorded [`DragRecognizer`] call.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerCall {
    Bind,
    Unbind,
    SetRowEnabled { row: usize, enabled: bool },
    Forget { row: usize },
}

#[cfg(any(test, feature = "test-helpers"))]
impl RecordingRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the recognizer is currently bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Rows passed to `forget`, in call order.
    #[must_use]
    pub fn forgotten_rows(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RecognizerCall::Forget { row } => Some(*row),
                _ => None,
            })
            .collect()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl DragRecognizer for RecordingRecognizer {
    fn bind(&mut self) {
        self.bound = true;
        self.calls.push(RecognizerCall::Bind);
    }

    fn unbind(&mut self) {
        self.bound = false;
        self.calls.push(RecognizerCall::Unbind);
    }

    fn set_row_enabled(&mut self, row: usize, enabled: bool) {
        self.calls.push(RecognizerCall::SetRowEnabled { row, enabled });
    }

    fn forget(&mut self, row: usize) {
        self.calls.push(RecognizerCall::Forget { row });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_recognizer_logs_in_order() {
        let mut rec = RecordingRecognizer::new();
        rec.bind();
        rec.set_row_enabled(3, false);
        rec.forget(3);
        rec.unbind();

        assert_eq!(
            rec.calls,
            vec![
                RecognizerCall::Bind,
                RecognizerCall::SetRowEnabled {
                    row: 3,
                    enabled: false
                },
                RecognizerCall::Forget { row: 3 },
                RecognizerCall::Unbind,
            ]
        );
        assert!(!rec.is_bound());
        assert_eq!(rec.forgotten_rows(), vec![3]);
    }
}
