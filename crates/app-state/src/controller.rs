//! Transaction protocol over a document and its history ledger.
//!
//! UI code brackets every undoable edit:
//!
//! ```
//! use sl_app_state::{DocumentState, HistoryController};
//! use sl_common::{Shape, ShapeKind, ShapePatch};
//!
//! let mut editor = HistoryController::new(DocumentState::new());
//!
//! // Instant action (delete, paste, toggle)
//! editor.record_action("Add circle", |doc| {
//!     doc.add_shape(Shape::new("c1", ShapeKind::Circle { x: 0.0, y: 0.0, radius: 4.0 }));
//! });
//!
//! // Gesture: begin on pointer-down, mutate freely, commit on pointer-up
//! editor.begin("Move circle");
//! editor.document_mut().update_shape(&"c1".into(), &ShapePatch::new().with_x(10.0));
//! editor.document_mut().update_shape(&"c1".into(), &ShapePatch::new().with_x(20.0));
//! editor.commit();
//!
//! assert!(editor.undo());
//! assert_eq!(editor.undo_label(), Some("Add circle"));
//! ```
//!
//! All calls are synchronous and expected on one thread of control. A
//! `begin` without a matching `commit`/`discard` leaves the controller armed
//! and swallows later transactions until the next `commit`, `discard`,
//! `undo`, or `redo`.

use sl_common::{ConfigResult, HistoryConfig};

use crate::history::{HistoryEntry, HistoryLedger};
use crate::snapshot::HistorySnapshot;
use crate::state::{DocumentAccess, DocumentState};

/// Undo/redo controller bound to one document.
///
/// Each open editor owns its own controller; nothing is global.
#[derive(Debug)]
pub struct HistoryController<D: DocumentAccess = DocumentState> {
    document: D,
    ledger: HistoryLedger,
}

impl Default for HistoryController<DocumentState> {
    fn default() -> Self {
        Self::new(DocumentState::new())
    }
}

impl<D: DocumentAccess> HistoryController<D> {
    /// Create a controller with the default limits.
    pub fn new(document: D) -> Self {
        Self {
            document,
            ledger: HistoryLedger::default(),
        }
    }

    /// Create a controller with custom limits.
    pub fn with_config(document: D, config: HistoryConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            document,
            ledger: HistoryLedger::new(config),
        })
    }

    /// Change the limits, trimming the oldest undo entries if needed.
    pub fn set_config(&mut self, config: HistoryConfig) -> ConfigResult<()> {
        config.validate()?;
        self.ledger.set_config(config);
        Ok(())
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Direct mutable access for edits between `begin` and `commit`.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Swap in a new document (e.g. switching captures) and clear history.
    /// Returns the previous document.
    pub fn load_document(&mut self, document: D) -> D {
        let previous = std::mem::replace(&mut self.document, document);
        self.ledger.clear();
        previous
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Read-only view of the stacks, for stats and diagnostics.
    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// Snapshot the current document as the before-state of a transaction.
    ///
    /// No-op while another snapshot is pending. Returns whether a snapshot
    /// was taken.
    pub fn begin(&mut self, label: impl Into<String>) -> bool {
        let document = &self.document;
        self.ledger
            .arm_with(label, |reference| HistorySnapshot::capture(document, reference))
    }

    /// Close the transaction opened by `begin`.
    ///
    /// Records the pending snapshot only if the document changed since
    /// `begin`. Returns whether an entry was recorded. No-op without a
    /// pending snapshot.
    pub fn commit(&mut self) -> bool {
        let Some(pending) = self.ledger.take_pending() else {
            return false;
        };
        if !pending.snapshot.differs_from(&self.document) {
            tracing::debug!(label = %pending.label, "No change since begin, nothing recorded");
            return false;
        }
        self.ledger.record(pending);
        true
    }

    /// Drop the pending snapshot without recording anything.
    ///
    /// The document is not rolled back; a cancelled gesture must restore its
    /// own in-flight visual state.
    pub fn discard(&mut self) {
        self.ledger.discard_pending();
    }

    /// `begin`, run `action` against the document, `commit`.
    ///
    /// Returns whether an entry was recorded. If a gesture is already
    /// pending, the action folds into that gesture's entry.
    pub fn record_action<F>(&mut self, label: impl Into<String>, action: F) -> bool
    where
        F: FnOnce(&mut D),
    {
        self.begin(label);
        action(&mut self.document);
        self.commit()
    }

    /// Restore the document to the newest undo entry. Returns false when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.ledger.can_undo() {
            return false;
        }
        self.drop_stuck_pending("undo");

        let current = self.capture();
        let Some(entry) = self.ledger.pop_undo() else {
            return false;
        };
        entry.snapshot.restore(&mut self.document);
        tracing::debug!(
            label = %entry.label,
            undo_remaining = self.ledger.undo_len(),
            "Undo"
        );
        self.ledger.push_redo(HistoryEntry::new(entry.label, current));
        true
    }

    /// Restore the document to the most recently undone state. Returns false
    /// when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.ledger.can_redo() {
            return false;
        }
        self.drop_stuck_pending("redo");

        let current = self.capture();
        let Some(entry) = self.ledger.pop_redo() else {
            return false;
        };
        entry.snapshot.restore(&mut self.document);
        tracing::debug!(
            label = %entry.label,
            redo_remaining = self.ledger.redo_len(),
            "Redo"
        );
        self.ledger.push_undo(HistoryEntry::new(entry.label, current));
        true
    }

    /// Empty both stacks and the pending slot. The document is untouched.
    pub fn clear_history(&mut self) {
        self.ledger.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.ledger.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.ledger.can_redo()
    }

    /// Whether a `begin` is awaiting its `commit`/`discard`.
    pub fn is_pending(&self) -> bool {
        self.ledger.has_pending()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.ledger.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.ledger.redo_label()
    }

    /// Capture the document, sharing unchanged shapes with the newest undo entry.
    fn capture(&self) -> HistorySnapshot {
        let reference = self.ledger.newest_undo().map(|e| &e.snapshot);
        HistorySnapshot::capture(&self.document, reference)
    }

    fn drop_stuck_pending(&mut self, op: &str) {
        if let Some(pending) = self.ledger.take_pending() {
            tracing::warn!(label = %pending.label, op, "Dropping stuck pending snapshot");
        }
    }
}
