//! Bounded undo/redo stacks with a single pending slot.
//!
//! The ledger only stores snapshots; it never touches the document. The
//! `HistoryController` decides what to capture and when.
//!
//! - Undo stack: oldest entry at the front, newest at the back
//! - Redo stack: entries undone, most recently undone at the back
//! - Pending slot: the before-state of an in-flight transaction
//! - Limits: entry count and estimated bytes, both evicting oldest-first

use std::collections::VecDeque;
use std::time::Instant;

use sl_common::HistoryConfig;

use crate::snapshot::HistorySnapshot;

/// A single entry in the undo/redo history.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// Human-readable label describing the action (e.g., "Move shape", "Crop").
    pub label: String,
    /// The document state at this point in history.
    pub snapshot: HistorySnapshot,
    /// When this entry was created.
    pub timestamp: Instant,
}

impl HistoryEntry {
    pub fn new(label: impl Into<String>, snapshot: HistorySnapshot) -> Self {
        Self {
            label: label.into(),
            snapshot,
            timestamp: Instant::now(),
        }
    }

    pub fn estimated_bytes(&self) -> usize {
        self.snapshot.estimated_bytes()
    }
}

/// Undo/redo stacks plus the pending slot.
///
/// Invariants after every public call:
/// - `undo_len() <= config.max_entries`
/// - `undo_bytes() <= config.max_bytes` unless only one entry remains
/// - at most one pending entry
#[derive(Debug)]
pub struct HistoryLedger {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    pending: Option<HistoryEntry>,
    /// Running sum of `estimated_bytes` over `undo_stack`.
    undo_bytes: usize,
    config: HistoryConfig,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryLedger {
    /// Create an empty ledger. `config` is assumed validated.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            pending: None,
            undo_bytes: 0,
            config,
        }
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    /// Change the limits. Trims the oldest undo entries if needed.
    pub fn set_config(&mut self, config: HistoryConfig) {
        self.config = config;
        self.evict();
        tracing::debug!(
            max_entries = config.max_entries,
            max_bytes = config.max_bytes,
            undo_depth = self.undo_stack.len(),
            "History limits updated"
        );
    }

    /// Arm a pending entry labelled `label`, building its snapshot with
    /// `capture`. The closure receives the newest undo snapshot as the sharing
    /// reference.
    ///
    /// While another entry is pending this is a no-op: `capture` is never
    /// called and the result is `false`.
    pub fn arm_with<F>(&mut self, label: impl Into<String>, capture: F) -> bool
    where
        F: FnOnce(Option<&HistorySnapshot>) -> HistorySnapshot,
    {
        let label = label.into();
        if let Some(pending) = &self.pending {
            tracing::warn!(
                pending = %pending.label,
                ignored = %label,
                "begin called while a snapshot is pending, ignoring"
            );
            return false;
        }
        let snapshot = capture(self.undo_stack.back().map(|e| &e.snapshot));
        tracing::debug!(%label, "Snapshot armed");
        self.pending = Some(HistoryEntry::new(label, snapshot));
        true
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&HistoryEntry> {
        self.pending.as_ref()
    }

    pub fn take_pending(&mut self) -> Option<HistoryEntry> {
        self.pending.take()
    }

    /// Drop the pending entry, if any. Returns whether one was dropped.
    pub fn discard_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(entry) => {
                tracing::debug!(label = %entry.label, "Pending snapshot discarded");
                true
            }
            None => false,
        }
    }

    /// Record a new action: push onto the undo stack, evict, and clear the
    /// redo stack (history is linear).
    pub fn record(&mut self, entry: HistoryEntry) {
        self.redo_stack.clear();
        let label = entry.label.clone();
        self.push_undo(entry);
        tracing::debug!(
            %label,
            undo_depth = self.undo_stack.len(),
            undo_bytes = self.undo_bytes,
            "History entry recorded"
        );
    }

    /// Push onto the undo stack and evict, leaving the redo stack intact.
    pub fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_bytes += entry.estimated_bytes();
        self.undo_stack.push_back(entry);
        self.evict();
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop_back()?;
        self.undo_bytes -= entry.estimated_bytes();
        Some(entry)
    }

    pub fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo_stack.push(entry);
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo_stack.pop()
    }

    /// The newest undo entry: the structural-sharing reference for captures.
    pub fn newest_undo(&self) -> Option<&HistoryEntry> {
        self.undo_stack.back()
    }

    /// Clear both stacks and the pending slot.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
        self.undo_bytes = 0;
        tracing::debug!("History cleared");
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Sum of the undo entries' estimated sizes.
    pub fn undo_bytes(&self) -> usize {
        self.undo_bytes
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.label.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.label.as_str())
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo_stack.iter()
    }

    /// Redo entries, most recently undone last.
    pub fn redo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.redo_stack.iter()
    }

    fn evict(&mut self) {
        while self.undo_stack.len() > self.config.max_entries {
            self.drop_oldest();
        }
        while self.undo_bytes > self.config.max_bytes && self.undo_stack.len() > 1 {
            self.drop_oldest();
        }
    }

    fn drop_oldest(&mut self) {
        if let Some(entry) = self.undo_stack.pop_front() {
            self.undo_bytes -= entry.estimated_bytes();
            tracing::debug!(
                label = %entry.label,
                bytes = entry.estimated_bytes(),
                "Evicted oldest history entry"
            );
        }
    }
}
