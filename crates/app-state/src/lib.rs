//! `sl-app-state` -- Annotation document state and undo/redo history for the
//! Snapline editor.
//!
//! This crate provides:
//!
//! - **`DocumentState`**: The current shape list and canvas bounds, edited directly by the UI.
//! - **`HistorySnapshot`**: Immutable document copy sharing unchanged shapes with older snapshots.
//! - **`HistoryLedger`**: Bounded undo/redo stacks (entry count and byte budget) with a pending slot.
//! - **`HistoryController`**: The begin/commit/discard transaction protocol plus undo/redo.
//!
//! # Architecture
//!
//! ```text
//! HistoryController<D: DocumentAccess>
//! ├── document: D                        (edited directly between begin/commit)
//! └── ledger: HistoryLedger
//!     ├── undo_stack: VecDeque<HistoryEntry>  (oldest evicted first)
//!     ├── redo_stack: Vec<HistoryEntry>       (cleared by every new entry)
//!     └── pending: Option<HistoryEntry>       (before-state of the open transaction)
//!
//! HistorySnapshot
//! ├── shapes: Vec<Arc<Shape>>           (unchanged shapes aliased across snapshots)
//! ├── canvas_bounds: Option<CanvasBounds>
//! └── estimated_bytes                   (drives byte-budget eviction)
//! ```

pub mod controller;
pub mod estimate;
pub mod history;
pub mod snapshot;
pub mod state;

// Re-export primary types at crate root for convenience.
pub use controller::HistoryController;
pub use estimate::{estimate_shape, estimate_snapshot};
pub use history::{HistoryEntry, HistoryLedger};
pub use snapshot::{share_shapes, HistorySnapshot};
pub use state::{DocumentAccess, DocumentState};
