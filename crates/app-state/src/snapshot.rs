//! Immutable document snapshots with structural sharing.
//!
//! A `HistorySnapshot` stores its shapes as `Arc<Shape>`. When a snapshot is
//! built against a reference snapshot (the newest undo entry), every shape
//! whose content hash matches its same-id counterpart reuses that `Arc`
//! instead of allocating a copy. Dragging one shape among dozens therefore
//! costs one new allocation per history step, and untouched shapes stay
//! shared across arbitrarily long chains of snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use sl_common::{CanvasBounds, Shape, ShapeId};

use crate::estimate::estimate_snapshot;
use crate::state::DocumentAccess;

/// Build the shape list for a new snapshot of `current`.
///
/// Without a reference every shape is copied (first snapshot). With one,
/// shapes that are unchanged since the reference reuse the reference's `Arc`;
/// new or changed shapes are copied.
///
/// Callers must never reuse an id for a different logical shape within one
/// document, or unrelated shapes with equal content could be aliased.
pub fn share_shapes(current: &[Arc<Shape>], reference: Option<&[Arc<Shape>]>) -> Vec<Arc<Shape>> {
    let Some(reference) = reference else {
        return current.iter().map(|s| Arc::new(Shape::clone(s))).collect();
    };

    let previous: HashMap<&ShapeId, &Arc<Shape>> =
        reference.iter().map(|s| (s.id(), s)).collect();

    current
        .iter()
        .map(|shape| match previous.get(shape.id()) {
            Some(prev) if Arc::ptr_eq(prev, shape) => Arc::clone(prev),
            Some(prev) if prev.content_hash() == shape.content_hash() => Arc::clone(prev),
            _ => Arc::new(Shape::clone(shape)),
        })
        .collect()
}

/// An immutable copy of the document at one point in time.
#[derive(Clone, Debug)]
pub struct HistorySnapshot {
    shapes: Vec<Arc<Shape>>,
    canvas_bounds: Option<CanvasBounds>,
    estimated_bytes: usize,
}

impl HistorySnapshot {
    /// Build a snapshot from prepared parts, computing its size estimate.
    pub fn new(shapes: Vec<Arc<Shape>>, canvas_bounds: Option<CanvasBounds>) -> Self {
        let estimated_bytes = estimate_snapshot(&shapes, canvas_bounds.as_ref());
        Self {
            shapes,
            canvas_bounds,
            estimated_bytes,
        }
    }

    /// Capture the document, sharing unchanged shapes with `reference`.
    pub fn capture<D: DocumentAccess + ?Sized>(
        document: &D,
        reference: Option<&HistorySnapshot>,
    ) -> Self {
        let shapes = share_shapes(document.shapes(), reference.map(HistorySnapshot::shapes));
        Self::new(shapes, document.canvas_bounds())
    }

    /// Restore this snapshot into the document.
    ///
    /// The document receives aliases of the snapshot's shapes; any later
    /// in-place edit copies the shape first, so the snapshot stays intact.
    pub fn restore<D: DocumentAccess + ?Sized>(&self, document: &mut D) {
        document.replace_shapes(self.shapes.clone());
        document.replace_canvas_bounds(self.canvas_bounds);
        tracing::debug!(
            shapes = self.shapes.len(),
            bounds = self.canvas_bounds.is_some(),
            "Snapshot restored"
        );
    }

    pub fn shapes(&self) -> &[Arc<Shape>] {
        &self.shapes
    }

    pub fn canvas_bounds(&self) -> Option<CanvasBounds> {
        self.canvas_bounds
    }

    /// Estimated memory footprint in bytes, computed once at construction.
    pub fn estimated_bytes(&self) -> usize {
        self.estimated_bytes
    }

    pub fn find_shape(&self, id: &ShapeId) -> Option<&Arc<Shape>> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Whether both snapshots hold the same allocation for shape `id`.
    pub fn shares_shape_with(&self, other: &HistorySnapshot, id: &ShapeId) -> bool {
        match (self.find_shape(id), other.find_shape(id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Commit-time change check against the live document.
    ///
    /// Compares list length, then ids and cached content hashes pairwise by
    /// position, then the four bounds fields. Cheaper than a field-by-field
    /// comparison because the hashes of untouched shapes are memoized.
    pub fn differs_from<D: DocumentAccess + ?Sized>(&self, document: &D) -> bool {
        let current = document.shapes();
        if current.len() != self.shapes.len() {
            return true;
        }
        let shapes_changed = current.iter().zip(&self.shapes).any(|(now, then)| {
            !Arc::ptr_eq(now, then)
                && (now.id() != then.id() || now.content_hash() != then.content_hash())
        });
        if shapes_changed {
            return true;
        }
        match (document.canvas_bounds(), self.canvas_bounds) {
            (None, None) => false,
            (Some(a), Some(b)) => {
                a.width != b.width
                    || a.height != b.height
                    || a.image_offset_x != b.image_offset_x
                    || a.image_offset_y != b.image_offset_y
            }
            _ => true,
        }
    }
}
