//! Annotation document state.
//!
//! `DocumentState` holds the current shape list and canvas bounds. It knows
//! nothing about history: drag handlers, property panels, and paste all
//! mutate it through the plain setters, and the `HistoryController` observes
//! the before/after through [`DocumentAccess`].

use std::sync::Arc;

use sl_common::{CanvasBounds, ImageSize, Shape, ShapeId, ShapePatch};

/// Read/restore handle the history controller needs from a document.
///
/// `replace_shapes`/`replace_canvas_bounds` are only called while restoring
/// a snapshot during undo/redo.
pub trait DocumentAccess {
    fn shapes(&self) -> &[Arc<Shape>];
    fn canvas_bounds(&self) -> Option<CanvasBounds>;
    fn replace_shapes(&mut self, shapes: Vec<Arc<Shape>>);
    fn replace_canvas_bounds(&mut self, bounds: Option<CanvasBounds>);
}

/// The single source of truth for the annotation canvas.
///
/// Shapes are held behind `Arc` so history snapshots can alias unchanged
/// shapes. Every in-place edit goes through `Arc::make_mut`, which copies a
/// shape that a snapshot still references instead of writing through it.
#[derive(Clone, Debug, Default)]
pub struct DocumentState {
    shapes: Vec<Arc<Shape>>,
    canvas_bounds: Option<CanvasBounds>,
    /// Dimensions of the underlying capture, if an image is loaded.
    pub original_image_size: Option<ImageSize>,
}

impl DocumentState {
    /// Create an empty document with no image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document over an image of the given size.
    pub fn with_image_size(size: ImageSize) -> Self {
        Self {
            original_image_size: Some(size),
            ..Self::default()
        }
    }

    pub fn shapes(&self) -> &[Arc<Shape>] {
        &self.shapes
    }

    pub fn canvas_bounds(&self) -> Option<CanvasBounds> {
        self.canvas_bounds
    }

    /// Replace the shape list wholesale.
    pub fn set_shapes<I, S>(&mut self, shapes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<Shape>>,
    {
        self.shapes = shapes.into_iter().map(Into::into).collect();
        tracing::debug!(shapes = self.shapes.len(), "Shapes replaced");
    }

    /// Merge `patch` into the shape with the given id.
    ///
    /// Unknown ids are a silent no-op: the list keeps the same `Arc`s in the
    /// same order. Returns whether a shape with that id exists.
    pub fn update_shape(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        let Some(slot) = self.shapes.iter_mut().find(|s| s.id() == id) else {
            return false;
        };
        // Copies only when a snapshot still holds the shape.
        if slot.changed_by(patch) {
            Arc::make_mut(slot).apply(patch);
            tracing::debug!(shape_id = %id, "Shape updated");
        }
        true
    }

    /// Replace the canvas bounds wholesale. Stored normalized.
    pub fn set_canvas_bounds(&mut self, bounds: Option<CanvasBounds>) {
        self.canvas_bounds = bounds.map(CanvasBounds::normalized);
        tracing::debug!(bounds = ?self.canvas_bounds, "Canvas bounds set");
    }

    /// Append a shape to the top of the z-order.
    pub fn add_shape(&mut self, shape: impl Into<Arc<Shape>>) {
        let shape = shape.into();
        tracing::debug!(shape_id = %shape.id(), kind = shape.kind().name(), "Adding shape");
        self.shapes.push(shape);
    }

    /// Remove a shape by ID. Returns the removed shape, or None if not found.
    pub fn remove_shape(&mut self, id: &ShapeId) -> Option<Arc<Shape>> {
        let pos = self.shapes.iter().position(|s| s.id() == id)?;
        let shape = self.shapes.remove(pos);
        tracing::debug!(shape_id = %id, "Removed shape");
        Some(shape)
    }

    /// Mutable access to one shape for edits a patch cannot express
    /// (e.g. appending points to a pen stroke).
    pub fn shape_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|s| s.id() == id)
            .map(Arc::make_mut)
    }

    pub fn find_shape(&self, id: &ShapeId) -> Option<&Arc<Shape>> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// The bounds in effect: explicit bounds, or the whole original image at
    /// zero offset when none are set. `None` when neither is known.
    pub fn effective_bounds(&self) -> Option<CanvasBounds> {
        self.canvas_bounds
            .or_else(|| self.original_image_size.map(CanvasBounds::from_image_size))
    }
}

impl DocumentAccess for DocumentState {
    fn shapes(&self) -> &[Arc<Shape>] {
        &self.shapes
    }

    fn canvas_bounds(&self) -> Option<CanvasBounds> {
        self.canvas_bounds
    }

    fn replace_shapes(&mut self, shapes: Vec<Arc<Shape>>) {
        self.shapes = shapes;
    }

    fn replace_canvas_bounds(&mut self, bounds: Option<CanvasBounds>) {
        self.canvas_bounds = bounds;
    }
}
