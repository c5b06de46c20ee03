//! Additive size estimates for history snapshots.
//!
//! These numbers only drive undo-stack eviction; they are never used for
//! correctness. They are monotonic in content size: more points or text never
//! lowers an estimate, and fewer shapes never raises one.

use std::sync::Arc;

use sl_common::{CanvasBounds, Shape};

/// Fixed cost of a snapshot record.
pub const SNAPSHOT_OVERHEAD: usize = 64;
/// Fixed cost of one shape.
pub const SHAPE_OVERHEAD: usize = 200;
/// Cost of one point of a pen stroke, line, or arrow.
pub const BYTES_PER_POINT: usize = 8;
/// Cost of one character of text.
pub const BYTES_PER_TEXT_UNIT: usize = 2;
/// Fixed cost of present canvas bounds.
pub const BOUNDS_OVERHEAD: usize = 64;

/// Estimated footprint of one shape.
pub fn estimate_shape(shape: &Shape) -> usize {
    SHAPE_OVERHEAD
        + shape.point_count() * BYTES_PER_POINT
        + shape.text_len() * BYTES_PER_TEXT_UNIT
}

/// Estimated footprint of a snapshot holding `shapes` and `bounds`.
///
/// Shapes aliased from older snapshots are counted in full; the estimate is
/// per snapshot, not per allocation.
pub fn estimate_snapshot(shapes: &[Arc<Shape>], bounds: Option<&CanvasBounds>) -> usize {
    let shapes_bytes: usize = shapes.iter().map(|s| estimate_shape(s)).sum();
    let bounds_bytes = if bounds.is_some() { BOUNDS_OVERHEAD } else { 0 };
    SNAPSHOT_OVERHEAD + shapes_bytes + bounds_bytes
}
