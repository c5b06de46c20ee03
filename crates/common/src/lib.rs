//! `sl-common` -- Shared document types, configuration, and errors for the
//! Snapline annotation engine.
//!
//! - **Types**: `ShapeId`, `Point`, `ImageSize`, `CanvasBounds`
//! - **Shapes**: `Shape`, `ShapeKind` (one variant per annotation tool), `ShapeStyle`, `ShapePatch`
//! - **Config**: `HistoryConfig` (undo entry and byte limits)
//! - **Errors**: `ConfigError` (thiserror-based)

pub mod config;
pub mod error;
pub mod shape;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{HistoryConfig, DEFAULT_MAX_BYTES, DEFAULT_MAX_ENTRIES};
pub use error::{ConfigError, ConfigResult};
pub use shape::{Shape, ShapeKind, ShapePatch, ShapeStyle};
pub use types::{CanvasBounds, ImageSize, Point, ShapeId};
