//! Core document value types with newtype pattern for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a shape within one document lifetime.
///
/// Ids must never be reused for a different logical shape: history
/// snapshots match shapes across time by id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point in canvas space (pixels).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of the original captured image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Non-destructive crop/expand of the working surface.
///
/// `width`/`height` describe the surface; the offsets position the original
/// image inside it. Negative offsets crop, positive offsets expand.
/// Width and height are never negative once constructed through [`CanvasBounds::new`]
/// or [`CanvasBounds::normalized`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
    pub image_offset_x: f64,
    pub image_offset_y: f64,
}

impl CanvasBounds {
    pub fn new(width: f64, height: f64, image_offset_x: f64, image_offset_y: f64) -> Self {
        Self {
            width,
            height,
            image_offset_x,
            image_offset_y,
        }
        .normalized()
    }

    /// Bounds covering the whole image at zero offset.
    pub fn from_image_size(size: ImageSize) -> Self {
        Self {
            width: f64::from(size.width),
            height: f64::from(size.height),
            image_offset_x: 0.0,
            image_offset_y: 0.0,
        }
    }

    /// Copy with negative (or NaN) width/height clamped to zero.
    pub fn normalized(self) -> Self {
        Self {
            width: self.width.max(0.0),
            height: self.height.max(0.0),
            ..self
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }
}
