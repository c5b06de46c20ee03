//! Annotation shapes: a tagged sum type per shape kind, shared style, and the
//! partial-update patch applied by property panels and drag handlers.
//!
//! Every shape memoizes a content hash over its mutable fields. The cache is
//! cleared by every `&mut` accessor, so a stale hash is never observable.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::types::{Point, ShapeId};

/// Geometry of a single annotation primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ShapeKind {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    Arrow {
        points: Vec<Point>,
    },
    Line {
        points: Vec<Point>,
    },
    /// Freehand pen stroke.
    Pen {
        points: Vec<Point>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        rotation: f64,
    },
    Highlight {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Numbered step marker.
    Step {
        x: f64,
        y: f64,
        radius: f64,
        number: u32,
    },
    /// Region rendered blurred/pixelated on export.
    Blur {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        intensity: f64,
    },
}

impl ShapeKind {
    /// Short name of the variant, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
            Self::Arrow { .. } => "arrow",
            Self::Line { .. } => "line",
            Self::Pen { .. } => "pen",
            Self::Text { .. } => "text",
            Self::Highlight { .. } => "highlight",
            Self::Step { .. } => "step",
            Self::Blur { .. } => "blur",
        }
    }

    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Self::Arrow { points } | Self::Line { points } | Self::Pen { points } => Some(points),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Feed the mutable geometry into `state`. The variant tag is not hashed:
    /// a living shape never changes kind.
    fn hash_content<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
                rotation,
            } => hash_f64s(state, &[*x, *y, *width, *height, *rotation]),
            Self::Circle { x, y, radius } => hash_f64s(state, &[*x, *y, *radius]),
            Self::Arrow { points } | Self::Line { points } | Self::Pen { points } => {
                state.write_usize(points.len());
                for p in points {
                    hash_f64s(state, &[p.x, p.y]);
                }
            }
            Self::Text {
                x,
                y,
                text,
                font_size,
                rotation,
            } => {
                hash_f64s(state, &[*x, *y, *font_size, *rotation]);
                text.hash(state);
            }
            Self::Highlight {
                x,
                y,
                width,
                height,
            } => hash_f64s(state, &[*x, *y, *width, *height]),
            Self::Step {
                x,
                y,
                radius,
                number,
            } => {
                hash_f64s(state, &[*x, *y, *radius]);
                number.hash(state);
            }
            Self::Blur {
                x,
                y,
                width,
                height,
                intensity,
            } => hash_f64s(state, &[*x, *y, *width, *height, *intensity]),
        }
    }

    fn apply(&mut self, patch: &ShapePatch) -> bool {
        let mut changed = false;
        match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
                rotation,
            } => {
                changed |= assign(x, &patch.x);
                changed |= assign(y, &patch.y);
                changed |= assign(width, &patch.width);
                changed |= assign(height, &patch.height);
                changed |= assign(rotation, &patch.rotation);
            }
            Self::Circle { x, y, radius } => {
                changed |= assign(x, &patch.x);
                changed |= assign(y, &patch.y);
                changed |= assign(radius, &patch.radius);
            }
            Self::Arrow { points } | Self::Line { points } | Self::Pen { points } => {
                changed |= assign(points, &patch.points);
            }
            Self::Text {
                x,
                y,
                text,
                font_size,
                rotation,
            } => {
                changed |= assign(x, &patch.x);
                changed |= assign(y, &patch.y);
                changed |= assign(text, &patch.text);
                changed |= assign(font_size, &patch.font_size);
                changed |= assign(rotation, &patch.rotation);
            }
            Self::Highlight {
                x,
                y,
                width,
                height,
            } => {
                changed |= assign(x, &patch.x);
                changed |= assign(y, &patch.y);
                changed |= assign(width, &patch.width);
                changed |= assign(height, &patch.height);
            }
            Self::Step {
                x,
                y,
                radius,
                number,
            } => {
                changed |= assign(x, &patch.x);
                changed |= assign(y, &patch.y);
                changed |= assign(radius, &patch.radius);
                changed |= assign(number, &patch.number);
            }
            Self::Blur {
                x,
                y,
                width,
                height,
                intensity,
            } => {
                changed |= assign(x, &patch.x);
                changed |= assign(y, &patch.y);
                changed |= assign(width, &patch.width);
                changed |= assign(height, &patch.height);
                changed |= assign(intensity, &patch.intensity);
            }
        }
        changed
    }

    /// Whether [`ShapeKind::apply`] would change any field.
    fn changed_by(&self, patch: &ShapePatch) -> bool {
        match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
                rotation,
            } => {
                differs(x, &patch.x)
                    || differs(y, &patch.y)
                    || differs(width, &patch.width)
                    || differs(height, &patch.height)
                    || differs(rotation, &patch.rotation)
            }
            Self::Circle { x, y, radius } => {
                differs(x, &patch.x) || differs(y, &patch.y) || differs(radius, &patch.radius)
            }
            Self::Arrow { points } | Self::Line { points } | Self::Pen { points } => {
                differs(points, &patch.points)
            }
            Self::Text {
                x,
                y,
                text,
                font_size,
                rotation,
            } => {
                differs(x, &patch.x)
                    || differs(y, &patch.y)
                    || differs(text, &patch.text)
                    || differs(font_size, &patch.font_size)
                    || differs(rotation, &patch.rotation)
            }
            Self::Highlight {
                x,
                y,
                width,
                height,
            } => {
                differs(x, &patch.x)
                    || differs(y, &patch.y)
                    || differs(width, &patch.width)
                    || differs(height, &patch.height)
            }
            Self::Step {
                x,
                y,
                radius,
                number,
            } => {
                differs(x, &patch.x)
                    || differs(y, &patch.y)
                    || differs(radius, &patch.radius)
                    || differs(number, &patch.number)
            }
            Self::Blur {
                x,
                y,
                width,
                height,
                intensity,
            } => {
                differs(x, &patch.x)
                    || differs(y, &patch.y)
                    || differs(width, &patch.width)
                    || differs(height, &patch.height)
                    || differs(intensity, &patch.intensity)
            }
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Rectangle { x, y, .. }
            | Self::Circle { x, y, .. }
            | Self::Text { x, y, .. }
            | Self::Highlight { x, y, .. }
            | Self::Step { x, y, .. }
            | Self::Blur { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Arrow { points } | Self::Line { points } | Self::Pen { points } => {
                for p in points.iter_mut() {
                    p.x += dx;
                    p.y += dy;
                }
            }
        }
    }
}

/// Fill/stroke styling shared by every shape kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Fill color (CSS-style hex), `None` for no fill.
    pub fill: Option<String>,
    /// Stroke color, `None` for no stroke.
    pub stroke: Option<String>,
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: Some("#ef4444".to_string()),
            stroke_width: 2.0,
        }
    }
}

impl ShapeStyle {
    fn hash_content<H: Hasher>(&self, state: &mut H) {
        self.fill.hash(state);
        self.stroke.hash(state);
        state.write_u64(self.stroke_width.to_bits());
    }

    fn apply(&mut self, patch: &ShapePatch) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.fill, &patch.fill);
        changed |= assign(&mut self.stroke, &patch.stroke);
        changed |= assign(&mut self.stroke_width, &patch.stroke_width);
        changed
    }

    fn changed_by(&self, patch: &ShapePatch) -> bool {
        differs(&self.fill, &patch.fill)
            || differs(&self.stroke, &patch.stroke)
            || differs(&self.stroke_width, &patch.stroke_width)
    }
}

/// A single annotation primitive owned by the document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    #[serde(default)]
    style: ShapeStyle,
    /// Memoized [`Shape::content_hash`]; cleared on every mutable access.
    #[serde(skip)]
    hash: OnceLock<u64>,
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind && self.style == other.style
    }
}

impl Shape {
    pub fn new(id: impl Into<ShapeId>, kind: ShapeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            style: ShapeStyle::default(),
            hash: OnceLock::new(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self.hash = OnceLock::new();
        self
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn kind_mut(&mut self) -> &mut ShapeKind {
        self.hash = OnceLock::new();
        &mut self.kind
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.hash = OnceLock::new();
        &mut self.style
    }

    /// Merge `patch` into this shape. Fields the shape's kind does not carry
    /// are ignored. Returns whether any field changed value.
    pub fn apply(&mut self, patch: &ShapePatch) -> bool {
        let changed = self.kind.apply(patch) | self.style.apply(patch);
        if changed {
            self.hash = OnceLock::new();
        }
        changed
    }

    /// Whether [`Shape::apply`] with `patch` would change any field.
    pub fn changed_by(&self, patch: &ShapePatch) -> bool {
        self.kind.changed_by(patch) || self.style.changed_by(patch)
    }

    /// Move the shape by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.kind_mut().translate(dx, dy);
    }

    /// Hash over geometry, text, and style. Excludes `id` and the kind tag.
    pub fn content_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.kind.hash_content(&mut hasher);
            self.style.hash_content(&mut hasher);
            hasher.finish()
        })
    }

    pub fn point_count(&self) -> usize {
        self.kind.points().map_or(0, <[Point]>::len)
    }

    /// Text length in characters (0 for shapes without text).
    pub fn text_len(&self) -> usize {
        self.kind.text().map_or(0, |t| t.chars().count())
    }
}

/// Partial update for [`Shape::apply`]. `None` leaves a field untouched.
///
/// `fill`/`stroke` are doubly optional: `Some(None)` clears the color.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub radius: Option<f64>,
    pub points: Option<Vec<Point>>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub number: Option<u32>,
    pub intensity: Option<f64>,
    pub fill: Option<Option<String>>,
    pub stroke: Option<Option<String>>,
    pub stroke_width: Option<f64>,
}

impl ShapePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_position(self, x: f64, y: f64) -> Self {
        self.with_x(x).with_y(y)
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = Some(points);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_fill(mut self, fill: Option<String>) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Option<String>) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = Some(stroke_width);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn hash_f64s<H: Hasher>(state: &mut H, values: &[f64]) {
    for v in values {
        state.write_u64(v.to_bits());
    }
}

fn differs<T: PartialEq>(slot: &T, value: &Option<T>) -> bool {
    value.as_ref().is_some_and(|v| v != slot)
}

fn assign<T: Clone + PartialEq>(slot: &mut T, value: &Option<T>) -> bool {
    match value {
        Some(v) if slot != v => {
            *slot = v.clone();
            true
        }
        _ => false,
    }
}
