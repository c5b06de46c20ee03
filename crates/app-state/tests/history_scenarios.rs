//! End-to-end undo/redo scenarios driven through `HistoryController`, the
//! way toolbar actions, drag handlers, and keyboard shortcuts drive it.

use std::sync::Arc;

use sl_app_state::{DocumentState, HistoryController};
use sl_common::{CanvasBounds, HistoryConfig, ImageSize, Point, Shape, ShapeKind, ShapePatch};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rect(id: &str, x: f64) -> Shape {
    Shape::new(
        id,
        ShapeKind::Rectangle {
            x,
            y: 0.0,
            width: 40.0,
            height: 30.0,
            rotation: 0.0,
        },
    )
}

fn pen(id: &str, points: usize) -> Shape {
    let points = (0..points).map(|i| Point::new(i as f64, 0.0)).collect();
    Shape::new(id, ShapeKind::Pen { points })
}

fn same_document(a: &DocumentState, b: &DocumentState) -> bool {
    a.shapes() == b.shapes() && a.canvas_bounds() == b.canvas_bounds()
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn first_action_enables_undo_only() {
    let mut editor: HistoryController = HistoryController::default();
    let shape_a = rect("A", 0.0);

    assert!(editor.record_action("Add A", |doc| doc.set_shapes(vec![shape_a.clone()])));

    assert_eq!(editor.document().shape_count(), 1);
    assert!(editor.can_undo());
    assert!(!editor.can_redo());
}

#[test]
fn undo_and_redo_second_action() {
    let mut editor: HistoryController = HistoryController::default();
    let shape_a = rect("A", 0.0);
    let shape_b = rect("B", 50.0);
    editor.record_action("Add A", |doc| doc.set_shapes(vec![shape_a.clone()]));
    editor.record_action("Add B", |doc| doc.set_shapes(vec![shape_a.clone(), shape_b]));
    assert_eq!(editor.document().shape_count(), 2);

    assert!(editor.undo());
    assert_eq!(editor.document().shape_count(), 1);
    assert_eq!(editor.document().shapes()[0].id(), shape_a.id());
    assert!(editor.can_redo());

    assert!(editor.redo());
    assert_eq!(editor.document().shape_count(), 2);
}

#[test]
fn undo_past_the_beginning_returns_false() {
    let mut editor: HistoryController = HistoryController::default();
    editor.record_action("Add A", |doc| doc.set_shapes(vec![rect("A", 0.0)]));

    assert!(editor.undo());
    assert_eq!(editor.document().shape_count(), 0);

    assert!(!editor.undo());
    assert_eq!(editor.document().shape_count(), 0);
}

#[test]
fn crop_steps_undo_back_to_no_bounds() {
    let doc = DocumentState::with_image_size(ImageSize::new(1920, 1080));
    let mut editor = HistoryController::new(doc);
    let half = CanvasBounds::new(960.0, 540.0, 480.0, 270.0);
    let quarter = CanvasBounds::new(480.0, 270.0, 720.0, 405.0);

    editor.record_action("Crop", |doc| doc.set_canvas_bounds(Some(half)));
    editor.record_action("Crop", |doc| doc.set_canvas_bounds(Some(quarter)));
    assert_eq!(editor.document().canvas_bounds(), Some(quarter));

    assert!(editor.undo());
    assert_eq!(editor.document().canvas_bounds(), Some(half));

    assert!(editor.undo());
    assert_eq!(editor.document().canvas_bounds(), None);
    assert_eq!(
        editor.document().effective_bounds(),
        Some(CanvasBounds::new(1920.0, 1080.0, 0.0, 0.0))
    );
}

#[test]
fn large_pen_stroke_dominates_entry_size() {
    let mut editor: HistoryController = HistoryController::default();
    editor.record_action("Draw", |doc| doc.add_shape(pen("stroke", 1000)));
    editor.record_action("Add rect", |doc| doc.add_shape(rect("R", 0.0)));

    let entries: Vec<_> = editor.ledger().undo_entries().collect();
    assert_eq!(entries.len(), 2);
    // The before-state of "Add rect" holds the stroke.
    assert!(entries[1].snapshot.estimated_bytes() > 1000 * 8);
    assert!(entries[0].snapshot.estimated_bytes() < 1000 * 8);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn begin_commit_without_mutation_is_idempotent() {
    let mut editor: HistoryController = HistoryController::default();
    editor.record_action("Add", |doc| doc.add_shape(rect("A", 0.0)));
    let depth = editor.ledger().undo_len();

    for _ in 0..3 {
        editor.begin("Click");
        assert!(!editor.commit());
    }

    assert_eq!(editor.ledger().undo_len(), depth);
    assert!(editor.can_undo());
}

#[test]
fn undo_all_restores_initial_document() {
    let mut initial = DocumentState::new();
    initial.set_shapes(vec![rect("A", 0.0), pen("P", 3)]);
    initial.set_canvas_bounds(Some(CanvasBounds::new(800.0, 600.0, 0.0, 0.0)));
    let mut editor = HistoryController::new(initial.clone());

    editor.record_action("Move A", |doc| {
        doc.update_shape(&"A".into(), &ShapePatch::new().with_x(12.0));
    });
    editor.record_action("Delete P", |doc| {
        doc.remove_shape(&"P".into());
    });
    editor.record_action("Add B", |doc| doc.add_shape(rect("B", 3.0)));
    editor.record_action("Expand", |doc| {
        doc.set_canvas_bounds(Some(CanvasBounds::new(900.0, 700.0, 50.0, 50.0)));
    });
    editor.record_action("Restyle B", |doc| {
        doc.update_shape(&"B".into(), &ShapePatch::new().with_stroke_width(8.0));
    });

    for _ in 0..5 {
        assert!(editor.undo());
    }
    assert!(same_document(editor.document(), &initial));
    assert!(!editor.can_undo());
}

#[test]
fn new_action_after_undo_clears_redo() {
    let mut editor: HistoryController = HistoryController::default();
    editor.record_action("Add A", |doc| doc.add_shape(rect("A", 0.0)));
    editor.record_action("Add B", |doc| doc.add_shape(rect("B", 0.0)));

    editor.undo();
    assert!(editor.can_redo());

    editor.record_action("Add C", |doc| doc.add_shape(rect("C", 0.0)));
    assert!(!editor.can_redo());
    assert!(!editor.redo());
}

#[test]
fn untouched_shape_is_shared_between_entries() {
    let mut doc = DocumentState::new();
    doc.set_shapes(vec![rect("A", 0.0), rect("B", 100.0)]);
    let mut editor = HistoryController::new(doc);

    editor.record_action("Move A", |doc| {
        doc.update_shape(&"A".into(), &ShapePatch::new().with_x(1.0));
    });
    editor.record_action("Move A", |doc| {
        doc.update_shape(&"A".into(), &ShapePatch::new().with_x(2.0));
    });

    let entries: Vec<_> = editor.ledger().undo_entries().collect();
    assert_eq!(entries.len(), 2);
    let (first, second) = (&entries[0].snapshot, &entries[1].snapshot);
    assert!(first.shares_shape_with(second, &"B".into()));
    assert!(!first.shares_shape_with(second, &"A".into()));
}

#[test]
fn sharing_survives_undo_and_redo() {
    let mut doc = DocumentState::new();
    doc.set_shapes(vec![rect("A", 0.0), rect("B", 100.0)]);
    let mut editor = HistoryController::new(doc);

    for x in 1..=3 {
        editor.record_action("Move A", |doc| {
            doc.update_shape(&"A".into(), &ShapePatch::new().with_x(f64::from(x)));
        });
    }
    editor.undo();
    editor.redo();

    let b_allocations: Vec<_> = editor
        .ledger()
        .undo_entries()
        .map(|e| Arc::clone(e.snapshot.find_shape(&"B".into()).unwrap()))
        .collect();
    assert!(b_allocations.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn count_limit_caps_undo_stack() {
    let mut editor =
        HistoryController::with_config(DocumentState::new(), HistoryConfig::new(50, usize::MAX))
            .unwrap();

    for i in 0..60 {
        editor.record_action("Add", |doc| doc.add_shape(rect(&format!("s{i}"), 0.0)));
    }

    assert!(editor.ledger().undo_len() <= 50);
    assert_eq!(editor.ledger().undo_len(), 50);
}

#[test]
fn byte_budget_never_evicts_last_entry() {
    let mut editor =
        HistoryController::with_config(DocumentState::new(), HistoryConfig::new(50, 1000))
            .unwrap();

    editor.record_action("Draw", |doc| doc.add_shape(pen("stroke", 5000)));
    editor.record_action("Move", |doc| {
        doc.shape_mut(&"stroke".into()).unwrap().translate(1.0, 1.0);
    });

    assert_eq!(editor.ledger().undo_len(), 1);
    assert!(editor.ledger().undo_bytes() > 1000);
    assert_eq!(editor.undo_label(), Some("Move"));
}

#[test]
fn unknown_update_leaves_shapes_identical() {
    let mut doc = DocumentState::new();
    doc.set_shapes(vec![rect("A", 0.0), rect("B", 1.0)]);
    let before: Vec<_> = doc.shapes().to_vec();

    assert!(!doc.update_shape(&"nonexistent".into(), &ShapePatch::new().with_x(99.0)));

    assert_eq!(doc.shapes().len(), before.len());
    assert!(doc
        .shapes()
        .iter()
        .zip(&before)
        .all(|(after, before)| Arc::ptr_eq(after, before)));
}

#[test]
fn unknown_update_inside_action_records_nothing() {
    let mut doc = DocumentState::new();
    doc.set_shapes(vec![rect("A", 0.0)]);
    let mut editor = HistoryController::new(doc);

    let recorded = editor.record_action("Move ghost", |doc| {
        doc.update_shape(&"ghost".into(), &ShapePatch::new().with_x(99.0));
    });

    assert!(!recorded);
    assert!(!editor.can_undo());
}

#[test]
fn independent_editors_do_not_share_history() {
    let mut left: HistoryController = HistoryController::default();
    let mut right: HistoryController = HistoryController::default();

    left.record_action("Add", |doc| doc.add_shape(rect("L", 0.0)));

    assert!(left.can_undo());
    assert!(!right.can_undo());
    assert!(!right.undo());
    assert_eq!(left.document().shape_count(), 1);
}
