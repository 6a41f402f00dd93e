//! Two editors sharing a board through the sync and storage boundaries.

use kurbo::Rect;
use slateboard_core::sync::MAX_SYNC_RATE_HZ;
use slateboard_core::{
    Document, DocumentSnapshot, Editor, EditorConfig, EditorEffect, Element, ElementKind, Frame, KeyCommand,
    MemoryStorage, PointerEvent, Shape, ShapeId, ShapeTrait, SnapMode, Storage, SyncOutbox, SyncThrottle, check_z_order,
};
use std::time::{Duration, Instant};

fn config() -> EditorConfig {
    let mut config = EditorConfig::default();
    config.snap.mode = SnapMode::None;
    config
}

fn board() -> (Document, Vec<ShapeId>) {
    let shapes: Vec<Shape> = [0.0, 200.0, 400.0]
        .iter()
        .map(|&x| Shape::Element(Element::new(ElementKind::Rectangle, Frame::new(x, 0.0, x + 100.0, 100.0))))
        .collect();
    let ids = shapes.iter().map(Shape::id).collect();
    (Document::with_shapes(shapes), ids)
}

fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) -> Vec<EditorEffect> {
    let mut effects = editor.pointer_down(PointerEvent::new(from.0, from.1));
    effects.extend(editor.pointer_move(PointerEvent::new(to.0, to.1)));
    effects.extend(editor.pointer_up(PointerEvent::new(to.0, to.1)));
    effects
}

fn committed(effects: &[EditorEffect]) -> bool {
    effects.iter().any(|e| matches!(e, EditorEffect::Committed(_)))
}

fn bounds(editor: &Editor, id: ShapeId) -> Rect {
    editor.document().shape(id).map(Shape::bounds).unwrap_or_default()
}

#[test]
fn test_concurrent_edits_converge() {
    let (doc, ids) = board();
    let mut alice = Editor::new(doc.clone(), config());
    let mut bob = Editor::new(doc, config());
    let start = Instant::now();
    let mut outbox = SyncOutbox::new(Vec::<DocumentSnapshot>::new(), SyncThrottle::new(MAX_SYNC_RATE_HZ));

    // Alice drags the first rectangle right.
    assert!(committed(&drag(&mut alice, (50.0, 50.0), (80.0, 50.0))));
    assert!(outbox.publish(alice.snapshot(), start));

    // Bob has the second rectangle selected when Alice's edit arrives.
    drag(&mut bob, (250.0, 50.0), (250.0, 50.0));
    assert_eq!(bob.selection().ids(), &[ids[1]]);
    bob.apply_remote(outbox.sink()[0].clone());
    assert_eq!(bounds(&bob, ids[0]), Rect::new(30.0, 0.0, 130.0, 100.0));

    // Bob's own move reaches Alice, who still holds the first rectangle.
    assert!(committed(&drag(&mut bob, (250.0, 50.0), (250.0, 150.0))));
    let later = start + Duration::from_secs(1);
    assert!(outbox.publish(bob.snapshot(), later));
    alice.apply_remote(outbox.sink()[1].clone());

    assert_eq!(bounds(&alice, ids[1]), Rect::new(200.0, 100.0, 300.0, 200.0));
    assert_eq!(alice.shapes(), bob.shapes());
    check_z_order(alice.shapes()).unwrap();
}

#[test]
fn test_group_reorder_and_undo_persist() {
    let (doc, ids) = board();
    let mut editor = Editor::new(doc, config());

    editor.key(KeyCommand::SelectAll);
    let effects = editor.key(KeyCommand::Group);
    assert!(committed(&effects));
    assert_eq!(editor.shapes().len(), 1);
    check_z_order(editor.shapes()).unwrap();

    editor.key(KeyCommand::Undo);
    assert_eq!(editor.shapes().len(), 3);
    editor.key(KeyCommand::Redo);
    assert_eq!(editor.shapes().len(), 1);

    let storage = MemoryStorage::new();
    let doc = editor.document();
    pollster::block_on(storage.save(&doc.id, doc)).unwrap();
    let loaded = pollster::block_on(storage.load(&doc.id)).unwrap();
    check_z_order(loaded.shapes()).unwrap();

    let component = loaded.shapes()[0].as_component().unwrap();
    let children: Vec<ShapeId> = component.children().iter().map(|e| e.id()).collect();
    assert_eq!(children, ids);
}
