use crate::common::{rect, Fixture};
use layerkit_core::{Bounds, Color, Matrix, PixelBuffer, Point};
use layerkit_history::{
    DocumentField, DocumentPatch, Layer, LayerField, LayerPatch, PostAction, PropertyValue,
};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn test_compound_members_replay_in_recorded_order_on_undo() {
    // Deleting A then B records both at position 0. Undo re-inserts them in
    // the same order, so B ends up below A.
    let mut fx = Fixture::new(vec![rect("A"), rect("B"), rect("C")]);
    let (a, b, c) = (fx.layer_id(0), fx.layer_id(1), fx.layer_id(2));

    let mut actions = Vec::new();
    for id in [a, b] {
        let (position, layer) = fx.document.remove_layer(id).unwrap();
        actions.push(PostAction::Delete { layer, position });
    }
    assert!(fx.commit(PostAction::Compound { actions }));
    assert_eq!(fx.document.layer_ids(), vec![c]);

    assert!(fx.undo());
    assert_eq!(fx.document.layer_ids(), vec![b, a, c]);

    assert!(fx.redo());
    assert_eq!(fx.document.layer_ids(), vec![c]);
}

#[test]
fn test_single_selection_rotation_follows_layer() {
    let mut fx = Fixture::new(vec![rect("A")]);
    let id = fx.layer_id(0);
    fx.selection.select([id]);
    fx.selection.bounds = Some(Bounds::new(Point::new(3.0, 4.0), Point::new(10.0, 10.0), 45.0));
    fx.service.sync_bounds(fx.document.id, &fx.selection);

    let rotated = Matrix::rotation(30.0);
    fx.document.layer_mut(id).unwrap().transform = rotated;
    let stored = Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 0.0);
    assert!(fx.commit(PostAction::Transform {
        layer_id: id,
        new_matrix: rotated,
        new_bounds: Some(stored),
    }));

    assert!(fx.undo());
    let bounds = fx.selection.bounds.unwrap();
    assert_eq!(bounds.pos, Point::new(3.0, 4.0));
    assert_close(bounds.rot, 0.0);
    assert_eq!(
        fx.service.snapshots().get_bounds(fx.document.id),
        fx.selection.bounds.as_ref()
    );

    assert!(fx.redo());
    assert_close(fx.selection.bounds.unwrap().rot, 30.0);
}

#[test]
fn test_multi_selection_keeps_stored_rotation() {
    let mut fx = Fixture::new(vec![rect("A"), rect("B")]);
    let (a, b) = (fx.layer_id(0), fx.layer_id(1));
    fx.selection.select([a, b]);

    let stored = Bounds::new(Point::new(1.0, 1.0), Point::new(5.0, 5.0), 12.5);
    fx.document.layer_mut(a).unwrap().transform = Matrix::rotation(90.0);
    assert!(fx.commit(PostAction::Transform {
        layer_id: a,
        new_matrix: Matrix::rotation(90.0),
        new_bounds: Some(stored),
    }));

    fx.undo();
    assert_eq!(fx.selection.bounds, None);
    fx.redo();
    assert_eq!(fx.selection.bounds, Some(stored));
}

#[test]
fn test_content_round_trip() {
    let mut fx = Fixture::new(vec![Layer::canvas("Paint", 2, 2)]);
    let id = fx.layer_id(0);

    let red = PixelBuffer::filled(1, 1, Color::rgb(255, 0, 0));
    let content = fx.document.layer_mut(id).unwrap().content_mut().unwrap();
    content.write_at_origin(&red);
    let new_content = content.clone();
    assert!(fx.commit(PostAction::Content {
        layer_id: id,
        new_content,
    }));

    let pixel = |fx: &Fixture| fx.layer(id).content().and_then(|c| c.pixel(0, 0));
    fx.undo();
    assert_eq!(pixel(&fx), Some([0, 0, 0, 0]));
    fx.redo();
    assert_eq!(pixel(&fx), Some([255, 0, 0, 255]));
}

#[test]
fn test_update_round_trip() {
    let mut fx = Fixture::new(vec![rect("A")]);
    let id = fx.layer_id(0);

    let patch = LayerPatch::new()
        .with(LayerField::Name, PropertyValue::String("Renamed".into()))
        .with(LayerField::Visible, PropertyValue::Bool(false));
    patch.apply_to(fx.document.layer_mut(id).unwrap());
    assert!(fx.commit(PostAction::Update {
        layer_id: id,
        new_layer: patch,
    }));

    fx.undo();
    assert_eq!(fx.layer(id).name, "A");
    assert!(fx.layer(id).visible);
    fx.redo();
    assert_eq!(fx.layer(id).name, "Renamed");
    assert!(!fx.layer(id).visible);
}

#[test]
fn test_reorder_round_trip_and_snapshot_order() {
    let mut fx = Fixture::new(vec![rect("A"), rect("B"), rect("C")]);
    let (a, b, c) = (fx.layer_id(0), fx.layer_id(1), fx.layer_id(2));

    fx.document.move_layer(a, 2);
    assert!(fx.commit(PostAction::Reorder {
        layer_id: a,
        new_position: 2,
    }));
    let order = |fx: &Fixture| {
        fx.service
            .snapshots()
            .get_document(fx.document.id)
            .map(|s| s.layer_order.clone())
    };
    assert_eq!(order(&fx), Some(vec![b, c, a]));

    fx.undo();
    assert_eq!(fx.document.layer_ids(), vec![a, b, c]);
    assert_eq!(order(&fx), Some(vec![a, b, c]));

    // a second reorder derives its old position from the refreshed snapshot
    fx.document.move_layer(c, 0);
    assert!(fx.commit(PostAction::Reorder {
        layer_id: c,
        new_position: 0,
    }));
    fx.undo();
    assert_eq!(fx.document.layer_ids(), vec![a, b, c]);
}

#[test]
fn test_document_patch_round_trip() {
    let mut fx = Fixture::new(vec![]);
    let patch = DocumentPatch::new(fx.document.id)
        .with(DocumentField::Width, PropertyValue::Number(640.0))
        .with(DocumentField::Name, PropertyValue::String("Poster".into()));
    patch.apply_to(&mut fx.document);
    assert!(fx.commit(PostAction::Document {
        new_document: patch,
    }));

    fx.undo();
    assert_eq!(fx.document.width, 200);
    assert_eq!(fx.document.name, "Test");
    fx.redo();
    assert_eq!(fx.document.width, 640);
    assert_eq!(fx.document.name, "Poster");
}
