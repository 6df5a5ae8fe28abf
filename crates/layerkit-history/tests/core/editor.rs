use crate::common::rect;
use layerkit_core::{Color, DocumentError, Matrix, PixelBuffer};
use layerkit_history::{
    Document, Editor, HistoryError, Layer, LayerField, LayerPatch, Nudge, PropertyValue,
};
use layerkit_settings::Config;

fn editor_with(layers: Vec<Layer>) -> Editor {
    let mut editor = Editor::default();
    editor.open_document(Document::new("Doc", 640, 480).with_layers(layers));
    editor
}

fn ids(editor: &Editor) -> Vec<layerkit_core::LayerId> {
    editor.active().unwrap().layer_ids()
}

#[test]
fn test_no_document_and_empty_history() {
    let mut editor = Editor::default();
    assert_eq!(
        editor.undo(),
        Err(HistoryError::Document(DocumentError::NoActiveDocument))
    );

    editor.open_document(Document::new("Doc", 10, 10));
    assert_eq!(editor.undo(), Err(HistoryError::NothingToUndo));
    assert_eq!(editor.redo(), Err(HistoryError::NothingToRedo));
    assert!(!editor.status().unwrap().can_undo);
}

#[test]
fn test_copy_paste_and_undo() {
    let mut editor = editor_with(vec![rect("Logo"), rect("Other")]);
    let logo = ids(&editor)[0];

    assert_eq!(editor.paste().unwrap(), None);
    editor.select_layers([logo]).unwrap();
    assert!(editor.copy_selected().unwrap());

    let pasted = editor.paste().unwrap().unwrap();
    assert_ne!(pasted, logo);
    let doc = editor.active().unwrap();
    assert_eq!(doc.index_of(pasted), Some(2));
    assert_eq!(doc.layer(pasted).unwrap().name, "Copy of Logo");
    let selection = editor.workspace().selection(doc.id).unwrap();
    assert_eq!(selection.selected_layers, vec![pasted]);

    editor.undo().unwrap();
    assert!(editor.active().unwrap().layer(pasted).is_none());
    editor.redo().unwrap();
    assert_eq!(editor.active().unwrap().index_of(pasted), Some(2));
}

#[test]
fn test_delete_selected_is_one_step() {
    let mut editor = editor_with(vec![rect("A"), rect("B")]);
    let before = ids(&editor);
    editor.select_layers([before[1]]).unwrap();

    assert_eq!(editor.delete_selected().unwrap(), 1);
    assert_eq!(ids(&editor), vec![before[0]]);
    assert_eq!(editor.delete_selected().unwrap(), 0);

    editor.undo().unwrap();
    assert_eq!(ids(&editor), before);
}

#[test]
fn test_nudge_uses_configured_steps() {
    let mut editor = editor_with(vec![rect("A")]);
    let id = ids(&editor)[0];

    assert!(!editor.nudge(Nudge::Right, false).unwrap());
    editor.select_layers([id]).unwrap();
    assert!(editor.nudge(Nudge::Right, true).unwrap());
    assert!(editor.nudge(Nudge::Up, false).unwrap());

    let layer = editor.active().unwrap().layer(id).unwrap();
    assert_eq!(layer.transform, Matrix::translation(10.0, -1.0));
    assert_eq!(editor.status().unwrap().dirty_count, 2);

    editor.undo().unwrap();
    editor.undo().unwrap();
    let doc = editor.active().unwrap();
    assert!(doc.layer(id).unwrap().transform.is_identity());

    let bounds = editor.workspace().selection(doc.id).unwrap().bounds.unwrap();
    assert_eq!(bounds.pos, layerkit_core::Point::new(0.0, 0.0));
}

#[test]
fn test_move_update_and_resize_undo() {
    let mut editor = editor_with(vec![rect("A"), rect("B"), rect("C")]);
    let before = ids(&editor);

    assert!(editor.move_layer(before[0], 2).unwrap());
    assert_eq!(ids(&editor), vec![before[1], before[2], before[0]]);

    let patch = LayerPatch::new().with(LayerField::Width, PropertyValue::Number(42.0));
    assert!(editor.update_layer(before[1], patch).unwrap());

    let wrong = LayerPatch::new().with(LayerField::FontSize, PropertyValue::Number(8.0));
    assert!(!editor.update_layer(before[1], wrong).unwrap());

    assert!(editor.resize_document(800, 600).unwrap());
    assert_eq!(editor.active().unwrap().width, 800);
    assert_eq!(editor.status().unwrap().dirty_count, 3);

    editor.undo().unwrap();
    let doc = editor.active().unwrap();
    assert_eq!((doc.width, doc.height), (640, 480));

    editor.undo().unwrap();
    assert_eq!(editor.active().unwrap().layer(before[1]).unwrap().size().x, 10.0);

    editor.undo().unwrap();
    assert_eq!(ids(&editor), before);
    assert!(editor.move_layer(layerkit_core::LayerId::new(), 0).is_err());
}

#[test]
fn test_update_with_wrong_value_type_is_not_recorded() {
    let mut editor = editor_with(vec![rect("A")]);
    let id = ids(&editor)[0];
    let before = editor.active().unwrap().layer(id).unwrap().clone();

    let patch = LayerPatch::new()
        .with(LayerField::Width, PropertyValue::Number(20.0))
        .with(LayerField::Opacity, PropertyValue::String("oops".to_string()));
    assert!(!editor.update_layer(id, patch).unwrap());

    assert_eq!(editor.active().unwrap().layer(id).unwrap(), &before);
    let status = editor.status().unwrap();
    assert!(!status.can_undo);
    assert_eq!(status.dirty_count, 0);
}

#[test]
fn test_write_pixels_round_trip() {
    let mut editor = editor_with(vec![Layer::canvas("Paint", 4, 4), rect("Box")]);
    let (paint, shape) = (ids(&editor)[0], ids(&editor)[1]);
    let red = PixelBuffer::filled(2, 2, Color::rgb(255, 0, 0));

    assert!(!editor.write_pixels(shape, &red).unwrap());
    assert!(editor.write_pixels(paint, &red).unwrap());

    let pixel = |editor: &Editor, x: u32| {
        editor
            .active()
            .unwrap()
            .layer(paint)
            .and_then(|l| l.content())
            .and_then(|c| c.pixel(x, 0))
    };
    assert_eq!(pixel(&editor, 1), Some([255, 0, 0, 255]));
    assert_eq!(pixel(&editor, 3), Some([0, 0, 0, 0]));

    editor.undo().unwrap();
    assert_eq!(pixel(&editor, 1), Some([0, 0, 0, 0]));
}

#[test]
fn test_documents_keep_separate_histories() {
    let mut editor = editor_with(vec![rect("A")]);
    let first = editor.active_id().unwrap();
    let a = ids(&editor)[0];
    editor.select_layers([a]).unwrap();
    editor.nudge_selected(5.0, 0.0).unwrap();

    let second = editor.open_document(Document::new("Second", 10, 10));
    assert_eq!(editor.active_id().unwrap(), second);
    assert_eq!(editor.undo(), Err(HistoryError::NothingToUndo));

    editor.select_document(first).unwrap();
    editor.undo().unwrap();
    assert!(editor.active().unwrap().layer(a).unwrap().transform.is_identity());

    editor.close_document(first);
    assert_eq!(editor.active_id().unwrap(), second);
}

#[test]
fn test_capacity_and_zoom_from_config() {
    let mut config = Config::default();
    config.history.max_entries = 3;
    config.editing.zoom_step = 2.0;

    let mut editor = Editor::new(config);
    editor.open_document(Document::new("Doc", 10, 10).with_layers(vec![rect("A")]));
    let id = ids(&editor)[0];
    editor.select_layers([id]).unwrap();
    for _ in 0..5 {
        editor.nudge(Nudge::Down, false).unwrap();
    }

    let mut undone = 0;
    while editor.undo().is_ok() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    let layer = editor.active().unwrap().layer(id).unwrap();
    assert_eq!(layer.transform, Matrix::translation(0.0, 2.0));

    assert_eq!(editor.zoom_in().unwrap(), 2.0);
    assert_eq!(editor.zoom_out().unwrap(), 1.0);
}

#[test]
fn test_mark_saved_resets_dirty_count() {
    let mut editor = editor_with(vec![rect("A")]);
    editor.resize_document(100, 100).unwrap();
    assert!(editor.status().unwrap().is_dirty());
    editor.mark_saved().unwrap();
    assert!(!editor.status().unwrap().is_dirty());
}
