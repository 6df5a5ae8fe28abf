use crate::common::rect;
use layerkit_core::{Matrix, PixelBuffer};
use layerkit_history::{Action, Document, HistoryError, HistoryService, PostAction};

fn transform_post(layer_id: layerkit_core::LayerId, matrix: Matrix) -> PostAction {
    PostAction::Transform {
        layer_id,
        new_matrix: matrix,
        new_bounds: None,
    }
}

#[test]
fn test_begin_snapshots_unseen_layer() {
    let mut service = HistoryService::default();
    let mut doc = Document::new("Doc", 10, 10).with_layers(vec![rect("A")]);
    let id = doc.layers[0].id;

    let handle = service.begin_change(doc.id, &doc.layers[0]).unwrap();
    assert!(service.is_changing(id));

    doc.layers[0].transform = Matrix::translation(3.0, 3.0);
    service
        .commit_change(handle, transform_post(id, Matrix::translation(3.0, 3.0)))
        .unwrap();
    assert!(!service.is_changing(id));

    match &service.history(doc.id).unwrap().current().unwrap().action {
        Action::Transform { old_matrix, .. } => assert!(old_matrix.is_identity()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_second_begin_on_same_layer_is_refused() {
    let mut service = HistoryService::default();
    let doc = Document::new("Doc", 10, 10).with_layers(vec![rect("A")]);

    let _first = service.begin_change(doc.id, &doc.layers[0]).unwrap();
    let err = service.begin_change(doc.id, &doc.layers[0]).unwrap_err();
    assert_eq!(
        err,
        HistoryError::ChangeInProgress {
            layer: doc.layers[0].id
        }
    );
}

#[test]
fn test_consumed_handle_has_no_matching_begin() {
    let mut service = HistoryService::default();
    let doc = Document::new("Doc", 10, 10).with_layers(vec![rect("A")]);
    let id = doc.layers[0].id;

    let handle = service.begin_change(doc.id, &doc.layers[0]).unwrap();
    let replayed = handle.clone();
    service
        .commit_change(handle, transform_post(id, Matrix::identity()))
        .unwrap();

    let err = service
        .commit_change(replayed, transform_post(id, Matrix::identity()))
        .unwrap_err();
    assert_eq!(err, HistoryError::NoMatchingBegin { layer: id });
    assert_eq!(service.history(doc.id).unwrap().len(), 1);
}

#[test]
fn test_mismatched_layer_keeps_change_open() {
    let mut service = HistoryService::default();
    let doc = Document::new("Doc", 10, 10).with_layers(vec![rect("A"), rect("B")]);
    let (a, b) = (doc.layers[0].id, doc.layers[1].id);

    let handle = service.begin_change(doc.id, &doc.layers[0]).unwrap();
    let err = service
        .commit_change(handle.clone(), transform_post(b, Matrix::identity()))
        .unwrap_err();
    assert_eq!(err, HistoryError::LayerMismatch { expected: a });
    assert!(service.is_changing(a));
    assert!(service.history(doc.id).is_none());

    assert!(service.cancel_change(&handle));
    assert!(!service.is_changing(a));
    assert!(!service.cancel_change(&handle));
}

#[test]
fn test_unconvertible_change_reports_missing_snapshot() {
    let mut service = HistoryService::default();
    let doc = Document::new("Doc", 10, 10).with_layers(vec![rect("A")]);
    let id = doc.layers[0].id;

    let handle = service.begin_change(doc.id, &doc.layers[0]).unwrap();
    let err = service
        .commit_change(
            handle,
            PostAction::Content {
                layer_id: id,
                new_content: PixelBuffer::new(1, 1),
            },
        )
        .unwrap_err();

    assert_eq!(err, HistoryError::MissingSnapshot { layer: id });
    assert!(!service.is_changing(id));
    assert!(service.history(doc.id).is_none());
}
