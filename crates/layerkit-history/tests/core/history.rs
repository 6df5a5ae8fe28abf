use crate::common::{rect, Fixture};
use layerkit_core::{HistoryEvent, Matrix};
use layerkit_history::{
    Action, Document, HistoryService, LayerField, LayerPatch, PostAction, PropertyValue,
    SelectionState,
};
use proptest::prelude::*;

#[test]
fn test_commit_undo_redo_round_trip() {
    let mut fx = Fixture::new(vec![rect("L")]);
    let id = fx.layer_id(0);
    let before = fx.layer(id).clone();

    assert!(fx.transform(id, Matrix::translation(10.0, 10.0).rotate(15.0)));
    let after = fx.layer(id).clone();

    assert!(fx.undo());
    assert_eq!(fx.layer(id), &before);
    assert!(fx.redo());
    assert_eq!(fx.layer(id), &after);
}

#[test]
fn test_redo_branch_is_truncated_by_new_commit() {
    let mut fx = Fixture::new(vec![rect("L")]);
    let id = fx.layer_id(0);
    for n in 1..=3 {
        fx.transform(id, Matrix::translation(n as f64, 0.0));
    }

    assert!(fx.undo());
    assert!(fx.undo());
    fx.transform(id, Matrix::translation(0.0, 99.0));

    assert!(fx.service.redo(fx.document.id).is_none());
    assert_eq!(fx.service.history(fx.document.id).unwrap().len(), 2);
    assert!(!fx.service.status(fx.document.id).can_redo);
}

#[test]
fn test_bounded_history_keeps_fifty() {
    let mut fx = Fixture::new(vec![rect("L")]);
    let id = fx.layer_id(0);
    for n in 0..60 {
        fx.transform(id, Matrix::translation(n as f64, 0.0));
    }

    let history = fx.service.history(fx.document.id).unwrap();
    assert_eq!(history.len(), 50);
    assert_eq!(history.cursor(), 49);

    for _ in 0..50 {
        assert!(fx.undo());
    }
    assert!(!fx.undo());
    // the ten evicted steps can no longer be reverted
    assert_eq!(fx.layer(id).transform, Matrix::translation(9.0, 0.0));
}

#[test]
fn test_compound_is_reverted_in_one_step() {
    let mut fx = Fixture::new(vec![rect("B")]);
    let b = fx.layer_id(0);

    let a = rect("A");
    let a_id = a.id;
    fx.document.insert_layer(a.clone(), 1);
    let moved = Matrix::translation(4.0, 4.0);
    fx.document.layer_mut(b).unwrap().transform = moved;

    assert!(fx.commit(PostAction::Compound {
        actions: vec![
            PostAction::Create {
                layer: a,
                position: 1,
            },
            PostAction::Transform {
                layer_id: b,
                new_matrix: moved,
                new_bounds: None,
            },
        ],
    }));
    assert_eq!(fx.service.history(fx.document.id).unwrap().len(), 1);

    assert!(fx.undo());
    assert!(fx.document.layer(a_id).is_none());
    assert!(fx.layer(b).transform.is_identity());
    assert_eq!(fx.cursor(), -1);

    assert!(fx.redo());
    assert_eq!(fx.document.index_of(a_id), Some(1));
    assert_eq!(fx.layer(b).transform, moved);
}

#[test]
fn test_histories_are_independent_per_document() {
    let mut service = HistoryService::default();
    let selection = SelectionState::new();
    let mut x = Document::new("X", 10, 10).with_layers(vec![rect("x")]);
    let y = Document::new("Y", 10, 10).with_layers(vec![rect("y")]);
    service.activate(&x, &selection);
    service.activate(&y, &selection);

    let y_layer = y.layers[0].clone();
    let x_id = x.layers[0].id;
    x.layers[0].transform = Matrix::translation(1.0, 1.0);
    assert!(service.commit(
        x.id,
        PostAction::Transform {
            layer_id: x_id,
            new_matrix: Matrix::translation(1.0, 1.0),
            new_bounds: None,
        }
    ));

    assert!(service.history(y.id).is_none());
    assert!(service.undo(y.id).is_none());
    assert_eq!(service.status(y.id).dirty_count, 0);
    assert_eq!(service.snapshots().get(y_layer.id), Some(&y_layer));
    assert_eq!(service.status(x.id).dirty_count, 1);
}

#[test]
fn test_missing_snapshot_drops_commit_and_keeps_redo_tail() {
    let mut fx = Fixture::new(vec![rect("L")]);
    let id = fx.layer_id(0);
    fx.transform(id, Matrix::translation(1.0, 0.0));
    fx.transform(id, Matrix::translation(2.0, 0.0));
    fx.undo();

    let stranger = rect("never seen");
    let recorded = fx.commit(PostAction::Transform {
        layer_id: stranger.id,
        new_matrix: Matrix::identity(),
        new_bounds: None,
    });

    assert!(!recorded);
    let history = fx.service.history(fx.document.id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.cursor(), 0);
    assert!(fx.service.snapshots().get(stranger.id).is_none());
    assert!(fx.redo());
}

#[test]
fn test_dirty_counter_tracks_commits_undos_and_saves() {
    let mut fx = Fixture::new(vec![rect("L")]);
    let id = fx.layer_id(0);
    let doc = fx.document.id;

    fx.transform(id, Matrix::translation(1.0, 0.0));
    fx.transform(id, Matrix::translation(2.0, 0.0));
    assert_eq!(fx.service.status(doc).dirty_count, 2);

    fx.service.mark_saved(doc);
    assert!(!fx.service.status(doc).is_dirty());

    fx.undo();
    let status = fx.service.status(doc);
    assert_eq!(status.dirty_count, -1);
    assert!(status.can_undo);
    assert!(status.can_redo);

    fx.redo();
    assert_eq!(fx.service.status(doc).dirty_count, 0);
}

#[test]
fn test_events_follow_history() {
    let mut fx = Fixture::new(vec![rect("L")]);
    let id = fx.layer_id(0);
    let doc = fx.document.id;
    let mut rx = fx.service.subscribe();

    fx.transform(id, Matrix::translation(1.0, 0.0));
    fx.undo();
    fx.commit(PostAction::Content {
        layer_id: id,
        new_content: layerkit_core::PixelBuffer::new(1, 1),
    });

    assert!(matches!(rx.try_recv(), Ok(HistoryEvent::Committed { document, .. }) if document == doc));
    assert!(matches!(rx.try_recv(), Ok(HistoryEvent::Undone { .. })));
    assert!(matches!(rx.try_recv(), Ok(HistoryEvent::Dropped { .. })));
    assert!(rx.try_recv().is_err());
}

fn numeric_fields() -> Vec<LayerField> {
    vec![
        LayerField::Opacity,
        LayerField::Width,
        LayerField::Height,
        LayerField::StrokeWidth,
        LayerField::CornerRadius,
    ]
}

proptest! {
    #[test]
    fn prop_history_never_exceeds_capacity(commits in 1usize..120, capacity in 1usize..60) {
        let mut fx = Fixture::with_capacity(capacity, vec![rect("L")]);
        let id = fx.layer_id(0);
        for n in 0..commits {
            fx.transform(id, Matrix::translation(n as f64, 0.0));
        }

        let kept = commits.min(capacity);
        let history = fx.service.history(fx.document.id).unwrap();
        prop_assert_eq!(history.len(), kept);
        prop_assert_eq!(history.cursor(), kept as isize - 1);

        let mut undone = 0;
        while fx.undo() {
            undone += 1;
        }
        prop_assert_eq!(undone, kept);
    }

    #[test]
    fn prop_update_old_and_new_share_keys(
        keys in proptest::sample::subsequence(numeric_fields(), 1..=5),
        value in -1000.0f64..1000.0,
    ) {
        let mut fx = Fixture::new(vec![rect("L")]);
        let id = fx.layer_id(0);

        let patch: LayerPatch = keys
            .iter()
            .map(|key| (*key, PropertyValue::Number(value)))
            .collect();
        patch.apply_to(fx.document.layer_mut(id).unwrap());
        let committed = fx.commit(PostAction::Update { layer_id: id, new_layer: patch });
        prop_assert!(committed);

        let entry = fx.service.history(fx.document.id).unwrap().current().unwrap();
        match &entry.action {
            Action::Update { old_layer, new_layer, .. } => {
                prop_assert!(old_layer.same_keys(new_layer));
                prop_assert_eq!(old_layer.len(), keys.len());
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}
