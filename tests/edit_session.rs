//! Library-level scenarios: whole edit flows against the in-memory backend

use fua::core::{
    add_to_collection_if_missing, enter, resolve, same_identity, Call, EditSession, EntityKind,
    EntityRef, MemoryTransport, Recorder, Resolution, SaveError, SaveOutcome, Step,
    DOCUMENT_IS_NULL, NOT_FOUND_PATH,
};
use fua::entities::{Car, Content, Document};
use serde_json::json;

fn ids(items: &[EntityRef]) -> Vec<i64> {
    items.iter().map(|r| r.id).collect()
}

/// Document 123 holds content 63005; content 3011 is still unattached
fn backend() -> MemoryTransport {
    MemoryTransport::new()
        .with(EntityKind::Content, json!({"id": 63005, "dataContentType": "application/pdf"}))
        .with(EntityKind::Content, json!({"id": 3011, "dataContentType": "text/plain"}))
        .with(EntityKind::Car, json!({"id": 1, "model": "Roadster"}))
        .with(
            EntityKind::Document,
            json!({
                "id": 123,
                "title": "Manual",
                "size": 2048,
                "mimeType": "application/pdf",
                "content": {"id": 63005},
                "car": null
            }),
        )
}

#[test]
fn test_edit_document_offers_current_and_free_contents() {
    let backend = backend();
    let mut nav = Recorder::new();
    let mut alerts = Recorder::new();

    let resolution = resolve::<Document, _>(&backend, Some("123")).unwrap();
    let seed = enter(resolution, &mut nav).unwrap();
    assert!(nav.steps.is_empty());

    let mut session = EditSession::<Document>::new();
    session.open(seed);
    session.load_options(&backend, &mut alerts);

    assert_eq!(ids(session.options("content")), vec![63005, 3011]);
    assert_eq!(ids(session.options("car")), vec![1]);
    assert!(alerts.events.is_empty());
    assert!(backend.calls().contains(&Call::Query {
        kind: EntityKind::Content,
        filter: Some(DOCUMENT_IS_NULL.to_string()),
    }));

    session.set("title", "Owner manual").unwrap();
    session.set("car", "1").unwrap();
    let outcome = session.save(&backend, &mut nav, &mut alerts).unwrap();

    assert!(outcome.is_saved());
    assert_eq!(nav.steps, vec![Step::Back]);
    let stored = backend.get(EntityKind::Document, 123).unwrap();
    assert_eq!(stored["title"], "Owner manual");
    assert_eq!(stored["content"]["id"], 63005);
    assert_eq!(stored["car"]["id"], 1);
}

#[test]
fn test_switching_content_frees_the_old_one() {
    let backend = backend();
    let mut nav = Recorder::new();
    let mut alerts = Recorder::new();

    let seed = resolve::<Document, _>(&backend, Some("123"))
        .unwrap()
        .into_seed()
        .unwrap();
    let mut session = EditSession::<Document>::new();
    session.open(seed);
    session.load_options(&backend, &mut alerts);
    session.set("content", "3011").unwrap();
    session.save(&backend, &mut nav, &mut alerts).unwrap();

    // Reopening a fresh draft now offers 63005 as unattached
    session.open(None);
    session.load_options(&backend, &mut alerts);
    assert_eq!(ids(session.options("content")), vec![63005]);
}

#[test]
fn test_unknown_document_redirects_to_not_found() {
    let backend = backend();
    let mut nav = Recorder::new();

    let resolution = resolve::<Document, _>(&backend, Some("999")).unwrap();
    assert!(matches!(resolution, Resolution::NotFound));
    assert!(enter(resolution, &mut nav).is_none());
    assert_eq!(nav.steps, vec![Step::GoTo(NOT_FOUND_PATH.to_string())]);
}

#[test]
fn test_new_car_flow() {
    let backend = MemoryTransport::new();
    let mut nav = Recorder::new();
    let mut alerts = Recorder::new();

    let seed = enter(resolve::<Car, _>(&backend, None).unwrap(), &mut nav).unwrap();
    assert!(seed.is_none());
    assert!(backend.calls().is_empty());

    let mut session = EditSession::<Car>::new();
    session.open(seed);

    // Required model missing: nothing is sent
    let err = session.save(&backend, &mut nav, &mut alerts).unwrap_err();
    assert!(matches!(err, SaveError::Form(_)));
    assert!(backend.calls().is_empty());
    assert!(!session.is_saving());

    session.set("model", "Cabrio").unwrap();
    let outcome = session.save(&backend, &mut nav, &mut alerts).unwrap();
    let SaveOutcome::Saved(car) = outcome else {
        panic!("expected a saved car");
    };
    assert!(car.id.is_some());
    assert_eq!(nav.backs(), 1);
}

#[test]
fn test_save_interrupted_by_close_is_stale() {
    let backend = MemoryTransport::new().with(EntityKind::Content, json!({"id": 5, "data": "aGk="}));
    let seed = resolve::<Content, _>(&backend, Some("5"))
        .unwrap()
        .into_seed()
        .unwrap();

    let mut session = EditSession::<Content>::new();
    session.open(seed);
    let pending = session.begin_save().unwrap();
    assert!(session.is_saving());
    assert!(matches!(session.begin_save(), Err(SaveError::InFlight)));

    let result = pending.request().dispatch(&backend);
    session.close();
    let outcome = session.finish_save(pending, result);

    assert!(matches!(outcome, SaveOutcome::Stale));
    assert!(session.saved().is_none());
}

#[test]
fn test_identity_and_reconcile_helpers() {
    let current = vec![EntityRef::new(3011)];
    let selected = EntityRef::new(63005);
    let merged = add_to_collection_if_missing(&current, [Some(&selected), None]);
    assert_eq!(ids(&merged), vec![63005, 3011]);

    assert!(same_identity(Some(&EntityRef::new(7)), Some(&EntityRef::new(7))));
    assert!(same_identity::<EntityRef, EntityRef>(None, None));
    assert!(!same_identity(Some(&selected), None::<&EntityRef>));
}
