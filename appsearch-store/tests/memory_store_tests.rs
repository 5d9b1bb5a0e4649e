use appsearch_store::{IndexStore, MemoryIndexStore, StoreError};
use appsearch_types::{DocumentId, GenericDocument, VisibilityPolicy, FINGERPRINT_PROPERTY};

fn doc(id: &str, fingerprint: &[u8]) -> GenericDocument {
    let mut doc = GenericDocument::new("contacts", id, "builtin:Person");
    doc.set_string(FINGERPRINT_PROPERTY, hex::encode(fingerprint));
    doc
}

fn id(raw: &str) -> DocumentId {
    DocumentId::new("contacts", raw)
}

#[tokio::test]
async fn put_then_fingerprint_lookup() {
    let store = MemoryIndexStore::open_in_memory();
    let result = store
        .put_documents(vec![doc("1", &[1, 1]), doc("2", &[2, 2])])
        .await
        .unwrap();
    assert!(result.is_complete_success());
    assert_eq!(result.succeeded.len(), 2);

    let fingerprints = store
        .get_document_fingerprints(&[id("1"), id("2"), id("missing")])
        .await
        .unwrap();
    assert_eq!(fingerprints.len(), 2);
    assert_eq!(fingerprints[&id("1")], vec![1, 1]);
    assert_eq!(fingerprints[&id("2")], vec![2, 2]);
}

#[tokio::test]
async fn per_item_failure_is_isolated() {
    let store = MemoryIndexStore::open_in_memory();
    store.fail_document(id("bad")).await;

    let result = store
        .put_documents(vec![doc("good", &[1]), doc("bad", &[2])])
        .await
        .unwrap();
    assert_eq!(result.succeeded, vec![id("good")]);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].id, id("bad"));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn capacity_overflow_is_out_of_space() {
    let store = MemoryIndexStore::open_in_memory();
    store.set_capacity(1).await;

    store.put_documents(vec![doc("1", &[1])]).await.unwrap();
    let err = store
        .put_documents(vec![doc("2", &[2])])
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::OutOfSpace);
}

#[tokio::test]
async fn remove_reports_missing_ids_per_item() {
    let store = MemoryIndexStore::open_in_memory();
    store.put_documents(vec![doc("1", &[1])]).await.unwrap();

    let result = store
        .remove_documents(&[id("1"), id("ghost")])
        .await
        .unwrap();
    assert_eq!(result.succeeded, vec![id("1")]);
    assert_eq!(result.failures.len(), 1);
    assert!(matches!(result.failures[0].error, StoreError::NotFound(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn visibility_policy_round_trip() {
    let store = MemoryIndexStore::open_in_memory();
    assert_eq!(store.get_visibility_policy("pkg$db/T").await.unwrap(), None);

    store
        .put_visibility_policy(VisibilityPolicy::new("pkg$db/T"))
        .await;
    let policy = store.get_visibility_policy("pkg$db/T").await.unwrap();
    assert_eq!(policy.unwrap().schema_type, "pkg$db/T");
}
