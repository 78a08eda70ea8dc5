mod helpers;

use helpers::{
    stored_collection, stored_ids, test_db, write_dataset, FakeEmbedder, COLLECTION,
    THREE_RESTAURANTS,
};
use tastebud::collection::store::{count_entries, get_or_create_collection};
use tastebud::collection::types::DistanceMetric;
use tastebud::error::{EmbeddingError, IngestError, StorageError};
use tastebud::normalize::TextNormalizer;
use tastebud::pipeline;
use tempfile::TempDir;

#[tokio::test]
async fn three_records_become_three_entries() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(tmp.path(), THREE_RESTAURANTS);
    let mut conn = test_db();
    let embedder = FakeEmbedder::new();

    let report = pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &embedder,
        &TextNormalizer::english(),
        &dataset,
    )
    .await
    .unwrap();

    assert_eq!(report.collection, COLLECTION);
    assert_eq!(report.metric, DistanceMetric::Cosine);
    assert_eq!(report.documents, 3);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.dimension, Some(8));
    assert_eq!(embedder.calls.get(), 3);

    let collection = stored_collection(&conn).unwrap();
    assert_eq!(collection.dimension, Some(8));
    assert_eq!(stored_ids(&conn, &collection), vec!["0", "1", "2"]);
}

#[tokio::test]
async fn stored_documents_are_cleaned_text_in_input_order() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(tmp.path(), THREE_RESTAURANTS);
    let mut conn = test_db();
    let embedder = FakeEmbedder::new();

    pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &embedder,
        &TextNormalizer::english(),
        &dataset,
    )
    .await
    .unwrap();

    let expected = vec![
        "taco spot main st tacos great".to_string(),
        "noodle bar elm st rich broth slow service".to_string(),
        "pizza place oak ave crispy crust fresh basil".to_string(),
    ];
    assert_eq!(*embedder.seen.borrow(), expected);

    let collection = stored_collection(&conn).unwrap();
    let (document, metadata): (String, String) = conn
        .query_row(
            "SELECT document, metadata FROM collection_entries WHERE collection_id = ?1 AND id = '1'",
            [collection.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(document, expected[1]);
    let metadata: serde_json::Value = serde_json::from_str(&metadata).unwrap();
    assert_eq!(metadata["name"], "Noodle Bar");
    assert_eq!(metadata["address"], "2 Elm St");
}

#[tokio::test]
async fn empty_dataset_makes_no_calls_and_no_entries() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(tmp.path(), "[]");
    let mut conn = test_db();
    let embedder = FakeEmbedder::new();

    let report = pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &embedder,
        &TextNormalizer::english(),
        &dataset,
    )
    .await
    .unwrap();

    assert_eq!(report.documents, 0);
    assert_eq!(report.inserted, 0);
    assert!(report.dimension.is_none());
    assert_eq!(embedder.calls.get(), 0);

    let collection = stored_collection(&conn).unwrap();
    assert_eq!(count_entries(&conn, &collection).unwrap(), 0);
    assert!(collection.dimension.is_none());
}

#[tokio::test]
async fn authentication_failure_aborts_without_entries() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(tmp.path(), THREE_RESTAURANTS);
    let mut conn = test_db();
    let embedder = FakeEmbedder::failing_at(1);

    let err = pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &embedder,
        &TextNormalizer::english(),
        &dataset,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        IngestError::ExternalService(EmbeddingError::Authentication { status: 401, .. })
    ));
    // No further calls after the failure
    assert_eq!(embedder.calls.get(), 2);
    assert!(stored_collection(&conn).is_none());
}

#[tokio::test]
async fn missing_dataset_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut conn = test_db();
    let embedder = FakeEmbedder::new();

    let err = pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &embedder,
        &TextNormalizer::english(),
        &tmp.path().join("missing.json"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IngestError::DataLoad(_)));
    assert_eq!(embedder.calls.get(), 0);
    assert!(stored_collection(&conn).is_none());
}

#[tokio::test]
async fn malformed_dataset_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(tmp.path(), r#"[{"name": "No Address"}]"#);
    let mut conn = test_db();
    let embedder = FakeEmbedder::new();

    let err = pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &embedder,
        &TextNormalizer::english(),
        &dataset,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IngestError::DataLoad(_)));
    assert!(stored_collection(&conn).is_none());
}

#[tokio::test]
async fn invalid_collection_name_fails_before_embedding() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(tmp.path(), THREE_RESTAURANTS);
    let mut conn = test_db();
    let embedder = FakeEmbedder::new();

    let err = pipeline::run(
        &mut conn,
        "no",
        DistanceMetric::Cosine,
        &embedder,
        &TextNormalizer::english(),
        &dataset,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        IngestError::Storage(StorageError::InvalidCollectionName(_))
    ));
    assert_eq!(embedder.calls.get(), 0);
}

#[tokio::test]
async fn existing_collection_keeps_its_metric() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(tmp.path(), THREE_RESTAURANTS);
    let mut conn = test_db();
    get_or_create_collection(&conn, COLLECTION, DistanceMetric::L2).unwrap();

    let report = pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &FakeEmbedder::new(),
        &TextNormalizer::english(),
        &dataset,
    )
    .await
    .unwrap();

    assert_eq!(report.metric, DistanceMetric::L2);
    assert_eq!(report.inserted, 3);
}

#[tokio::test]
async fn second_run_conflicts_instead_of_overwriting() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(tmp.path(), THREE_RESTAURANTS);
    let mut conn = test_db();
    let normalizer = TextNormalizer::english();

    pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &FakeEmbedder::new(),
        &normalizer,
        &dataset,
    )
    .await
    .unwrap();

    let err = pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &FakeEmbedder::new(),
        &normalizer,
        &dataset,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        IngestError::Storage(StorageError::DuplicateId { ref id, .. }) if id == "0"
    ));
    let collection = stored_collection(&conn).unwrap();
    assert_eq!(count_entries(&conn, &collection).unwrap(), 3);
}

#[tokio::test]
async fn extra_stopwords_reach_the_embedder() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(
        tmp.path(),
        r#"[{"name": "Corner Restaurant", "address": "9 Pine Rd", "reviews": "Best restaurant in town"}]"#,
    );
    let mut conn = test_db();
    let embedder = FakeEmbedder::new();
    let normalizer = TextNormalizer::english().with_extra_stopwords(["restaurant", "rd"]);

    pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &embedder,
        &normalizer,
        &dataset,
    )
    .await
    .unwrap();

    assert_eq!(*embedder.seen.borrow(), vec!["corner pine best town".to_string()]);
}

#[tokio::test]
async fn punctuated_reviews_keep_their_words() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_dataset(
        tmp.path(),
        r#"[{"name": "Mac&Co", "address": "5 Bay St", "reviews": ["Cheesy...so good #yum", "Cannot beat it--seriously"]}]"#,
    );
    let mut conn = test_db();
    let embedder = FakeEmbedder::new();

    pipeline::run(
        &mut conn,
        COLLECTION,
        DistanceMetric::Cosine,
        &embedder,
        &TextNormalizer::english(),
        &dataset,
    )
    .await
    .unwrap();

    assert_eq!(
        *embedder.seen.borrow(),
        vec!["mac co bay st cheesy good yum beat seriously".to_string()]
    );
}
