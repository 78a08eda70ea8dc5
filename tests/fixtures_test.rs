use std::path::Path;

use tastebud::config::{TastebudConfig, DATABASE_FILE};
use tastebud::dataset::{clean_documents, load_restaurants, Reviews};
use tastebud::normalize::TextNormalizer;

fn manifest_path(rel: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(rel)
}

#[test]
fn bundled_dataset_loads() {
    let restaurants =
        load_restaurants(manifest_path("test_data/restaurants_with_reviews.json")).unwrap();
    let documents = clean_documents(&restaurants, &TextNormalizer::english());

    assert_eq!(restaurants.len(), 5);
    assert_eq!(documents.len(), 5);
    assert_eq!(restaurants[0].name, "Guisados");
    assert!(matches!(restaurants[2].reviews, Reviews::One(_)));
    assert!(documents[0].starts_with("guisados e cesar e chavez ave los angeles ca"));
    for document in &documents {
        assert!(!document.is_empty());
        assert!(document.split(' ').all(|t| t.chars().all(char::is_alphabetic)));
    }
}

#[test]
fn example_settings_match_defaults() {
    let contents = std::fs::read_to_string(manifest_path("tastebud.example.toml")).unwrap();
    let parsed: TastebudConfig = toml::from_str(&contents).unwrap();
    let defaults = TastebudConfig::default();

    assert_eq!(parsed.logging.level, defaults.logging.level);
    assert_eq!(parsed.dataset.path, defaults.dataset.path);
    assert_eq!(parsed.embedding.model, defaults.embedding.model);
    assert_eq!(parsed.embedding.base_url, defaults.embedding.base_url);
    assert_eq!(parsed.storage.collection, defaults.storage.collection);
    assert_eq!(parsed.storage.distance_metric, defaults.storage.distance_metric);
    assert!(parsed.resolved_db_path().ends_with(DATABASE_FILE));
}
