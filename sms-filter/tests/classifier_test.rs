//! Integration tests for the classifier over JSON file storage

use serde_json::json;
use sms_filter::config::{FilterConfig, StorageConfig};
use sms_filter::spam::{Classifier, KeywordStore, SpamChoice, Verdict};
use sms_filter::storage::{Collection, CollectionStore, JsonFileStore};
use sms_filter::FilterError;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper to create a data directory with a keyword table
fn setup_data_dir(keywords: serde_json::Value) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("keywords.json"),
        serde_json::to_string(&keywords).unwrap(),
    )
    .unwrap();
    dir
}

async fn load_classifier(dir: &TempDir) -> Classifier {
    let storage = Arc::new(JsonFileStore::new(dir.path()));
    let (keywords, report) = KeywordStore::load(storage).await.unwrap();
    assert_eq!(report.total_skipped(), 0);
    Classifier::with_defaults(Arc::new(keywords))
}

#[tokio::test]
async fn test_winner_scenario() {
    let dir = setup_data_dir(json!([
        {"word": "free", "score": 6},
        {"word": "winner", "score": 7}
    ]));
    let classifier = load_classifier(&dir).await;

    let check = classifier
        .evaluate("You are a winner, claim your free prize")
        .await;
    assert_eq!(check.verdict, Verdict::Spam);
    assert_eq!(check.score, 13);
    assert!(check.match_percent.is_none());
}

#[tokio::test]
async fn test_reported_message_scenario() {
    let dir = setup_data_dir(json!([]));
    std::fs::write(
        dir.path().join("spam_messages.json"),
        r#"[{"message": "congratulations you won", "score": 0}]"#,
    )
    .unwrap();
    let classifier = load_classifier(&dir).await;

    assert_eq!(
        classifier.classify("congratulations you won a prize").await,
        Verdict::Spam
    );
}

#[tokio::test]
async fn test_missing_keyword_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(JsonFileStore::new(dir.path()));

    let result = KeywordStore::load(storage).await;
    assert!(matches!(result, Err(FilterError::MissingReferenceData(_))));
}

#[tokio::test]
async fn test_unreadable_keyword_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("keywords.json"), "not json").unwrap();
    let storage = Arc::new(JsonFileStore::new(dir.path()));

    let result = KeywordStore::load(storage).await;
    assert!(matches!(result, Err(FilterError::MissingReferenceData(_))));
}

#[tokio::test]
async fn test_malformed_records_are_skipped() {
    let dir = setup_data_dir(json!([
        {"word": "free", "score": 6},
        {"word": "oops"},
        {"word": "cash", "score": 4}
    ]));
    std::fs::write(
        dir.path().join("good_messages.json"),
        r#"["hello", 12, "bye"]"#,
    )
    .unwrap();
    let storage = Arc::new(JsonFileStore::new(dir.path()));

    let (keywords, report) = KeywordStore::load(storage).await.unwrap();
    assert_eq!(report.keywords_skipped, 1);
    assert_eq!(report.good_skipped, 1);
    assert_eq!(report.spam_skipped, 0);
    assert_eq!(keywords.lookup_word_score("cash").await, 4);
    assert!(keywords.is_known_good("bye").await);
}

#[tokio::test]
async fn test_feedback_survives_reload() {
    let dir = setup_data_dir(json!([
        {"word": "free", "score": 6},
        {"word": "prize", "score": 3}
    ]));

    {
        let classifier = load_classifier(&dir).await;
        classifier
            .apply_choice("Free prize inside!", SpamChoice::Spam)
            .await
            .unwrap();
        classifier
            .apply_choice("running late, 10 min", SpamChoice::Good)
            .await
            .unwrap();
        classifier
            .store()
            .update_word_score("inside", Some(2))
            .await
            .unwrap();
    }

    let classifier = load_classifier(&dir).await;
    let store = classifier.store();
    assert_eq!(store.reported_spam_score("Free prize inside!").await, Some(9));
    assert!(store.is_known_good("running late, 10 min").await);
    assert_eq!(store.lookup_word_score("inside").await, 2);
    assert_eq!(store.stats().await.keywords, 3);
}

#[tokio::test]
async fn test_removals_survive_reload() {
    let dir = setup_data_dir(json!([{"word": "free", "score": 6}]));

    {
        let classifier = load_classifier(&dir).await;
        let store = classifier.store();
        store.record_spam_message("free cash").await.unwrap();
        store.record_good_message("hi").await.unwrap();
        store.remove_spam_message("free cash").await.unwrap();
        store.remove_good_message("hi").await.unwrap();
        store.remove_word("free").await.unwrap();
    }

    let storage = JsonFileStore::new(dir.path());
    assert_eq!(
        storage.load(Collection::ReportedSpam).await.unwrap(),
        Some(vec![])
    );
    assert_eq!(
        storage.load(Collection::KnownGood).await.unwrap(),
        Some(vec![])
    );
    assert_eq!(storage.load(Collection::Keywords).await.unwrap(), Some(vec![]));
}

#[tokio::test]
async fn test_open_from_config() {
    let dir = setup_data_dir(json!([{"word": "loan", "score": 5}]));
    let config = FilterConfig {
        storage: StorageConfig {
            data_dir: dir.path().to_path_buf(),
        },
        ..FilterConfig::default()
    };

    let (classifier, report) = sms_filter::open(&config).await.unwrap();
    assert_eq!(report.total_skipped(), 0);
    assert_eq!(classifier.classify("loan loan").await, Verdict::Ambiguous);
    assert_eq!(classifier.classify("loan").await, Verdict::Good);
}

#[tokio::test]
async fn test_concurrent_classify_and_feedback() {
    let dir = setup_data_dir(json!([{"word": "deal", "score": 4}]));
    let classifier = Arc::new(load_classifier(&dir).await);

    let mut handles = Vec::new();
    for i in 0..16 {
        let classifier = classifier.clone();
        handles.push(tokio::spawn(async move {
            let message = format!("hot deal number {}", i);
            classifier.classify(&message).await;
            classifier.on_user_confirmed_spam(&message).await.unwrap();
            classifier.on_user_confirmed_good(&format!("thanks {}", i)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let storage = JsonFileStore::new(dir.path());
    let spam = storage.load(Collection::ReportedSpam).await.unwrap().unwrap();
    let good = storage.load(Collection::KnownGood).await.unwrap().unwrap();
    assert_eq!(spam.len(), 16);
    assert_eq!(good.len(), 16);
}

#[tokio::test]
async fn test_two_stores_on_one_directory() {
    let dir = setup_data_dir(json!([{"word": "free", "score": 2}]));
    let (first, _) = KeywordStore::load(Arc::new(JsonFileStore::new(dir.path())))
        .await
        .unwrap();
    let (second, _) = KeywordStore::load(Arc::new(JsonFileStore::new(dir.path())))
        .await
        .unwrap();
    let first = Arc::new(first);
    let second = Arc::new(second);

    let mut handles = Vec::new();
    for i in 0..200 {
        let store = if i % 2 == 0 { first.clone() } else { second.clone() };
        handles.push(tokio::spawn(async move {
            store.record_spam_message(&format!("free gift {}", i)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Last writer wins per collection; the file is always a whole snapshot
    let storage = JsonFileStore::new(dir.path());
    let spam = storage.load(Collection::ReportedSpam).await.unwrap().unwrap();
    assert_eq!(spam.len(), 100);

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| !name.ends_with(".json"))
        .collect();
    assert!(names.is_empty(), "stray files left behind: {:?}", names);
}
