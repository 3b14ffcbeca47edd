//! Keyword store
//!
//! Owns the keyword score table, the reported spam messages and the known
//! good messages. Every mutation is written through to the backing
//! [`CollectionStore`] before the call returns.
//!
//! Each collection has its own lock, so classification reads of one
//! collection are not held up by a write to another. A per-collection write
//! mutex is held across mutate, snapshot and save, which keeps saves of the
//! same collection from overlapping and makes them land in mutation order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use super::text::{normalize_key, split_tokens, vocabulary};
use super::types::{KeywordScore, LoadReport, ReportedSpamMessage, StoreStats};
use crate::error::{FilterError, Result};
use crate::storage::{Collection, CollectionStore};

/// A reported spam message with its pre-computed vocabulary
struct SpamEntry {
    score: u32,
    vocabulary: HashSet<String>,
}

impl SpamEntry {
    fn new(message: &str, score: u32) -> Self {
        Self {
            score,
            vocabulary: vocabulary(message),
        }
    }
}

pub struct KeywordStore {
    store: Arc<dyn CollectionStore>,
    /// Normalized key -> stored keyword
    keywords: RwLock<HashMap<String, KeywordScore>>,
    /// Raw message -> cached score and vocabulary
    reported_spam: RwLock<HashMap<String, SpamEntry>>,
    known_good: RwLock<HashSet<String>>,
    keywords_write: Mutex<()>,
    spam_write: Mutex<()>,
    good_write: Mutex<()>,
}

impl KeywordStore {
    /// Load all collections from storage.
    ///
    /// The keyword table must exist. Missing spam/good collections start
    /// empty. Records that fail to parse are skipped and counted in the
    /// returned [`LoadReport`].
    pub async fn load(store: Arc<dyn CollectionStore>) -> Result<(Self, LoadReport)> {
        let mut report = LoadReport::default();

        let keyword_records = match store.load(Collection::Keywords).await {
            Ok(Some(records)) => records,
            Ok(None) => {
                return Err(FilterError::MissingReferenceData(
                    "keyword collection not found".to_string(),
                ))
            }
            Err(e) => {
                return Err(FilterError::MissingReferenceData(format!(
                    "failed to load keyword collection: {}",
                    e
                )))
            }
        };

        let mut keywords: HashMap<String, KeywordScore> = HashMap::new();
        for record in keyword_records {
            match serde_json::from_value::<KeywordScore>(record) {
                Ok(entry) => {
                    let key = normalize_key(&entry.word);
                    if key.is_empty() {
                        warn!("Skipping keyword '{}' with no letters or digits", entry.word);
                        report.keywords_skipped += 1;
                        continue;
                    }
                    if let Some(previous) = keywords.get(&key) {
                        warn!(
                            "Keywords '{}' and '{}' normalize to '{}', keeping the later one",
                            previous.word, entry.word, key
                        );
                    }
                    keywords.insert(key, entry);
                }
                Err(e) => {
                    warn!("Skipping malformed keyword record: {}", e);
                    report.keywords_skipped += 1;
                }
            }
        }

        let mut reported_spam = HashMap::new();
        for record in store.load(Collection::ReportedSpam).await?.unwrap_or_default() {
            match serde_json::from_value::<ReportedSpamMessage>(record) {
                Ok(entry) => {
                    let spam = SpamEntry::new(&entry.message, entry.score);
                    reported_spam.insert(entry.message, spam);
                }
                Err(e) => {
                    warn!("Skipping malformed spam message record: {}", e);
                    report.spam_skipped += 1;
                }
            }
        }

        let mut known_good = HashSet::new();
        for record in store.load(Collection::KnownGood).await?.unwrap_or_default() {
            match record {
                serde_json::Value::String(message) => {
                    known_good.insert(message);
                }
                other => {
                    warn!("Skipping malformed good message record: {}", other);
                    report.good_skipped += 1;
                }
            }
        }

        info!(
            "Loaded {} keywords, {} reported spam messages, {} known good messages ({} records skipped)",
            keywords.len(),
            reported_spam.len(),
            known_good.len(),
            report.total_skipped()
        );

        let keyword_store = Self {
            store,
            keywords: RwLock::new(keywords),
            reported_spam: RwLock::new(reported_spam),
            known_good: RwLock::new(known_good),
            keywords_write: Mutex::new(()),
            spam_write: Mutex::new(()),
            good_write: Mutex::new(()),
        };

        Ok((keyword_store, report))
    }

    /// Score of a single word, matched case- and punctuation-insensitively.
    /// Unknown words score 0.
    pub async fn lookup_word_score(&self, word: &str) -> u32 {
        let keywords = self.keywords.read().await;
        Self::score_in(&keywords, &normalize_key(word))
    }

    /// Sum of word scores over the space-separated tokens of a message
    pub async fn message_score(&self, message: &str) -> u32 {
        let keywords = self.keywords.read().await;
        split_tokens(message)
            .map(|token| Self::score_in(&keywords, &normalize_key(token)))
            .fold(0u32, u32::saturating_add)
    }

    fn score_in(keywords: &HashMap<String, KeywordScore>, key: &str) -> u32 {
        keywords.get(key).map(|k| k.score).unwrap_or(0)
    }

    /// Set a word's score to `override_score`, or re-derive it from the
    /// current table when no override is given. Returns the stored score.
    ///
    /// Words without any ASCII letter or digit are rejected, since no token
    /// could ever match them.
    pub async fn update_word_score(&self, word: &str, override_score: Option<u32>) -> Result<u32> {
        let key = normalize_key(word);
        if key.is_empty() {
            return Err(FilterError::InvalidKeyword(word.to_string()));
        }

        let _write = self.keywords_write.lock().await;

        let (score, records) = {
            let mut keywords = self.keywords.write().await;
            let score = override_score.unwrap_or_else(|| Self::score_in(&keywords, &key));
            keywords.insert(
                key,
                KeywordScore {
                    word: word.to_string(),
                    score,
                },
            );
            (score, Self::keyword_records(&keywords)?)
        };

        debug!("Keyword '{}' scored {}", word, score);
        self.persist(Collection::Keywords, records).await?;
        Ok(score)
    }

    /// Remove a keyword by its normalized form. Returns whether it existed.
    pub async fn remove_word(&self, word: &str) -> Result<bool> {
        let _write = self.keywords_write.lock().await;

        let records = {
            let mut keywords = self.keywords.write().await;
            if keywords.remove(&normalize_key(word)).is_none() {
                return Ok(false);
            }
            Self::keyword_records(&keywords)?
        };

        self.persist(Collection::Keywords, records).await?;
        Ok(true)
    }

    /// Store a reported spam message with its current keyword score,
    /// replacing any earlier report of the same text.
    pub async fn record_spam_message(&self, message: &str) -> Result<u32> {
        let score = self.message_score(message).await;
        let _write = self.spam_write.lock().await;

        let records = {
            let mut reported = self.reported_spam.write().await;
            reported.insert(message.to_string(), SpamEntry::new(message, score));
            Self::spam_records(&reported)?
        };

        debug!("Recorded spam message with score {}", score);
        self.persist(Collection::ReportedSpam, records).await?;
        Ok(score)
    }

    /// Remember a message as good. Returns `false` if it was already known.
    ///
    /// Keyword scores are left untouched.
    pub async fn record_good_message(&self, message: &str) -> Result<bool> {
        let _write = self.good_write.lock().await;

        let records = {
            let mut good = self.known_good.write().await;
            if !good.insert(message.to_string()) {
                return Ok(false);
            }
            Self::good_records(&good)
        };

        debug!("Recorded good message");
        self.persist(Collection::KnownGood, records).await?;
        Ok(true)
    }

    /// Forget a reported spam message. Returns whether it existed.
    pub async fn remove_spam_message(&self, message: &str) -> Result<bool> {
        let _write = self.spam_write.lock().await;

        let records = {
            let mut reported = self.reported_spam.write().await;
            if reported.remove(message).is_none() {
                return Ok(false);
            }
            Self::spam_records(&reported)?
        };

        self.persist(Collection::ReportedSpam, records).await?;
        Ok(true)
    }

    /// Forget a known good message. Returns whether it existed.
    pub async fn remove_good_message(&self, message: &str) -> Result<bool> {
        let _write = self.good_write.lock().await;

        let records = {
            let mut good = self.known_good.write().await;
            if !good.remove(message) {
                return Ok(false);
            }
            Self::good_records(&good)
        };

        self.persist(Collection::KnownGood, records).await?;
        Ok(true)
    }

    /// Highest fraction of a reported spam message's distinct words that
    /// also appear in `message`. 0.0 when nothing has been reported.
    ///
    /// The ratio is taken over the stored message's vocabulary, so a long
    /// candidate fully containing a short spam text scores 1.0.
    pub async fn best_match_percent(&self, message: &str) -> f64 {
        let candidate = vocabulary(message);
        let reported = self.reported_spam.read().await;

        reported
            .values()
            .filter(|entry| !entry.vocabulary.is_empty())
            .map(|entry| {
                let matched = entry
                    .vocabulary
                    .iter()
                    .filter(|token| candidate.contains(*token))
                    .count();
                matched as f64 / entry.vocabulary.len() as f64
            })
            .fold(0.0, f64::max)
    }

    /// Cached score of a reported spam message
    pub async fn reported_spam_score(&self, message: &str) -> Option<u32> {
        self.reported_spam.read().await.get(message).map(|e| e.score)
    }

    pub async fn is_known_good(&self, message: &str) -> bool {
        self.known_good.read().await.contains(message)
    }

    /// Snapshot of the keyword table, sorted by word
    pub async fn keywords(&self) -> Vec<KeywordScore> {
        let keywords = self.keywords.read().await;
        let mut list: Vec<KeywordScore> = keywords.values().cloned().collect();
        list.sort_by(|a, b| a.word.cmp(&b.word));
        list
    }

    pub async fn stats(&self) -> StoreStats {
        StoreStats {
            keywords: self.keywords.read().await.len(),
            reported_spam: self.reported_spam.read().await.len(),
            known_good: self.known_good.read().await.len(),
        }
    }

    async fn persist(&self, collection: Collection, records: Vec<serde_json::Value>) -> Result<()> {
        self.store.save(collection, records).await.map_err(|e| {
            error!("Failed to persist {} collection: {}", collection, e);
            FilterError::PersistenceWrite {
                collection,
                source: Box::new(e),
            }
        })
    }

    fn keyword_records(keywords: &HashMap<String, KeywordScore>) -> Result<Vec<serde_json::Value>> {
        let mut list: Vec<&KeywordScore> = keywords.values().collect();
        list.sort_by(|a, b| a.word.cmp(&b.word));
        list.into_iter()
            .map(|k| serde_json::to_value(k).map_err(FilterError::from))
            .collect()
    }

    fn spam_records(reported: &HashMap<String, SpamEntry>) -> Result<Vec<serde_json::Value>> {
        let mut list: Vec<ReportedSpamMessage> = reported
            .iter()
            .map(|(message, entry)| ReportedSpamMessage {
                message: message.clone(),
                score: entry.score,
            })
            .collect();
        list.sort_by(|a, b| a.message.cmp(&b.message));
        list.iter()
            .map(|r| serde_json::to_value(r).map_err(FilterError::from))
            .collect()
    }

    fn good_records(good: &HashSet<String>) -> Vec<serde_json::Value> {
        let mut list: Vec<&String> = good.iter().collect();
        list.sort();
        list.into_iter()
            .map(|m| serde_json::Value::String(m.clone()))
            .collect()
    }
}
