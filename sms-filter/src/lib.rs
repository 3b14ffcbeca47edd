//! sms-filter: spam classification for short text messages
//!
//! A deterministic, rule-based engine that labels each incoming message as
//! GOOD, SPAM or AMBIGUOUS. It combines a persisted keyword score table with
//! fuzzy matching against messages the user previously reported as spam,
//! and learns from the user's answers to ambiguous prompts.
//!
//! # Example
//!
//! ```no_run
//! use sms_filter::spam::{Classifier, KeywordStore, Verdict};
//! use sms_filter::storage::JsonFileStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Arc::new(JsonFileStore::new("data"));
//!     let (keywords, report) = KeywordStore::load(storage).await?;
//!     println!("skipped {} malformed records", report.total_skipped());
//!
//!     let classifier = Classifier::with_defaults(Arc::new(keywords));
//!     if classifier.classify("You are a winner!").await == Verdict::Ambiguous {
//!         // ask the user, then report the answer
//!         classifier.on_user_confirmed_spam("You are a winner!").await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Thresholds, storage location and logging settings
//! - [`error`]: Error types and handling
//! - [`logging`]: Tracing subscriber setup
//! - [`spam`]: Keyword store and classifier
//! - [`storage`]: Collection persistence backends

pub mod config;
pub mod error;
pub mod logging;
pub mod spam;
pub mod storage;

use std::sync::Arc;

// Re-export commonly used types
pub use config::FilterConfig;
pub use error::{FilterError, Result};
pub use spam::{Classifier, KeywordStore, SpamCheck, SpamChoice, Verdict};

/// Open the JSON collections in `config.storage.data_dir` and build a
/// classifier with the configured thresholds.
pub async fn open(config: &FilterConfig) -> Result<(Classifier, spam::LoadReport)> {
    config.validate()?;

    let storage = Arc::new(storage::JsonFileStore::new(config.storage.data_dir.clone()));
    let (keywords, report) = KeywordStore::load(storage).await?;

    Ok((
        Classifier::new(Arc::new(keywords), config.thresholds.clone()),
        report,
    ))
}
