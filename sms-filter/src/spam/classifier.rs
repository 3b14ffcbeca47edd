//! Spam classifier
//!
//! Combines the keyword score and the match percent against reported spam
//! into a verdict:
//!
//! | keyword score             | match percent          | verdict   |
//! |---------------------------|------------------------|-----------|
//! | `>= higher_score`         | not computed           | SPAM      |
//! | any                       | `> match_high`         | SPAM      |
//! | in `[lower, higher]`      | any                    | AMBIGUOUS |
//! | any                       | in `[low, high]`       | AMBIGUOUS |
//! | otherwise                 |                        | GOOD      |

use std::sync::Arc;
use tracing::debug;

use super::keywords::KeywordStore;
use super::types::{SpamCheck, SpamChoice, Verdict};
use crate::config::ThresholdConfig;
use crate::error::Result;

pub struct Classifier {
    store: Arc<KeywordStore>,
    thresholds: ThresholdConfig,
}

impl Classifier {
    pub fn new(store: Arc<KeywordStore>, thresholds: ThresholdConfig) -> Self {
        Self { store, thresholds }
    }

    /// Classifier with the default thresholds (10/12, 0.8/0.9)
    pub fn with_defaults(store: Arc<KeywordStore>) -> Self {
        Self::new(store, ThresholdConfig::default())
    }

    pub fn store(&self) -> &Arc<KeywordStore> {
        &self.store
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Classify a message
    pub async fn classify(&self, message: &str) -> Verdict {
        self.evaluate(message).await.verdict
    }

    /// Classify a message and return the signals behind the verdict
    pub async fn evaluate(&self, message: &str) -> SpamCheck {
        let t = &self.thresholds;
        let score = self.store.message_score(message).await;

        if score >= t.higher_score {
            debug!("Message score {} is decisive: {}", score, Verdict::Spam);
            return SpamCheck {
                verdict: Verdict::Spam,
                score,
                match_percent: None,
            };
        }

        let match_percent = self.store.best_match_percent(message).await;

        let verdict = if match_percent > t.match_high {
            Verdict::Spam
        } else if (t.lower_score..=t.higher_score).contains(&score)
            || (t.match_low..=t.match_high).contains(&match_percent)
        {
            Verdict::Ambiguous
        } else {
            Verdict::Good
        };

        debug!(
            "Message score {}, match {:.2}: {}",
            score, match_percent, verdict
        );

        SpamCheck {
            verdict,
            score,
            match_percent: Some(match_percent),
        }
    }

    /// The user confirmed a message is spam
    pub async fn on_user_confirmed_spam(&self, message: &str) -> Result<()> {
        self.store.record_spam_message(message).await?;
        Ok(())
    }

    /// The user confirmed a message is good
    pub async fn on_user_confirmed_good(&self, message: &str) -> Result<()> {
        self.store.record_good_message(message).await?;
        Ok(())
    }

    /// Route a prompt answer to the matching feedback call
    pub async fn apply_choice(&self, message: &str, choice: SpamChoice) -> Result<()> {
        match choice {
            SpamChoice::Spam => self.on_user_confirmed_spam(message).await,
            SpamChoice::Good => self.on_user_confirmed_good(message).await,
        }
    }
}
