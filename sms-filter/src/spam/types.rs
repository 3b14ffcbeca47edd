//! Spam types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

/// A keyword and its spam weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordScore {
    /// Keyword as stored (matched after normalization)
    pub word: String,
    /// Spam weight, higher is a stronger signal
    pub score: u32,
}

/// A message the user reported as spam
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedSpamMessage {
    /// Raw message text
    pub message: String,
    /// Keyword score of the message at the time it was reported
    pub score: u32,
}

/// Classification outcome for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Good,
    Spam,
    /// Needs a human decision
    Ambiguous,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Good => write!(f, "GOOD"),
            Verdict::Spam => write!(f, "SPAM"),
            Verdict::Ambiguous => write!(f, "AMBIGUOUS"),
        }
    }
}

/// Full classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamCheck {
    pub verdict: Verdict,
    /// Sum of keyword scores over the message tokens
    pub score: u32,
    /// Best containment ratio against reported spam.
    /// `None` when the keyword score alone was decisive.
    pub match_percent: Option<f64>,
}

/// A user's answer to an ambiguous-message prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpamChoice {
    Spam,
    Good,
}

impl SpamChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpamChoice::Spam => "SPAM",
            SpamChoice::Good => "GOOD",
        }
    }
}

impl FromStr for SpamChoice {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPAM" => Ok(SpamChoice::Spam),
            "GOOD" => Ok(SpamChoice::Good),
            other => Err(FilterError::InvalidChoice(format!(
                "expected 'SPAM' or 'GOOD', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SpamChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records skipped while loading persisted collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub keywords_skipped: usize,
    pub spam_skipped: usize,
    pub good_skipped: usize,
}

impl LoadReport {
    pub fn total_skipped(&self) -> usize {
        self.keywords_skipped + self.spam_skipped + self.good_skipped
    }
}

/// Collection sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of keywords in the score table
    pub keywords: usize,
    /// Number of reported spam messages
    pub reported_spam: usize,
    /// Number of known good messages
    pub known_good: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Good.to_string(), "GOOD");
        assert_eq!(Verdict::Spam.to_string(), "SPAM");
        assert_eq!(Verdict::Ambiguous.to_string(), "AMBIGUOUS");
    }

    #[test]
    fn test_verdict_serializes_uppercase() {
        let json = serde_json::to_string(&Verdict::Ambiguous).unwrap();
        assert_eq!(json, "\"AMBIGUOUS\"");
    }

    #[test]
    fn test_spam_choice_parse() {
        assert_eq!("SPAM".parse::<SpamChoice>().unwrap(), SpamChoice::Spam);
        assert_eq!("GOOD".parse::<SpamChoice>().unwrap(), SpamChoice::Good);
        assert!(matches!(
            "spam".parse::<SpamChoice>(),
            Err(FilterError::InvalidChoice(_))
        ));
        assert!("MAYBE".parse::<SpamChoice>().is_err());
    }

    #[test]
    fn test_load_report_total() {
        let report = LoadReport {
            keywords_skipped: 1,
            spam_skipped: 2,
            good_skipped: 0,
        };
        assert_eq!(report.total_skipped(), 3);
    }
}
