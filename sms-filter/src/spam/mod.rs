//! Spam classification module
//!
//! Provides keyword scoring, fuzzy matching against reported spam and the
//! three-way GOOD / SPAM / AMBIGUOUS decision.

pub mod classifier;
pub mod keywords;
pub mod text;
pub mod types;

pub use classifier::Classifier;
pub use keywords::KeywordStore;
pub use types::*;
