//! Lexicon-based sentiment: layered dictionaries with negation handling,
//! per-message scores, per-person aggregates and monthly trends.

mod lexicon;
mod score;

pub use lexicon::{Lexicon, LexiconCache, LexiconLayer};
pub use score::{
    aggregate_sentiment, score_message, score_messages, MessageSentiment, MonthlySentiment,
    PersonSentiment, SentimentReport,
};
