//! Shared text primitives: tokenization, emoji segmentation and language
//! detection. Every stage that looks at message text goes through this
//! module so the whole pipeline agrees on what a "word" and an "emoji" are.

mod emoji;
mod lang;
mod tokens;

pub use emoji::extract_emoji;
pub use lang::{detect_conversation_language, DetectedLanguage};
pub use tokens::{bigrams, is_stop_word, tokenize};
