//! Text analysis for crawl analytics
//!
//! Tokens are maximal runs of ASCII alphanumeric characters, lowercased.
//! Stopwords are filtered by the analytics layer, not the tokenizer.

mod stopwords;
mod tokenizer;

pub use stopwords::{is_stopword, STOP_WORDS};
pub use tokenizer::{join_tokens, tokenize};
