//! Similarity engine: per-topic TF-IDF vectorisation and cosine scoring of a
//! document against disclosure framework requirements.

mod analyzer;
pub mod similarity;
pub mod stop_words;
pub mod tfidf;

pub use analyzer::{Analyzer, ProgressFn, analyze, analyze_parallel, score_topic};
pub use tfidf::{TfidfError, TfidfVectorizer};
