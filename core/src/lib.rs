//! In-memory full-text search: tokenizer, document store, positional postings,
//! TF-IDF scoring with a term-proximity adjustment, and a ranking query engine.

pub mod engine;
pub mod error;
pub mod postings;
pub mod scorer;
pub mod store;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    /// Lowercased text as it was indexed.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub text: String,
}

pub use engine::{SearchEngine, SharedEngine};
pub use error::SearchError;
pub use postings::{PostingsIndex, TermOccurrence};
pub use scorer::{Scorer, ScoringConfig};
pub use store::DocumentStore;
