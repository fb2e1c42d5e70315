use crate::error::Result;
use crate::postings::{PostingsIndex, TermOccurrence};
use crate::scorer::{Scorer, ScoringConfig};
use crate::store::DocumentStore;
use crate::tokenizer::{terms, tokenize};
use crate::{DocId, Document, SearchHit};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Default)]
pub struct SearchEngine {
    store: DocumentStore,
    postings: PostingsIndex,
    config: ScoringConfig,
}

impl SearchEngine {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> ScoringConfig { self.config }

    /// Store and index `text`. Re-indexing text already present returns the existing
    /// id and leaves the postings untouched.
    pub fn index(&mut self, text: &str) -> DocId {
        let (doc_id, created) = self.store.get_or_create(text);
        if !created {
            debug!(doc_id, "duplicate document skipped");
            return doc_id;
        }
        let tokens = tokenize(text);
        for (term, pos) in &tokens {
            self.postings.record(term, doc_id, *pos);
        }
        debug!(doc_id, num_terms = tokens.len(), "document indexed");
        doc_id
    }

    /// Ranked hits for `query`, most relevant first. Equal scores are ordered by
    /// ascending document id.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query_terms = terms(query);
        if query_terms.is_empty() {
            debug!(query, "query has no searchable terms");
            return Vec::new();
        }

        let candidates: BTreeSet<DocId> = query_terms
            .iter()
            .filter_map(|t| self.postings.lookup(t))
            .flat_map(|docs| docs.keys().copied())
            .collect();

        let scorer = Scorer::new(&self.postings, self.store.len(), self.config);
        let mut scored: Vec<(DocId, f64)> = candidates
            .iter()
            .map(|&doc_id| (doc_id, scorer.score(&query_terms, doc_id)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut hits = Vec::with_capacity(scored.len());
        for (doc_id, score) in scored {
            // Store and postings only change together in `index`, so a miss here is a bug.
            let doc = self.store.get(doc_id).unwrap_or_else(|err| {
                error!(%err, "postings reference a document missing from the store");
                panic!("inconsistent index: {err}");
            });
            hits.push(SearchHit { doc_id, score, text: doc.text.clone() });
        }
        debug!(query, candidates = candidates.len(), hits = hits.len(), "search complete");
        hits
    }

    /// Like [`search`](Self::search), keeping only the first `k` hits.
    pub fn search_top(&self, query: &str, k: usize) -> Vec<SearchHit> {
        let mut hits = self.search(query);
        hits.truncate(k);
        hits
    }

    pub fn document(&self, id: DocId) -> Result<&Document> {
        self.store.get(id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.store.iter()
    }

    pub fn postings(&self, term: &str) -> Option<&HashMap<DocId, TermOccurrence>> {
        self.postings.lookup(term)
    }

    pub fn postings_index(&self) -> &PostingsIndex { &self.postings }

    pub fn document_count(&self) -> usize { self.store.len() }

    pub fn term_count(&self) -> usize { self.postings.len() }
}

/// Cloneable handle for sharing one engine across threads. Searches run
/// concurrently under a read lock; indexing holds the write lock until the
/// document and all of its postings are recorded.
#[derive(Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<SearchEngine>>,
}

impl SharedEngine {
    pub fn new(engine: SearchEngine) -> Self {
        Self { inner: Arc::new(RwLock::new(engine)) }
    }

    pub fn index(&self, text: &str) -> DocId {
        self.inner.write().index(text)
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.inner.read().search(query)
    }

    pub fn search_top(&self, query: &str, k: usize) -> Vec<SearchHit> {
        self.inner.read().search_top(query, k)
    }

    pub fn document_count(&self) -> usize {
        self.inner.read().document_count()
    }

    /// Run `f` against the engine under a read lock.
    pub fn read<R>(&self, f: impl FnOnce(&SearchEngine) -> R) -> R {
        let engine = self.inner.read();
        f(&*engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_index_returns_same_id() {
        let mut engine = SearchEngine::new();
        let a = engine.index("Rust is fast");
        let b = engine.index("rust IS fast");
        assert_eq!(a, b);
        assert_eq!(engine.document_count(), 1);
        assert_eq!(engine.postings("rust").unwrap()[&a].frequency, 1);
    }

    #[test]
    fn ties_break_on_ascending_id() {
        let mut engine = SearchEngine::new();
        engine.index("zebra one");
        engine.index("zebra two");
        engine.index("zebra three");
        let ids: Vec<DocId> = engine.search("zebra").into_iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn search_top_truncates() {
        let mut engine = SearchEngine::new();
        engine.index("apple pie");
        engine.index("apple apple tart");
        engine.index("apple crumble");
        let hits = engine.search_top("apple", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, 1);
    }

    #[test]
    #[should_panic(expected = "inconsistent index")]
    fn search_panics_when_postings_outrun_the_store() {
        let mut engine = SearchEngine::new();
        engine.index("orphan check");
        engine.postings.record("orphan", 7, 0);
        engine.search("orphan");
    }

    #[test]
    fn shared_engine_sees_writes_from_clones() {
        let shared = SharedEngine::default();
        let writer = shared.clone();
        let handle = std::thread::spawn(move || writer.index("threads share state"));
        let id = handle.join().unwrap();
        assert_eq!(shared.document_count(), 1);
        assert_eq!(shared.search("threads")[0].doc_id, id);
        assert_eq!(shared.read(|e| e.term_count()), 3);
    }
}
