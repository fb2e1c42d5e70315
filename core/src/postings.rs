use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Occurrences of one term in one document. `frequency == positions.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermOccurrence {
    pub frequency: u32,
    /// Token offsets in the order they were recorded (ascending during indexing).
    pub positions: Vec<u32>,
}

impl TermOccurrence {
    pub fn new(position: u32) -> Self {
        Self { frequency: 1, positions: vec![position] }
    }

    pub fn add_position(&mut self, position: u32) {
        self.positions.push(position);
        self.frequency += 1;
    }
}

#[derive(Debug, Default)]
pub struct PostingsIndex {
    terms: HashMap<String, HashMap<DocId, TermOccurrence>>,
}

impl PostingsIndex {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, term: &str, doc_id: DocId, position: u32) {
        match self.terms.get_mut(term) {
            Some(docs) => {
                docs.entry(doc_id)
                    .and_modify(|occ| occ.add_position(position))
                    .or_insert_with(|| TermOccurrence::new(position));
            }
            None => {
                let docs = HashMap::from([(doc_id, TermOccurrence::new(position))]);
                self.terms.insert(term.to_string(), docs);
            }
        }
    }

    /// `None` means the term was never indexed; callers treat that as zero matches.
    pub fn lookup(&self, term: &str) -> Option<&HashMap<DocId, TermOccurrence>> {
        self.terms.get(term)
    }

    pub fn occurrence(&self, term: &str, doc_id: DocId) -> Option<&TermOccurrence> {
        self.lookup(term).and_then(|docs| docs.get(&doc_id))
    }

    pub fn frequency(&self, term: &str, doc_id: DocId) -> u32 {
        self.occurrence(term, doc_id).map_or(0, |occ| occ.frequency)
    }

    pub fn positions(&self, term: &str, doc_id: DocId) -> &[u32] {
        self.occurrence(term, doc_id).map_or(&[], |occ| occ.positions.as_slice())
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.lookup(term).map_or(0, HashMap::len)
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_creates_and_appends() {
        let mut idx = PostingsIndex::new();
        idx.record("rust", 0, 2);
        idx.record("rust", 1, 0);
        idx.record("rust", 0, 7);

        let occ = idx.occurrence("rust", 0).unwrap();
        assert_eq!(occ.frequency, 2);
        assert_eq!(occ.positions, vec![2, 7]);
        assert_eq!(idx.frequency("rust", 1), 1);
        assert_eq!(idx.document_frequency("rust"), 2);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn missing_term_is_zero_everywhere() {
        let idx = PostingsIndex::new();
        assert!(idx.lookup("ghost").is_none());
        assert_eq!(idx.document_frequency("ghost"), 0);
        assert_eq!(idx.frequency("ghost", 0), 0);
        assert!(idx.positions("ghost", 0).is_empty());
    }
}
