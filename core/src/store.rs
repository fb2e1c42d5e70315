use crate::error::{Result, SearchError};
use crate::tokenizer::normalize;
use crate::{DocId, Document};
use std::collections::HashMap;

/// Append-only corpus. Ids are dense, start at 0 and are never reused; two
/// documents never share the same normalized text.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
    by_text: HashMap<String, DocId>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Returns the id for `text`, and whether a new document was created for it.
    pub fn get_or_create(&mut self, text: &str) -> (DocId, bool) {
        let normalized = normalize(text);
        if let Some(&id) = self.by_text.get(&normalized) {
            return (id, false);
        }
        let id = self.docs.len() as DocId;
        self.by_text.insert(normalized.clone(), id);
        self.docs.push(Document { id, text: normalized });
        (id, true)
    }

    pub fn get(&self, id: DocId) -> Result<&Document> {
        self.docs.get(id as usize).ok_or(SearchError::DocumentNotFound(id))
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }
}
