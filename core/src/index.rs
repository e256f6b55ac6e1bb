use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term: String,
    pub weight: u64,
}

/// Term -> postings in build order. Keys are always lowercase.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    lists: HashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// An absent term and a term with no postings look the same: an empty slice.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.lists.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn append_posting(&mut self, posting: Posting) {
        match self.lists.get_mut(posting.term.as_str()) {
            Some(list) => list.push(posting),
            None => {
                self.lists.insert(posting.term.clone(), vec![posting]);
            }
        }
    }

    pub fn term_count(&self) -> usize { self.lists.len() }

    pub fn posting_count(&self) -> usize { self.lists.values().map(Vec::len).sum() }
}
