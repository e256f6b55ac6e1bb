use crate::error::{Error, Result};
use crate::DocId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    /// Markup-free text, line breaks already folded to spaces.
    pub body: String,
    pub url: String,
}

/// Forward index. The position of a document is its id.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn append(&mut self, doc: Document) -> DocId {
        let doc_id = self.docs.len();
        self.docs.push(doc);
        doc_id
    }

    pub fn get(&self, doc_id: DocId) -> Result<&Document> {
        self.docs.get(doc_id).ok_or(Error::OutOfRange { doc_id, len: self.docs.len() })
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.docs.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str) -> Document {
        Document { title: title.into(), body: String::new(), url: format!("https://example.com/{title}") }
    }

    #[test]
    fn ids_follow_arrival_order() {
        let mut store = DocumentStore::new();
        assert_eq!(store.append(doc("a")), 0);
        assert_eq!(store.append(doc("b")), 1);
        assert_eq!(store.get(1).unwrap().title, "b");
        let titles: Vec<_> = store.iter().map(|(id, d)| (id, d.title.as_str())).collect();
        assert_eq!(titles, vec![(0, "a"), (1, "b")]);
    }

    #[test]
    fn get_past_the_end_is_out_of_range() {
        let mut store = DocumentStore::new();
        assert!(matches!(store.get(0), Err(Error::OutOfRange { doc_id: 0, len: 0 })));
        for t in ["a", "b", "c"] {
            store.append(doc(t));
        }
        for id in [3, 4, 1000] {
            assert!(matches!(store.get(id), Err(Error::OutOfRange { len: 3, .. })));
        }
    }
}
