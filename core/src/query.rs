use crate::builder::SearchIndex;
use crate::error::{Error, Result};
use crate::tokenizer::{find_folded, Tokenizer};
use crate::DocId;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Characters kept before the match start.
pub const SNIPPET_BEFORE: usize = 50;
/// Characters kept from the match start onwards.
pub const SNIPPET_AFTER: usize = 100;
pub const SNIPPET_KEYWORD_NOT_FOUND: &str = "keyword not found";
pub const SNIPPET_NO_CONTENT: &str = "no content";
const ELLIPSIS: &str = "...";

/// Per-document accumulation for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedResult {
    pub doc_id: DocId,
    pub total_weight: u64,
    /// Query terms that hit this document, in first-seen order.
    pub matched_terms: Vec<String>,
}

/// One ranked hit. Serializes to the documented wire shape
/// `{ url, title, desc, docId, weight }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedResult {
    pub url: String,
    pub title: String,
    #[serde(rename = "desc")]
    pub snippet: String,
    #[serde(rename = "docId")]
    pub doc_id: DocId,
    #[serde(rename = "weight")]
    pub total_weight: u64,
    #[serde(skip)]
    pub matched_terms: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Remove stop words from the query before lookup.
    pub drop_stop_words: bool,
}

/// Answers queries against a finished [`SearchIndex`].
///
/// Holding a `SearchIndex` means the build pass has completed, so every query
/// runs against a ready, immutable index. Clones share the same index.
#[derive(Clone)]
pub struct QueryEngine {
    index: Arc<SearchIndex>,
    tokenizer: Arc<dyn Tokenizer>,
    options: QueryOptions,
}

impl QueryEngine {
    pub fn new(index: Arc<SearchIndex>, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { index, tokenizer, options: QueryOptions::default() }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn index(&self) -> &SearchIndex { &self.index }

    /// Distinct lowercase query terms in first-seen order.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        let raw = if self.options.drop_stop_words {
            self.tokenizer.cut_without_stop_words(query)
        } else {
            self.tokenizer.cut(query)
        };
        let mut seen = HashSet::new();
        raw.into_iter()
            .map(|term| term.to_lowercase())
            .filter(|term| !term.is_empty() && seen.insert(term.clone()))
            .collect()
    }

    /// Sums posting weights per document and ranks by total weight descending,
    /// ties broken by ascending doc id.
    pub fn merge(&self, terms: &[String]) -> Vec<MergedResult> {
        let mut merged: HashMap<DocId, MergedResult> = HashMap::new();
        for term in terms {
            for posting in self.index.postings(term) {
                let entry = merged.entry(posting.doc_id).or_insert_with(|| MergedResult {
                    doc_id: posting.doc_id,
                    total_weight: 0,
                    matched_terms: Vec::new(),
                });
                entry.total_weight += posting.weight;
                if !entry.matched_terms.iter().any(|t| t == term) {
                    entry.matched_terms.push(term.clone());
                }
            }
        }
        let mut ranked: Vec<MergedResult> = merged.into_values().collect();
        ranked.sort_by(|a, b| b.total_weight.cmp(&a.total_weight).then(a.doc_id.cmp(&b.doc_id)));
        ranked
    }

    pub fn search(&self, query: &str) -> Result<Vec<RankedResult>> {
        let terms = self.query_terms(query);
        let merged = self.merge(&terms);
        tracing::debug!(query, terms = terms.len(), hits = merged.len(), "search");
        merged.into_iter().map(|m| self.resolve(m)).collect()
    }

    /// Like [`QueryEngine::search`] but only resolves the first `k` hits.
    /// Returns the total number of matching documents alongside.
    pub fn search_top(&self, query: &str, k: usize) -> Result<(usize, Vec<RankedResult>)> {
        let terms = self.query_terms(query);
        let merged = self.merge(&terms);
        let total_hits = merged.len();
        let results = merged
            .into_iter()
            .take(k)
            .map(|m| self.resolve(m))
            .collect::<Result<Vec<_>>>()?;
        Ok((total_hits, results))
    }

    fn resolve(&self, merged: MergedResult) -> Result<RankedResult> {
        let doc = self
            .index
            .document(merged.doc_id)
            .map_err(|_| Error::DocumentNotFound { doc_id: merged.doc_id })?;
        // Only the first matched term anchors the snippet.
        let snippet = match merged.matched_terms.first() {
            Some(term) => snippet_at(&doc.body, self.tokenizer.locate(&doc.body, term)),
            None => SNIPPET_KEYWORD_NOT_FOUND.to_string(),
        };
        Ok(RankedResult {
            url: doc.url.clone(),
            title: doc.title.clone(),
            snippet,
            doc_id: merged.doc_id,
            total_weight: merged.total_weight,
            matched_terms: merged.matched_terms,
        })
    }
}

/// Excerpt of `body` around the first case-insensitive occurrence of `term`,
/// compared after NFKC and lowercase folding. Offsets count characters, not bytes.
pub fn snippet(body: &str, term: &str) -> String {
    snippet_at(body, find_folded(body, term))
}

/// Excerpt of `body` around the char index `pos`, if any.
pub fn snippet_at(body: &str, pos: Option<usize>) -> String {
    let Some(pos) = pos else {
        return SNIPPET_KEYWORD_NOT_FOUND.to_string();
    };
    let chars: Vec<char> = body.chars().collect();
    let start = pos.saturating_sub(SNIPPET_BEFORE);
    let end = (pos + SNIPPET_AFTER).min(chars.len());
    cut_window(&chars, start, end)
}

fn cut_window(chars: &[char], start: usize, end: usize) -> String {
    // Unreachable from snippet_at for a real match (pos < len keeps end > start);
    // kept so a bad position yields the sentinel instead of a panic.
    if end <= start || start >= chars.len() {
        return SNIPPET_NO_CONTENT.to_string();
    }

    let mut out = String::with_capacity(end - start + 2 * ELLIPSIS.len());
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Pretty JSON array of results, in ranking order.
pub fn to_json(results: &[RankedResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}
