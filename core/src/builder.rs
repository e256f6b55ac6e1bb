use crate::error::{Error, Result};
use crate::index::{InvertedIndex, Posting};
use crate::record::parse_record;
use crate::store::{Document, DocumentStore};
use crate::tokenizer::Tokenizer;
use crate::DocId;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

pub const TITLE_WEIGHT: u64 = 20;
pub const BODY_WEIGHT: u64 = 1;

const PROGRESS_EVERY: usize = 50;

/// Occurrence counts of one term within one document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct TermTally {
    title: u64,
    body: u64,
}

impl TermTally {
    fn weight(self) -> u64 {
        self.title * TITLE_WEIGHT + self.body * BODY_WEIGHT
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub indexed: usize,
    pub skipped: usize,
}

/// A fully built, read-only index. Shared across query threads without locking.
#[derive(Debug)]
pub struct SearchIndex {
    store: DocumentStore,
    inverted: InvertedIndex,
}

impl SearchIndex {
    pub fn document(&self, doc_id: DocId) -> Result<&Document> { self.store.get(doc_id) }

    pub fn postings(&self, term: &str) -> &[Posting] { self.inverted.postings(term) }

    pub fn documents(&self) -> &DocumentStore { &self.store }

    pub fn inverted(&self) -> &InvertedIndex { &self.inverted }
}

/// Single-writer build phase. Consumed by [`IndexBuilder::finish`], so nothing
/// can query a half-built index.
pub struct IndexBuilder {
    tokenizer: Arc<dyn Tokenizer>,
    store: DocumentStore,
    inverted: InvertedIndex,
}

impl IndexBuilder {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer, store: DocumentStore::new(), inverted: InvertedIndex::new() }
    }

    /// Stores the document and appends one posting per distinct term.
    pub fn add_document(&mut self, doc: Document) -> DocId {
        let tallies = self.tally_terms(&doc);
        let doc_id = self.store.append(doc);
        for (term, tally) in tallies {
            self.inverted.append_posting(Posting { doc_id, term, weight: tally.weight() });
        }
        doc_id
    }

    fn tally_terms(&self, doc: &Document) -> HashMap<String, TermTally> {
        let mut tallies: HashMap<String, TermTally> = HashMap::new();
        for term in self.tokenizer.cut(&doc.title) {
            if term.is_empty() { continue; }
            tallies.entry(term.to_lowercase()).or_default().title += 1;
        }
        for term in self.tokenizer.cut(&doc.body) {
            if term.is_empty() { continue; }
            tallies.entry(term.to_lowercase()).or_default().body += 1;
        }
        tallies
    }

    /// Indexes every record in `reader`. Malformed records are logged and
    /// skipped; only a read failure on the source itself is returned as an error.
    pub fn add_reader<R: BufRead>(&mut self, mut reader: R, path: &Path) -> Result<BuildStats> {
        let mut stats = BuildStats::default();
        let mut buf = Vec::new();
        let mut line_no = 0usize;
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| Error::SourceUnreadable { path: path.to_path_buf(), source })?;
            if n == 0 { break; }
            line_no += 1;
            if buf.last() == Some(&b'\n') { buf.pop(); }
            if buf.is_empty() || buf == b"\r" { continue; }

            let record = std::str::from_utf8(&buf)
                .map_err(|e| Error::MalformedRecord { line: line_no, reason: e.to_string() })
                .and_then(|line| parse_record(line, line_no));
            match record {
                Ok(doc) => {
                    self.add_document(doc);
                    stats.indexed += 1;
                    if stats.indexed % PROGRESS_EVERY == 0 {
                        tracing::debug!(indexed = stats.indexed, "indexing progress");
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping record");
                    stats.skipped += 1;
                }
            }
        }
        Ok(stats)
    }

    pub fn finish(self) -> SearchIndex {
        SearchIndex { store: self.store, inverted: self.inverted }
    }
}

/// Builds an index from a raw corpus file in one pass.
pub fn build_from_path(path: &Path, tokenizer: Arc<dyn Tokenizer>) -> Result<(SearchIndex, BuildStats)> {
    let file = File::open(path).map_err(|source| Error::SourceUnreadable { path: path.to_path_buf(), source })?;
    let mut builder = IndexBuilder::new(tokenizer);
    let stats = builder.add_reader(BufReader::new(file), path)?;
    let index = builder.finish();
    tracing::info!(
        path = %path.display(),
        num_docs = stats.indexed,
        skipped = stats.skipped,
        num_terms = index.inverted().term_count(),
        "index build complete"
    );
    Ok((index, stats))
}
