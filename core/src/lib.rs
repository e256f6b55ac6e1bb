//! In-memory document search: forward store, inverted index, index builder and
//! query engine, shared by the HTTP server and the interactive debug tool.

pub mod builder;
pub mod error;
pub mod index;
pub mod query;
pub mod record;
pub mod store;
pub mod tokenizer;

pub type DocId = usize;

pub use builder::{build_from_path, BuildStats, IndexBuilder, SearchIndex, BODY_WEIGHT, TITLE_WEIGHT};
pub use error::{Error, Result};
pub use index::{InvertedIndex, Posting};
pub use query::{MergedResult, QueryEngine, QueryOptions, RankedResult};
pub use store::{Document, DocumentStore};
pub use tokenizer::{Tokenizer, TokenizerConfig, WordTokenizer};
