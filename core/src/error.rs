use crate::DocId;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The corpus could not be opened or read. Fatal at startup.
    #[error("cannot read corpus {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One input record did not parse into (title, body, url).
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("doc id {doc_id} out of range (store holds {len} documents)")]
    OutOfRange { doc_id: DocId, len: usize },

    /// A posting referenced a document the store does not hold.
    #[error("posting references missing document {doc_id}")]
    DocumentNotFound { doc_id: DocId },

    #[error("cannot load stop words from {path}: {source}")]
    StopWords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
