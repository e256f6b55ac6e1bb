use search_core::query::{SNIPPET_KEYWORD_NOT_FOUND, SNIPPET_NO_CONTENT};
use search_core::record::format_record;
use search_core::{build_from_path, Document, Error, IndexBuilder, QueryEngine, Tokenizer, WordTokenizer};
use std::fs;
use std::sync::Arc;

fn doc(title: &str, body: &str, url: &str) -> Document {
    Document { title: title.into(), body: body.into(), url: url.into() }
}

fn engine(docs: Vec<Document>) -> QueryEngine {
    let tokenizer: Arc<dyn Tokenizer> = Arc::new(WordTokenizer::new());
    let mut builder = IndexBuilder::new(tokenizer.clone());
    for d in docs {
        builder.add_document(d);
    }
    QueryEngine::new(Arc::new(builder.finish()), tokenizer)
}

fn corpus() -> Vec<Document> {
    vec![
        doc("Boost.Asio overview", "Asio is a cross-platform library for network and low-level I/O programming.", "u0"),
        doc("HTTP with Beast", "Beast builds HTTP and WebSocket on top of asio.", "u1"),
        doc("Filesystem", "Portable paths, files and directories. Nothing about networking.", "u2"),
        doc("Spirit parser", "Spirit is a parser framework. It can parse HTTP headers too.", "u3"),
    ]
}

#[test]
fn round_trip_single_document() {
    let e = engine(vec![doc("Hello World", "jieba test jieba", "https://example.com/hello")]);
    let hits = e.search("jieba").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, 0);
    assert!(hits[0].matched_terms.contains(&"jieba".to_string()));
    assert_ne!(hits[0].snippet, SNIPPET_KEYWORD_NOT_FOUND);
    assert_ne!(hits[0].snippet, SNIPPET_NO_CONTENT);
    assert!(hits[0].snippet.contains("jieba"));
}

#[test]
fn repeated_queries_are_identical() {
    let e = engine(corpus());
    let first = e.search("http asio parser").unwrap();
    for _ in 0..10 {
        assert_eq!(e.search("http asio parser").unwrap(), first);
    }
}

#[test]
fn queries_are_case_insensitive() {
    let e = engine(corpus());
    let upper = e.search("HTTP").unwrap();
    assert!(!upper.is_empty());
    assert_eq!(upper, e.search("http").unwrap());
}

#[test]
fn title_hit_outranks_body_hit() {
    let e = engine(vec![
        doc("plain title", "mentions coroutine once", "body"),
        doc("coroutine", "mentions nothing else", "title"),
    ]);
    let hits = e.search("coroutine").unwrap();
    assert_eq!(hits[0].url, "title");
    assert!(hits[0].total_weight > hits[1].total_weight);
}

#[test]
fn weights_add_up_across_terms() {
    let e = engine(corpus());
    let weight_of = |q: &str, url: &str| {
        e.search(q).unwrap().into_iter().find(|r| r.url == url).map(|r| r.total_weight)
    };
    let both = weight_of("beast asio", "u1").unwrap();
    assert_eq!(both, weight_of("beast", "u1").unwrap() + weight_of("asio", "u1").unwrap());

    let hits = e.search("beast asio").unwrap();
    // u1 matches both terms, u0 only asio (title and body).
    let urls: Vec<_> = hits.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["u1", "u0"]);
    assert_eq!(hits[0].matched_terms, vec!["beast", "asio"]);
    assert_eq!(hits[1].matched_terms, vec!["asio"]);
    assert!(hits[0].total_weight >= hits[1].total_weight);
}

#[test]
fn empty_and_unknown_queries_return_nothing() {
    let e = engine(corpus());
    assert!(e.search("").unwrap().is_empty());
    assert!(e.search("   ").unwrap().is_empty());
    assert!(e.search("zzzznotpresent").unwrap().is_empty());
}

#[test]
fn out_of_range_doc_id() {
    let e = engine(corpus());
    let store = e.index().documents();
    assert_eq!(store.len(), 4);
    for id in [4, 5, usize::MAX] {
        assert!(matches!(store.get(id), Err(Error::OutOfRange { len: 4, .. })));
    }
}

#[test]
fn build_from_raw_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw");
    let mut raw = String::new();
    for d in corpus() {
        raw.push_str(&format_record(&d));
    }
    raw.push_str("a line without separators\n");
    fs::write(&path, raw).unwrap();

    let tokenizer: Arc<dyn Tokenizer> = Arc::new(WordTokenizer::new());
    let (index, stats) = build_from_path(&path, tokenizer.clone()).unwrap();
    assert_eq!(stats.indexed, 4);
    assert_eq!(stats.skipped, 1);

    let e = QueryEngine::new(Arc::new(index), tokenizer);
    let hits = e.search("spirit").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "u3");
    assert!(hits[0].snippet.starts_with("Spirit is a parser"));
}

#[test]
fn concurrent_readers_share_one_index() {
    let e = engine(corpus());
    let expected = e.search("http").unwrap();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let e = e.clone();
            std::thread::spawn(move || e.search("http").unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
