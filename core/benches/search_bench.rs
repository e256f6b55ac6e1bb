use criterion::{criterion_group, criterion_main, Criterion};
use search_core::{Document, IndexBuilder, QueryEngine, Tokenizer, WordTokenizer};
use std::sync::Arc;

const WORDS: &[&str] = &[
    "asio", "beast", "spirit", "filesystem", "thread", "socket", "parser", "http", "json", "regex",
    "allocator", "iterator", "container", "graph", "signal", "coroutine", "future", "timer",
];

fn corpus(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| {
            let title = format!("{} {}", WORDS[i % WORDS.len()], WORDS[(i * 7) % WORDS.len()]);
            let body = (0..200).map(|j| WORDS[(i + j * 3) % WORDS.len()]).collect::<Vec<_>>().join(" ");
            Document { title, body, url: format!("https://example.com/{i}.html") }
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let docs = corpus(500);
    c.bench_function("build_500_docs", |b| {
        b.iter(|| {
            let mut builder = IndexBuilder::new(Arc::new(WordTokenizer::new()));
            for d in docs.iter().cloned() {
                builder.add_document(d);
            }
            builder.finish()
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let tokenizer: Arc<dyn Tokenizer> = Arc::new(WordTokenizer::new());
    let mut builder = IndexBuilder::new(tokenizer.clone());
    for d in corpus(2000) {
        builder.add_document(d);
    }
    let engine = QueryEngine::new(Arc::new(builder.finish()), tokenizer);
    c.bench_function("search_two_terms", |b| b.iter(|| engine.search("asio coroutine").unwrap()));
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
