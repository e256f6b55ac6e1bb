use search_core::tokenizer::{Tokenizer, TokenizerConfig, WordTokenizer};

#[test]
fn it_normalizes_and_lowercases() {
    let words = WordTokenizer::new().cut("Running RUNNERS! The ｃａｆé's menu.");
    assert!(words.contains(&"running".to_string()));
    assert!(words.contains(&"runners".to_string()));
    // NFKC folds full-width letters.
    assert!(words.contains(&"café's".to_string()));
    assert!(words.iter().all(|w| *w == w.to_lowercase()));
}

#[test]
fn it_keeps_stopwords_unless_filtered() {
    let tokenizer = WordTokenizer::new();
    let all = tokenizer.cut("The quick brown fox and the lazy dog");
    assert!(all.contains(&"the".to_string()));
    let filtered = tokenizer.cut_without_stop_words("The quick brown fox and the lazy dog");
    assert!(!filtered.contains(&"the".to_string()));
    assert!(!filtered.contains(&"and".to_string()));
    assert_eq!(filtered, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_stems_when_configured() {
    let tokenizer = WordTokenizer::from_config(&TokenizerConfig { stem: true, stop_words_file: None }).unwrap();
    assert!(tokenizer.cut("Running Runners RUN!").iter().all(|w| w.starts_with("run")));
}

#[test]
fn same_word_same_term_regardless_of_case() {
    let tokenizer = WordTokenizer::new();
    assert_eq!(tokenizer.cut("HTTP"), tokenizer.cut("http"));
    assert_eq!(tokenizer.cut("Boost_1_82_0"), vec!["boost_1_82_0"]);
}
