use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // A Han ideograph on its own, or a run of letters/digits from any other script.
    static ref RE: Regex =
        Regex::new(r"(?u)\p{Han}|[\p{L}\p{N}&&\P{Han}][\p{L}\p{N}_'&&\P{Han}]*").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Segments text into lowercase terms.
///
/// Two inputs that contain the same word must yield the same term string, since
/// the builder and the query engine only meet through exact key equality.
pub trait Tokenizer: Send + Sync {
    /// Every term in order of appearance, stop words included.
    fn cut(&self, text: &str) -> Vec<String>;

    fn is_stop_word(&self, term: &str) -> bool;

    fn cut_without_stop_words(&self, text: &str) -> Vec<String> {
        self.cut(text)
            .into_iter()
            .filter(|term| !self.is_stop_word(term))
            .collect()
    }

    /// Char index in `text` of the first occurrence of `term`, compared after
    /// folding both sides the same way terms are folded.
    fn locate(&self, text: &str, term: &str) -> Option<usize> {
        find_folded(text, term)
    }
}

/// Text folded like indexed terms: NFKC, lowercase, final sigma as σ.
/// `origin[i]` is the char index in the source text that produced `chars[i]`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Folded {
    pub chars: Vec<char>,
    pub origin: Vec<usize>,
}

/// Normalizes one base character plus its combining marks at a time, so each
/// folded char maps back to exactly one source position.
pub fn fold_text(text: &str) -> Folded {
    let mut folded = Folded::default();
    let mut cluster = String::new();
    let mut cluster_start = 0;
    for (idx, c) in text.chars().enumerate() {
        if !cluster.is_empty() && !is_combining_mark(c) {
            push_cluster(&mut folded, &cluster, cluster_start);
            cluster.clear();
        }
        if cluster.is_empty() {
            cluster_start = idx;
        }
        cluster.push(c);
    }
    if !cluster.is_empty() {
        push_cluster(&mut folded, &cluster, cluster_start);
    }
    folded
}

fn push_cluster(folded: &mut Folded, cluster: &str, origin: usize) {
    for c in cluster.nfkc().flat_map(char::to_lowercase) {
        folded.chars.push(fold_sigma(c));
        folded.origin.push(origin);
    }
}

// `str::to_lowercase` picks ς or σ from context; a single char can't.
fn fold_sigma(c: char) -> char {
    if c == 'ς' { 'σ' } else { c }
}

/// Substring search over folded text. Returns a char index into `text`.
pub fn find_folded(text: &str, term: &str) -> Option<usize> {
    let hay = fold_text(text);
    let needle = fold_text(term).chars;
    if needle.is_empty() || needle.len() > hay.chars.len() {
        return None;
    }
    hay.chars
        .windows(needle.len())
        .position(|window| window == needle.as_slice())
        .map(|pos| hay.origin[pos])
}

#[derive(Debug, Clone, Default)]
pub struct TokenizerConfig {
    /// Reduce English words to their stem ("running" -> "run").
    pub stem: bool,
    /// Extra stop words, one per line.
    pub stop_words_file: Option<PathBuf>,
}

/// NFKC + lowercase + regex segmentation, with optional stemming.
pub struct WordTokenizer {
    stemmer: Option<Stemmer>,
    extra_stop_words: HashSet<String>,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self { stemmer: None, extra_stop_words: HashSet::new() }
    }

    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        let mut tokenizer = Self::new();
        if config.stem {
            tokenizer.stemmer = Some(Stemmer::create(Algorithm::English));
        }
        if let Some(path) = &config.stop_words_file {
            tokenizer.extra_stop_words = load_stop_words(path)?;
            tracing::info!(path = %path.display(), count = tokenizer.extra_stop_words.len(), "loaded stop words");
        }
        Ok(tokenizer)
    }
}

impl Default for WordTokenizer {
    fn default() -> Self { Self::new() }
}

impl WordTokenizer {
    /// Stop words are checked on the surface form, before stemming.
    fn terms(&self, text: &str, drop_stop_words: bool) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        RE.find_iter(&normalized)
            .map(|mat| mat.as_str())
            .filter(|word| !(drop_stop_words && self.is_stop_word(word)))
            .map(|word| self.stem(word))
            .collect()
    }

    fn stem(&self, word: &str) -> String {
        match &self.stemmer {
            Some(stemmer) => stemmer.stem(word).into_owned(),
            None => word.to_string(),
        }
    }
}

impl Tokenizer for WordTokenizer {
    fn cut(&self, text: &str) -> Vec<String> {
        self.terms(text, false)
    }

    fn cut_without_stop_words(&self, text: &str) -> Vec<String> {
        self.terms(text, true)
    }

    fn is_stop_word(&self, term: &str) -> bool {
        STOPWORDS.contains(term) || self.extra_stop_words.contains(term)
    }

    /// A stemmed term is rarely a substring of the body ("librari" vs
    /// "library"), so with stemming on, the body's own words are stemmed and
    /// compared instead.
    fn locate(&self, text: &str, term: &str) -> Option<usize> {
        if self.stemmer.is_none() {
            return find_folded(text, term);
        }
        let folded = fold_text(text);
        let haystack: String = folded.chars.iter().collect();
        let target: String = term.chars().map(fold_sigma).collect();
        RE.find_iter(&haystack)
            .find(|mat| self.stem(mat.as_str()).chars().map(fold_sigma).eq(target.chars()))
            .map(|mat| folded.origin[haystack[..mat.start()].chars().count()])
    }
}

fn load_stop_words(path: &Path) -> Result<HashSet<String>> {
    let text = fs::read_to_string(path)
        .map_err(|source| Error::StopWords { path: path.to_path_buf(), source })?;
    Ok(text
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect())
}
