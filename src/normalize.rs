//! Text normalization: lowercase, tokenize, drop non-alphabetic tokens and
//! stopwords.
//!
//! [`TextNormalizer::normalize`] is a pure function of its input and the
//! normalizer's stopword set. Its output is always a fixed point:
//! normalizing already-clean text returns it unchanged.

use std::collections::HashSet;
use std::sync::LazyLock;

/// The standard English stopword list (179 words, NLTK `english` corpus).
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Clitics split from their host word ("don't" -> "do" + "n't").
const CLITICS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Fused forms split in two, with the byte offset of the split.
const FUSED_WORDS: &[(&str, usize)] = &[
    ("cannot", 3),
    ("gimme", 3),
    ("gonna", 3),
    ("gotta", 3),
    ("lemme", 3),
    ("wanna", 3),
];

static DEFAULT_NORMALIZER: LazyLock<TextNormalizer> = LazyLock::new(TextNormalizer::english);

/// Normalize `text` with the default English stopword set.
pub fn clean_text(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

/// Lowercasing tokenizer with a stopword filter.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: HashSet<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::english()
    }
}

impl TextNormalizer {
    /// Normalizer using [`ENGLISH_STOPWORDS`].
    pub fn english() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Add extra stopwords (lowercased) on top of the current set.
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Lowercase, tokenize, and keep only alphabetic non-stopword tokens,
    /// joined by single spaces.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        tokenize(&lowered)
            .into_iter()
            .filter(|token| is_alphabetic(token) && !self.is_stopword(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split text into word and punctuation tokens.
///
/// Sentence punctuation and symbols such as `#`, `&` or `%` always separate
/// tokens, as do runs of two or more periods or hyphens. A single period,
/// hyphen, slash or apostrophe inside a word stays attached, so `5/5` or
/// `e-mail` remain a single (non-alphabetic) token. English clitics are split
/// off the end of a word, and a few fused forms (`cannot`, `gonna`) are split
/// in two.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let chunks = text
        .split(|c: char| c.is_whitespace() || is_separator(c))
        .flat_map(split_punctuation_runs);
    for chunk in chunks {
        let word = chunk.trim_matches(|c: char| matches!(c, '.' | '\'' | '`' | '-'));
        if word.is_empty() {
            continue;
        }
        if let Some(at) = fused_split(word) {
            tokens.push(&word[..at]);
            tokens.push(&word[at..]);
            continue;
        }
        match split_clitic(word) {
            Some((host, clitic)) => {
                if !host.is_empty() {
                    tokens.push(host);
                }
                tokens.push(clitic);
            }
            None => tokens.push(word),
        }
    }
    tokens
}

/// Split `chunk` around every run of two or more `.` or `-`.
fn split_punctuation_runs(chunk: &str) -> Vec<&str> {
    let bytes = chunk.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if matches!(b, b'.' | b'-') && bytes.get(i + 1) == Some(&b) {
            let mut end = i;
            while end < bytes.len() && bytes[end] == b {
                end += 1;
            }
            pieces.push(&chunk[start..i]);
            start = end;
            i = end;
        } else {
            i += 1;
        }
    }
    pieces.push(&chunk[start..]);
    pieces
}

/// Byte offset at which a fused word splits, if `word` is one.
fn fused_split(word: &str) -> Option<usize> {
    FUSED_WORDS
        .iter()
        .find(|(fused, _)| word.eq_ignore_ascii_case(fused))
        .map(|&(_, at)| at)
}

fn is_separator(c: char) -> bool {
    matches!(
        c,
        ',' | ';'
            | ':'
            | '!'
            | '?'
            | '"'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '<'
            | '>'
            | '*'
            | '|'
            | '#'
            | '&'
            | '@'
            | '$'
            | '%'
            | '\u{201c}'
            | '\u{201d}'
            | '\u{2026}'
    )
}

fn split_clitic(word: &str) -> Option<(&str, &str)> {
    CLITICS.iter().find_map(|clitic| {
        word.strip_suffix(clitic)
            .map(|host| (host, &word[host.len()..]))
    })
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}
