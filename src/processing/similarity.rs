//! Token-set similarity used to rank pages against a topic.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());

/// Common English words that carry no topical signal.
pub const STOP_WORDS: [&str; 34] = [
    "the", "and", "for", "with", "that", "this", "you", "your", "from", "are", "was", "were",
    "but", "not", "have", "has", "had", "can", "how", "why", "what", "when", "where", "which",
    "into", "about", "will", "they", "them", "their", "our", "out", "use", "using",
];

/// Normalized, order-free set of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet(HashSet<String>);

impl TokenSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `|A ∩ B| / |A ∪ B|`, or 0 when both sets are empty.
    pub fn jaccard(&self, other: &TokenSet) -> f64 {
        let intersection = self.0.intersection(&other.0).count();
        let union = self.len() + other.len() - intersection;
        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }
}

impl FromIterator<String> for TokenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Lowercases `text`, replaces everything but `[a-z0-9]` and whitespace with
/// spaces and keeps the tokens longer than two characters that are not stop
/// words.
pub fn tokenize(text: &str) -> TokenSet {
    let lowered = text.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.len() > 2 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    a.jaccard(b)
}
