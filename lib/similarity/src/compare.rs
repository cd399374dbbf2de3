//! Code comparison
//!
//! Turns two perceptual codes into a similarity score in [0.0, 1.0].
//! Equal-length codes are compared position by position (Hamming ratio);
//! codes of different length fall back to a character-bigram Dice score.

use std::collections::HashSet;
use thiserror::Error;

/// Failure to produce a score for a pair of codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("both codes are empty")]
    EmptyCodes,

    #[error("neither code has a bigram")]
    NoBigrams,
}

/// Compare two codes
///
/// # Arguments
/// * `a` - First code
/// * `b` - Second code
///
/// # Returns
/// Similarity score in [0.0, 1.0], or an error when the score is undefined
/// (two empty codes, or two codes without a single bigram)
pub fn compare(a: &str, b: &str) -> Result<f64, ComparisonError> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.len() == b_chars.len() {
        return hamming_ratio(&a_chars, &b_chars);
    }

    bigram_similarity(a, b)
}

/// Positional similarity of two equal-length codes: `(L - mismatches) / L`
///
/// Codes of different length are compared over their common prefix, which
/// `compare` never does.
pub fn hamming_similarity(a: &str, b: &str) -> Result<f64, ComparisonError> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    hamming_ratio(&a_chars, &b_chars)
}

fn hamming_ratio(a: &[char], b: &[char]) -> Result<f64, ComparisonError> {
    let len = a.len().min(b.len());
    if len == 0 {
        return Err(ComparisonError::EmptyCodes);
    }

    let mismatches = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
    Ok((len - mismatches) as f64 / len as f64)
}

/// Case-insensitive bigram Dice similarity
///
/// Every bigram of `a` scores one hit if an equal bigram occurs anywhere in
/// `b`. Bigrams of `b` are not consumed, so a repeated bigram in `a` can hit
/// the same bigram of `b` several times and the score is not symmetric.
/// The result is capped at 1.0.
pub fn bigram_similarity(a: &str, b: &str) -> Result<f64, ComparisonError> {
    let bigrams_a = char_bigrams(a);
    let bigrams_b = char_bigrams(b);

    let total = bigrams_a.len() + bigrams_b.len();
    if total == 0 {
        return Err(ComparisonError::NoBigrams);
    }

    let present: HashSet<(char, char)> = bigrams_b.into_iter().collect();
    let hits = bigrams_a.iter().filter(|x| present.contains(*x)).count();

    Ok((2.0 * hits as f64 / total as f64).min(1.0))
}

/// Overlapping two-character substrings of the lower-cased input, in order
pub fn bigrams(s: &str) -> Vec<String> {
    char_bigrams(s)
        .into_iter()
        .map(|(x, y)| [x, y].iter().collect())
        .collect()
}

fn char_bigrams(s: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = s.to_lowercase().chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}
