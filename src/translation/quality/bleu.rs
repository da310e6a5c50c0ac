/*!
 * Sentence-level BLEU score.
 *
 * Whitespace tokenization, clipped n-gram precision for n = 1..=4 with
 * uniform weights, and the standard brevity penalty. No smoothing: a zero
 * precision at any order yields a score of 0.0.
 */

use std::collections::HashMap;

/// Highest n-gram order
pub const MAX_NGRAM_ORDER: usize = 4;

/// Count the n-grams of order `n` in `tokens`
fn ngram_counts<'a>(tokens: &'a [&'a str], n: usize) -> HashMap<&'a [&'a str], usize> {
    let mut counts = HashMap::new();
    if tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// Clipped precision of order `n` as `(matches, total)`
pub fn modified_precision(reference: &[&str], candidate: &[&str], n: usize) -> (usize, usize) {
    let candidate_counts = ngram_counts(candidate, n);
    let reference_counts = ngram_counts(reference, n);

    let matches = candidate_counts
        .iter()
        .map(|(ngram, count)| (*count).min(reference_counts.get(ngram).copied().unwrap_or(0)))
        .sum();
    let total = candidate.len().saturating_sub(n - 1);

    (matches, total)
}

/// Brevity penalty for a candidate of length `c` against a reference of length `r`
pub fn brevity_penalty(reference_len: usize, candidate_len: usize) -> f64 {
    if candidate_len == 0 {
        return 0.0;
    }
    if candidate_len >= reference_len {
        return 1.0;
    }
    (1.0 - reference_len as f64 / candidate_len as f64).exp()
}

/// BLEU score of `candidate` against a single `reference`, in `[0, 1]`
pub fn sentence_bleu(reference: &str, candidate: &str) -> f64 {
    let reference: Vec<&str> = reference.split_whitespace().collect();
    let candidate: Vec<&str> = candidate.split_whitespace().collect();

    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let weight = 1.0 / MAX_NGRAM_ORDER as f64;
    let mut log_sum = 0.0;

    for n in 1..=MAX_NGRAM_ORDER {
        let (matches, total) = modified_precision(&reference, &candidate, n);
        if matches == 0 || total == 0 {
            return 0.0;
        }
        log_sum += weight * (matches as f64 / total as f64).ln();
    }

    brevity_penalty(reference.len(), candidate.len()) * log_sum.exp()
}
