/*!
 * Chunking and reassembly of documents.
 *
 * The translation model accepts a bounded amount of input, so a document is
 * split into whitespace-delimited word runs that fit a character budget and
 * the per-chunk translations are joined back in their original order.
 */

use crate::errors::TranslationError;

/// Default maximum chunk length in characters
pub const DEFAULT_MAX_CHUNK_LENGTH: usize = 512;

/// Split `text` into ordered chunks of at most `max_length` characters.
///
/// Words are accumulated greedily. A word that would push the space-joined
/// chunk past `max_length` closes the current chunk and opens the next one.
/// A single word longer than `max_length` is emitted as its own chunk rather
/// than being cut, so the bound only holds for chunks of two or more words.
///
/// Lengths are counted in `char`s, not bytes.
///
/// # Errors
/// Returns `TranslationError::InvalidConfiguration` when `max_length` is zero.
pub fn split_into_chunks(text: &str, max_length: usize) -> Result<Vec<String>, TranslationError> {
    if max_length == 0 {
        return Err(TranslationError::InvalidConfiguration(
            "max chunk length must be a positive integer".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
            continue;
        }

        // +1 for the joining space
        if current_len + 1 + word_len > max_length {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}

/// Join translated chunks with single spaces, preserving their order
pub fn join_translations<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
