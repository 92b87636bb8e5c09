use crate::types::{ChunkSet, TextUnit};
use crate::utils::text::{char_len, split_sentences};

/// Joiner placed between sentences inside a chunk
pub const SENTENCE_JOINER: &str = ". ";

pub fn is_text_too_long(text: &str, max_length: usize) -> bool {
    char_len(text) > max_length
}

/// Split `text` into chunks of at most `max_length` chars on sentence
/// boundaries.
///
/// Sentences are accumulated greedily; a chunk is sealed as soon as the next
/// sentence would push it over the limit, and that sentence opens the next
/// chunk. A sentence that cannot fit together with its closing period is
/// never cut and ends up as its own oversized chunk, so a sentence of exactly
/// `max_length` chars yields a chunk of `max_length + 1`.
pub fn split_long_text(text: &str, max_length: usize) -> ChunkSet {
    if !is_text_too_long(text, max_length) {
        return ChunkSet {
            chunks: vec![TextUnit::new(text)],
        };
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let sentence_len = char_len(sentence);
        // A sealed chunk keeps the trailing period but drops the space.
        if current_len > 0 && current_len + sentence_len + 1 > max_length {
            seal(&mut chunks, &current);
            current.clear();
            current_len = 0;
        }

        current.push_str(sentence);
        current.push_str(SENTENCE_JOINER);
        current_len += sentence_len + SENTENCE_JOINER.len();
    }

    seal(&mut chunks, &current);
    ChunkSet { chunks }
}

fn seal(chunks: &mut Vec<TextUnit>, current: &str) {
    let sealed = current.trim();
    if !sealed.is_empty() {
        chunks.push(TextUnit::new(sealed));
    }
}
