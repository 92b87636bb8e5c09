use crate::types::ImageContext;

/// Context used when an image offers no hints at all
pub const DEFAULT_IMAGE_CONTEXT: &str = "image on webpage";

/// Nearby text at or above this length is page noise rather than a caption
const MAX_NEARBY_TEXT_CHARS: usize = 200;

/// Assemble the free-text context for a Describe request from an image's hints
pub fn image_context_string(image: &ImageContext) -> String {
    let mut parts = leading_hints(image);
    if let Some(nearby) = image.nearby_text.as_deref().map(text::normalize_whitespace) {
        let len = text::char_len(&nearby);
        if len > 0 && len < MAX_NEARBY_TEXT_CHARS {
            parts.push(nearby);
        }
    }
    parts.extend(caption_of(image));
    join_context(parts)
}

/// Context for a Describe request whose main input is text the user typed.
///
/// The image hints come first and `description` follows in full; the length
/// cap on nearby page text does not apply to it.
pub fn describe_input(image: &ImageContext, description: &str) -> String {
    let mut parts = leading_hints(image);
    parts.extend(caption_of(image));
    let description = text::normalize_whitespace(description);
    if !description.is_empty() {
        parts.push(description);
    }
    join_context(parts)
}

fn caption_of(image: &ImageContext) -> Option<String> {
    image
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Filename keywords and title, in that order
fn leading_hints(image: &ImageContext) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();

    if let Some(keywords) = image.src.as_deref().and_then(filename_keywords) {
        parts.push(keywords);
    }
    if let Some(title) = image.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        parts.push(title.to_string());
    }
    parts
}

fn join_context(parts: Vec<String>) -> String {
    let context = parts.join(" ").trim().to_string();
    if context.is_empty() {
        DEFAULT_IMAGE_CONTEXT.to_string()
    } else {
        context
    }
}

/// Keywords derived from an image source: the last path segment up to its
/// first dot, with dashes and underscores read as spaces.
pub fn filename_keywords(src: &str) -> Option<String> {
    let segment = src.rsplit('/').next().unwrap_or(src);
    let stem = segment.split('.').next().unwrap_or(segment);
    let keywords = stem.replace(['-', '_'], " ").trim().to_string();
    if keywords.is_empty() {
        None
    } else {
        Some(keywords)
    }
}

/// Text processing utilities
pub mod text {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static SENTENCE_TERMINATORS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence terminator pattern"));

    static NON_SPEECH_CHARS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^\w\s.,!?]").expect("valid speech filter pattern"));

    /// Length in chars, the unit every limit in this crate is expressed in
    pub fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    /// Split on runs of `.`, `!` and `?`, dropping the terminators. Pieces are
    /// trimmed and whitespace-only pieces are skipped.
    pub fn split_sentences(text: &str) -> Vec<&str> {
        SENTENCE_TERMINATORS
            .split(text)
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }

    /// The first `count` chars of `text`
    pub fn take_chars(text: &str, count: usize) -> &str {
        match text.char_indices().nth(count) {
            Some((byte_index, _)) => &text[..byte_index],
            None => text,
        }
    }

    /// Drop everything a speech synthesizer would read out as noise
    pub fn strip_non_speech(text: &str) -> String {
        NON_SPEECH_CHARS.replace_all(text, "").into_owned()
    }

    /// Collapse whitespace runs to single spaces
    pub fn normalize_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
