//! Local fallbacks used whenever the AI service is unavailable or fails.
//!
//! None of these can fail. Degenerate input produces an empty or unchanged
//! string, which callers accept as a valid result.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::OperationKind;
use crate::utils::text::{char_len, split_sentences, strip_non_speech, take_chars};

/// Sentences at or above this length are dropped by the simplifier
pub const MAX_SIMPLE_SENTENCE_CHARS: usize = 100;

/// Number of sentences the simplifier keeps
pub const MAX_SIMPLE_SENTENCES: usize = 3;

/// How much of the context ends up in a generic image description
pub const DESCRIPTION_CONTEXT_CHARS: usize = 50;

pub const AUDIO_SUMMARY_PREFIX: &str = "Here's a summary: ";

/// Ordered description rules, first match wins
const DESCRIPTION_RULES: &[(&[&str], &str)] = &[
    (&["logo"], "Company logo"),
    (&["menu", "food"], "Food menu item image"),
    (&["photo", "picture"], "Photograph"),
    (&["icon"], "Icon image"),
];

struct RewriteRule {
    pattern: Regex,
    replacement: &'static str,
}

// Application order is part of the observable behavior.
static REWRITE_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    [
        (r"(?i)\b(furthermore|moreover|additionally|consequently)\b", "also"),
        (r"(?i)\b(utilize|utilization)\b", "use"),
        (r"(?i)\b(demonstrate|illustrate)\b", "show"),
        (r"(?i)\b(approximately)\b", "about"),
        (r"(?i)\b(numerous)\b", "many"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| RewriteRule {
        pattern: Regex::new(pattern).expect("valid rewrite rule"),
        replacement,
    })
    .collect()
});

/// Keep the first few short sentences, in order, ending with one period.
pub fn simplify(text: &str) -> String {
    let kept: Vec<&str> = split_sentences(text)
        .into_iter()
        .filter(|sentence| char_len(sentence) < MAX_SIMPLE_SENTENCE_CHARS)
        .take(MAX_SIMPLE_SENTENCES)
        .collect();

    if kept.is_empty() {
        return String::new();
    }

    let mut simplified = kept.join(". ");
    simplified.push('.');
    simplified
}

/// Alt text from a free-text context string.
pub fn describe(context: &str) -> String {
    for (keywords, label) in DESCRIPTION_RULES {
        if keywords.iter().any(|keyword| context.contains(keyword)) {
            return (*label).to_string();
        }
    }

    format!("Image: {}", take_chars(context, DESCRIPTION_CONTEXT_CHARS).trim())
}

/// Swap formal connectives and verbs for plain ones.
pub fn rewrite(text: &str) -> String {
    REWRITE_RULES.iter().fold(text.to_string(), |current, rule| {
        rule.pattern.replace_all(&current, rule.replacement).into_owned()
    })
}

/// Without a translator the best answer is the original text.
pub fn translate(text: &str) -> String {
    text.to_string()
}

/// Screen-reader friendly wrapper around an already simplified text.
pub fn audio_friendly(summary: &str) -> String {
    format!("{}{}", AUDIO_SUMMARY_PREFIX, strip_non_speech(summary))
}

/// Run the fallback that matches `kind`.
pub fn run(kind: OperationKind, text: &str) -> String {
    match kind {
        OperationKind::Summarize => simplify(text),
        OperationKind::Describe => describe(text),
        OperationKind::Translate => translate(text),
        OperationKind::Rewrite => rewrite(text),
    }
}
