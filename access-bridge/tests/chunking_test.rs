use access_bridge::utils::text::split_sentences;
use access_bridge::{is_text_too_long, split_long_text};

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn varied_text() -> String {
    let mut text = String::new();
    for i in 0..60 {
        let filler = "accessible ".repeat(i % 7);
        let terminator = match i % 3 {
            0 => ".",
            1 => "!",
            _ => "?..",
        };
        text.push_str(&format!("Sentence {i} is {filler}enough{terminator} "));
    }
    text
}

#[test]
fn test_short_text_is_a_single_chunk() {
    let set = split_long_text("This is short.", 1000);
    assert_eq!(set.len(), 1);
    assert_eq!(set.chunks[0].content, "This is short.");
    assert_eq!(set.chunks[0].length, 14);
}

#[test]
fn test_text_at_the_limit_is_not_split() {
    let text = "a".repeat(50);
    assert!(!is_text_too_long(&text, 50));
    assert_eq!(split_long_text(&text, 50).len(), 1);
}

#[test]
fn test_greedy_accumulation() {
    let text = "Alpha beta. Gamma delta! Epsilon?";

    let tight = split_long_text(text, 20);
    let contents: Vec<&str> = tight.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["Alpha beta.", "Gamma delta.", "Epsilon."]);

    let roomy = split_long_text(text, 25);
    let contents: Vec<&str> = roomy.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["Alpha beta. Gamma delta.", "Epsilon."]);
}

#[test]
fn test_oversized_sentence_becomes_its_own_chunk() {
    let giant = "word ".repeat(40).trim().to_string();
    let text = format!("Small start. {giant}. Small end.");
    let set = split_long_text(&text, 50);

    let contents: Vec<&str> = set.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["Small start.".to_string(), format!("{giant}."), "Small end.".to_string()]);
    assert!(set.chunks[1].length > 50);
}

#[test]
fn test_sentence_of_exactly_max_length_gets_its_own_chunk() {
    let set = split_long_text("abcdefghij. k.", 10);
    let contents: Vec<&str> = set.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["abcdefghij.", "k."]);
    // The closing period does not fit, so this chunk is one over the limit.
    assert_eq!(set.chunks[0].length, 11);
}

#[test]
fn test_chunks_respect_the_size_bound() {
    let text = varied_text();
    for max_length in [40, 100, 250, 1000] {
        let set = split_long_text(&text, max_length);
        assert!(!set.is_empty());
        for chunk in set.iter() {
            let single_sentence = split_sentences(&chunk.content).len() == 1;
            assert!(
                chunk.length <= max_length || (single_sentence && chunk.length - 1 >= max_length),
                "chunk of {} chars exceeds {} with several sentences",
                chunk.length,
                max_length
            );
            assert_eq!(chunk.content, chunk.content.trim());
        }
    }
}

#[test]
fn test_rejoined_chunks_keep_words_in_order() {
    let text = varied_text();
    for max_length in [40, 100, 250] {
        let set = split_long_text(&text, max_length);
        assert_eq!(words(&set.join(". ")), words(&text));
    }
}

#[test]
fn test_2500_chars_split_into_several_chunks() {
    let sentence = "Our kitchen prepares every dish fresh each day";
    let mut text = String::new();
    while text.chars().count() < 2500 {
        text.push_str(sentence);
        text.push_str(". ");
    }

    let set = split_long_text(&text, 1000);
    assert!(set.len() >= 3);
    assert!(set.iter().all(|chunk| chunk.length <= 1000));
}
