//! Sentence segmentation for seeding a paper from pasted text.
//!
//! Intentionally a thin punctuation-based splitter. Question papers are
//! one-question-per-sentence prose, so terminator runs plus trailing
//! closers are enough; anything smarter belongs in a dedicated library.

/// Split text into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        if matches!(c, '.' | '!' | '?') {
            // swallow terminator runs ("?!", "...") and closing quotes
            while let Some(&next) = chars.peek() {
                if matches!(next, '.' | '!' | '?' | '"' | '\'' | ')') {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }

            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_sentence_terminators() {
        let text = "What caused World War I? Who led the Soviet Union in 1962? Explain.";
        assert_eq!(
            split_sentences(text),
            vec![
                "What caused World War I?",
                "Who led the Soviet Union in 1962?",
                "Explain.",
            ]
        );
    }

    #[test]
    fn keeps_terminator_runs_together() {
        assert_eq!(
            split_sentences("Really?! Yes... maybe."),
            vec!["Really?!", "Yes...", "maybe."]
        );
    }

    #[test]
    fn keeps_unterminated_tail() {
        assert_eq!(
            split_sentences("First question. Second without a stop"),
            vec!["First question.", "Second without a stop"]
        );
    }

    #[test]
    fn ignores_whitespace_only_input() {
        assert!(split_sentences("   \n\t ").is_empty());
        assert!(split_sentences("").is_empty());
    }
}
