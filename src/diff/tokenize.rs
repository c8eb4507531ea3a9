//! Script-aware tokenizer for diffing.
//!
//! Latin words (alphanumerics plus apostrophe/hyphen) form one token each;
//! CJK ideographs are segmented per character since CJK text carries no
//! whitespace word boundaries; every other character — spaces included — is
//! its own token so that concatenating tokens reproduces the input exactly.

/// Split `text` into diff tokens. Lossless: `tokens.concat() == text`.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) && !is_cjk(ch) {
            if word_start.is_none() {
                word_start = Some(idx);
            }
        } else {
            if let Some(start) = word_start.take() {
                tokens.push(&text[start..idx]);
            }
            tokens.push(&text[idx..idx + ch.len_utf8()]);
        }
    }
    if let Some(start) = word_start {
        tokens.push(&text[start..]);
    }

    tokens
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '\'' || ch == '-'
}

/// CJK ideographs and compatibility ranges. Hiragana/katakana and hangul are
/// included since they are likewise written without spaces.
fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{4E00}'..='\u{9FFF}'    // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'  // Extension A
        | '\u{F900}'..='\u{FAFF}'  // Compatibility Ideographs
        | '\u{3040}'..='\u{30FF}'  // Hiragana + Katakana
        | '\u{AC00}'..='\u{D7AF}'  // Hangul Syllables
        | '\u{FF00}'..='\u{FFEF}'  // Fullwidth forms
        | '\u{3000}'..='\u{303F}'  // CJK punctuation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_words_are_single_tokens() {
        assert_eq!(tokenize("The cat sat."), vec!["The", " ", "cat", " ", "sat", "."]);
    }

    #[test]
    fn concatenation_reproduces_input() {
        for text in [
            "The cat sat.",
            "約140位會員於2024年3月15日出席",
            "mixed 中英 text, with punctuation!",
            "  leading and trailing  ",
            "",
        ] {
            assert_eq!(tokenize(text).concat(), text);
        }
    }

    #[test]
    fn cjk_segmented_per_character() {
        let tokens = tokenize("會員出席");
        assert_eq!(tokens, vec!["會", "員", "出", "席"]);
    }

    #[test]
    fn digits_inside_cjk_stay_one_token() {
        let tokens = tokenize("約140位");
        assert_eq!(tokens, vec!["約", "140", "位"]);
    }

    #[test]
    fn apostrophes_and_hyphens_bind_words() {
        assert_eq!(tokenize("it's a well-known fact"),
            vec!["it's", " ", "a", " ", "well-known", " ", "fact"]);
    }

    #[test]
    fn each_space_is_its_own_token() {
        assert_eq!(tokenize("a  b"), vec!["a", " ", " ", "b"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }
}
