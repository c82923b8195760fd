const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "or", "to", "of", "in", "on", "for", "with", "the", "this", "that", "by",
    "from", "it", "is", "was", "are", "be", "at", "as", "but", "so", "if", "i", "you", "we",
    "they", "he", "she", "my", "your", "me", "not", "do", "just", "have", "had", "what", "like",
];

/// Lowercased word tokens with punctuation stripped.
///
/// Apostrophes survive inside a word ("don't" stays one token) so negation
/// contractions reach the sentiment layer intact; everything else
/// non-alphanumeric is a separator.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if (ch == '\'' || ch == '\u{2019}') && !current.is_empty() {
            current.push('\'');
        } else if !current.is_empty() {
            push_token(&mut tokens, &mut current);
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, &mut current);
    }
    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim_matches('\'');
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
    current.clear();
}

/// Consecutive token pairs, used for top-phrase tables and conflict phrases.
pub fn bigrams(tokens: &[String]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World!! it's FINE..."),
            vec!["hello", "world", "it's", "fine"]
        );
    }

    #[test]
    fn curly_apostrophes_normalize() {
        assert_eq!(tokenize("don\u{2019}t"), vec!["don't"]);
    }

    #[test]
    fn leading_and_trailing_quotes_are_not_part_of_words() {
        assert_eq!(tokenize("'quoted'"), vec!["quoted"]);
    }

    #[test]
    fn bigrams_pair_adjacent_tokens() {
        let tokens = tokenize("you never listen");
        assert_eq!(bigrams(&tokens), vec!["you never", "never listen"]);
    }
}
