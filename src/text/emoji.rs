const ZWJ: char = '\u{200D}';
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Extracts emoji from a message, treating joined sequences as one emoji.
///
/// A family emoji built from four codepoints plus ZWJs, a flag built from a
/// regional-indicator pair, and a skin-toned hand are each a single entry in
/// the returned list.
pub fn extract_emoji(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut found = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if is_regional_indicator(chars[i]) {
            // Flags are regional-indicator pairs; a dangling half still counts once.
            let mut seq = String::new();
            seq.push(chars[i]);
            i += 1;
            if i < chars.len() && is_regional_indicator(chars[i]) {
                seq.push(chars[i]);
                i += 1;
            }
            found.push(seq);
            continue;
        }
        if !is_emoji_base(chars[i]) {
            i += 1;
            continue;
        }
        let mut seq = String::new();
        seq.push(chars[i]);
        i += 1;
        i = consume_modifiers(&chars, i, &mut seq);
        while i + 1 < chars.len() && chars[i] == ZWJ && is_emoji_base(chars[i + 1]) {
            seq.push(ZWJ);
            seq.push(chars[i + 1]);
            i = consume_modifiers(&chars, i + 2, &mut seq);
        }
        found.push(seq);
    }
    found
}

fn consume_modifiers(chars: &[char], mut i: usize, seq: &mut String) -> usize {
    while i < chars.len() && (chars[i] == VARIATION_SELECTOR || is_skin_tone(chars[i])) {
        seq.push(chars[i]);
        i += 1;
    }
    i
}

fn is_regional_indicator(ch: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&ch)
}

fn is_skin_tone(ch: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&ch)
}

fn is_emoji_base(ch: char) -> bool {
    matches!(ch,
        '\u{1F300}'..='\u{1F5FF}'
        | '\u{1F600}'..='\u{1F64F}'
        | '\u{1F680}'..='\u{1F6FF}'
        | '\u{1F900}'..='\u{1F9FF}'
        | '\u{1FA70}'..='\u{1FAFF}'
        | '\u{2600}'..='\u{26FF}'
        | '\u{2700}'..='\u{27BF}'
        | '\u{2B00}'..='\u{2BFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_emoji_are_counted_individually() {
        assert_eq!(extract_emoji("hi 😀 there 🚀"), vec!["😀", "🚀"]);
    }

    #[test]
    fn zwj_family_is_one_emoji() {
        // Family: man + ZWJ + woman + ZWJ + girl.
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        let found = extract_emoji(family);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0], family);
    }

    #[test]
    fn skin_tone_modifier_stays_attached() {
        let waving = "\u{1F44B}\u{1F3FD}";
        assert_eq!(extract_emoji(waving), vec![waving.to_string()]);
    }

    #[test]
    fn flag_pair_is_one_emoji() {
        let flag = "\u{1F1EB}\u{1F1F7}"; // FR
        assert_eq!(extract_emoji(flag).len(), 1);
    }

    #[test]
    fn text_without_emoji_yields_nothing() {
        assert!(extract_emoji("just words, no pictures").is_empty());
    }

    #[test]
    fn heart_with_variation_selector() {
        let heart = "\u{2764}\u{FE0F}";
        assert_eq!(extract_emoji(heart), vec![heart.to_string()]);
    }
}
