use std::collections::HashSet;

/// Measure of Textual Lexical Diversity.
///
/// Walks the token stream keeping a running type-token ratio; each time the
/// ratio decays to `ttr_threshold` a factor closes and the window resets.
/// The score is total tokens over factor count, averaged over a forward and
/// a reverse pass, which keeps it length-independent.
pub fn mtld(tokens: &[String], ttr_threshold: f64, min_words: usize) -> Option<f64> {
    if tokens.len() < min_words {
        return None;
    }
    let forward = directional_mtld(tokens.iter(), ttr_threshold)?;
    let backward = directional_mtld(tokens.iter().rev(), ttr_threshold)?;
    Some((forward + backward) / 2.0)
}

fn directional_mtld<'a, I>(tokens: I, threshold: f64) -> Option<f64>
where
    I: Iterator<Item = &'a String>,
{
    let mut factors = 0.0f64;
    let mut types: HashSet<&str> = HashSet::new();
    let mut window_tokens = 0usize;
    let mut total = 0usize;

    for token in tokens {
        total += 1;
        window_tokens += 1;
        types.insert(token.as_str());
        let ttr = types.len() as f64 / window_tokens as f64;
        if ttr <= threshold {
            factors += 1.0;
            types.clear();
            window_tokens = 0;
        }
    }
    // Partial factor credit for the unfinished tail window.
    if window_tokens > 0 {
        let ttr = types.len() as f64 / window_tokens as f64;
        if threshold < 1.0 {
            factors += (1.0 - ttr) / (1.0 - threshold);
        }
    }
    if factors == 0.0 {
        return None;
    }
    Some(total as f64 / factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(|w| w.to_string()).collect()
    }

    #[test]
    fn below_minimum_is_undefined() {
        let tokens = words("a few short words only");
        assert!(mtld(&tokens, 0.72, 50).is_none());
    }

    #[test]
    fn repeating_distribution_is_length_invariant() {
        let base = "the cat sat on a mat while the dog ran over a hill and every bird sang songs about warm summer rain falling gently onto green fields near our quiet little town";
        let once = words(&base.repeat(3));
        let twice = words(&base.repeat(6));
        let four = words(&base.repeat(12));
        let s1 = mtld(&once, 0.72, 50).unwrap();
        let s2 = mtld(&twice, 0.72, 50).unwrap();
        let s4 = mtld(&four, 0.72, 50).unwrap();
        assert!((s1 - s2).abs() / s1 < 0.10, "s1={s1} s2={s2}");
        assert!((s1 - s4).abs() / s1 < 0.10, "s1={s1} s4={s4}");
    }

    #[test]
    fn richer_vocabulary_scores_higher() {
        let repetitive = words(&"yes no yes no maybe yes no ".repeat(20));
        let varied: Vec<String> = (0..180).map(|i| format!("word{}", i % 60)).collect();
        let low = mtld(&repetitive, 0.72, 50).unwrap();
        let high = mtld(&varied, 0.72, 50).unwrap();
        assert!(high > low);
    }

    #[test]
    fn fully_unique_text_is_undefined() {
        let unique: Vec<String> = (0..80).map(|i| format!("word{i}")).collect();
        assert!(mtld(&unique, 0.72, 50).is_none());
    }
}
