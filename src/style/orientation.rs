use serde::Serialize;

const FIRST_PERSON_SINGULAR: &[&str] = &["i", "me", "my", "mine", "myself", "i'm", "i've", "i'll"];
const FIRST_PERSON_PLURAL: &[&str] = &["we", "us", "our", "ours", "ourselves", "we're", "we've"];
const SECOND_PERSON: &[&str] = &["you", "your", "yours", "yourself", "you're", "you've", "you'll"];
const THIRD_PERSON: &[&str] = &[
    "he", "him", "his", "she", "her", "hers", "they", "them", "their", "theirs", "he's", "she's",
];

const PAST_MARKERS: &[&str] = &[
    "was", "were", "had", "did", "been", "went", "said", "told", "saw", "came", "got", "made",
    "used", "yesterday", "ago", "before", "earlier", "remember", "remembered", "back", "then",
    "once", "previously",
];
const PRESENT_MARKERS: &[&str] = &[
    "is", "am", "are", "do", "does", "now", "today", "currently", "tonight", "here", "right",
    "moment", "happening",
];
const FUTURE_MARKERS: &[&str] = &[
    "will", "gonna", "going", "tomorrow", "soon", "later", "next", "plan", "plans", "planning",
    "hope", "hoping", "someday", "eventually", "future", "shall", "we'll", "i'll", "you'll",
];

/// Pronoun-category rates per 1000 words.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PronounRates {
    pub first_person_singular: f64,
    pub first_person_plural: f64,
    pub second_person: f64,
    pub third_person: f64,
    /// "we" usage relative to "I" usage; `None` without any first person.
    pub we_to_i_ratio: Option<f64>,
}

/// Past/present/future marker rates and the future-orientation index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOrientation {
    pub past_rate: f64,
    pub present_rate: f64,
    pub future_rate: f64,
    /// `future / (past + present + future)`; `None` when no markers hit.
    pub future_index: Option<f64>,
}

fn rate(tokens: &[String], words: &[&str]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens.iter().filter(|t| words.contains(&t.as_str())).count();
    hits as f64 / tokens.len() as f64 * 1000.0
}

/// Pronoun rates, gated on the configured minimum word count.
pub fn pronoun_rates(tokens: &[String], min_words: usize) -> Option<PronounRates> {
    if tokens.len() < min_words {
        return None;
    }
    let first_singular = rate(tokens, FIRST_PERSON_SINGULAR);
    let first_plural = rate(tokens, FIRST_PERSON_PLURAL);
    let we_to_i_ratio = if first_singular > 0.0 {
        Some(first_plural / first_singular)
    } else {
        None
    };
    Some(PronounRates {
        first_person_singular: first_singular,
        first_person_plural: first_plural,
        second_person: rate(tokens, SECOND_PERSON),
        third_person: rate(tokens, THIRD_PERSON),
        we_to_i_ratio,
    })
}

/// Time-orientation rates, gated on the configured minimum word count.
pub fn time_orientation(tokens: &[String], min_words: usize) -> Option<TimeOrientation> {
    if tokens.len() < min_words {
        return None;
    }
    let past = rate(tokens, PAST_MARKERS);
    let present = rate(tokens, PRESENT_MARKERS);
    let future = rate(tokens, FUTURE_MARKERS);
    let total = past + present + future;
    let future_index = if total > 0.0 { Some(future / total) } else { None };
    Some(TimeOrientation {
        past_rate: past,
        present_rate: present,
        future_rate: future,
        future_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    #[test]
    fn gates_below_minimum_words() {
        let tokens = tokenize("i was there yesterday");
        assert!(pronoun_rates(&tokens, 200).is_none());
        assert!(time_orientation(&tokens, 500).is_none());
    }

    #[test]
    fn future_leaning_text_has_high_index() {
        let text = "we will go tomorrow and soon we plan the next trip hoping for later ".repeat(10);
        let tokens = tokenize(&text);
        let orientation = time_orientation(&tokens, 50).unwrap();
        let index = orientation.future_index.unwrap();
        assert!(index > 0.5, "index={index}");
    }

    #[test]
    fn we_to_i_ratio_reflects_couple_language() {
        let text = "we went and we decided our plans because we loved our time together we are happy ".repeat(5);
        let tokens = tokenize(&text);
        let rates = pronoun_rates(&tokens, 50).unwrap();
        assert!(rates.we_to_i_ratio.is_none() || rates.we_to_i_ratio.unwrap() > 1.0);
        assert!(rates.first_person_plural > rates.second_person);
    }
}
