use serde::Serialize;

/// Function-word categories used for Language Style Matching.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "pronouns",
        &[
            "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "you", "your", "yours",
            "he", "him", "his", "she", "her", "hers", "they", "them", "their", "theirs", "it",
            "its",
        ],
    ),
    (
        "prepositions",
        &[
            "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
            "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
            "of", "off", "over", "under",
        ],
    ),
    (
        "conjunctions",
        &[
            "and", "but", "or", "so", "because", "although", "while", "since", "unless", "though",
            "whereas", "if",
        ],
    ),
    (
        "adverbs",
        &[
            "very", "really", "just", "quite", "too", "also", "always", "never", "often",
            "sometimes", "maybe", "probably", "actually", "basically", "literally", "totally",
        ],
    ),
    (
        "negations",
        &["not", "no", "never", "nothing", "nobody", "none", "neither", "nor", "don't", "can't"],
    ),
    (
        "quantifiers",
        &[
            "all", "some", "many", "much", "few", "more", "most", "less", "least", "every",
            "each", "any", "both", "several", "lots",
        ],
    ),
    ("articles", &["a", "an", "the"]),
    (
        "auxiliary_verbs",
        &[
            "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
            "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
            "must",
        ],
    ),
    (
        "modifiers",
        &[
            "good", "bad", "big", "small", "new", "old", "little", "long", "great", "nice",
            "right", "sure", "fine", "okay",
        ],
    ),
];

/// Usage below this per-1000-word rate on either side drops a category from
/// the overall mean (0.1% of words).
const MIN_CATEGORY_RATE: f64 = 1.0;

/// One function-word category comparison.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLsm {
    pub category: String,
    pub rate_a: f64,
    pub rate_b: f64,
    /// `1 - |a-b|/(a+b)`; 1.0 is identical usage.
    pub score: f64,
}

/// Language Style Matching between two participants.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LsmResult {
    pub participant_a: String,
    pub participant_b: String,
    pub overall: f64,
    /// Mean signed deviation; positive means `participant_a` leans harder on
    /// function words, i.e. `b` is the plainer speaker.
    pub asymmetry: f64,
    pub categories: Vec<CategoryLsm>,
}

/// Per-1000-word function-word rates for one person across all categories.
fn category_rates(tokens: &[String]) -> Vec<f64> {
    let total = tokens.len() as f64;
    CATEGORIES
        .iter()
        .map(|(_, words)| {
            if total == 0.0 {
                return 0.0;
            }
            let hits = tokens.iter().filter(|t| words.contains(&t.as_str())).count();
            hits as f64 / total * 1000.0
        })
        .collect()
}

/// Computes LSM for an (a, b) pair. `None` when either side has no tokens or
/// no category clears the usage floor on both sides.
pub fn language_style_matching(
    participant_a: (&str, &[String]),
    participant_b: (&str, &[String]),
) -> Option<LsmResult> {
    let (id_a, tokens_a) = participant_a;
    let (id_b, tokens_b) = participant_b;
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return None;
    }
    let rates_a = category_rates(tokens_a);
    let rates_b = category_rates(tokens_b);

    let mut categories = Vec::new();
    let mut included = Vec::new();
    let mut signed = Vec::new();
    for (index, (name, _)) in CATEGORIES.iter().enumerate() {
        let (a, b) = (rates_a[index], rates_b[index]);
        if a + b == 0.0 {
            continue;
        }
        let score = 1.0 - (a - b).abs() / (a + b);
        categories.push(CategoryLsm {
            category: (*name).to_string(),
            rate_a: a,
            rate_b: b,
            score,
        });
        if a > MIN_CATEGORY_RATE && b > MIN_CATEGORY_RATE {
            included.push(score);
            signed.push((a - b) / (a + b));
        }
    }
    if included.is_empty() {
        return None;
    }
    let overall = included.iter().sum::<f64>() / included.len() as f64;
    let asymmetry = signed.iter().sum::<f64>() / signed.len() as f64;
    Some(LsmResult {
        participant_a: id_a.to_string(),
        participant_b: id_b.to_string(),
        overall,
        asymmetry,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    #[test]
    fn identical_text_matches_near_perfectly() {
        let text = "i think we should go to the park because it is really nice and we can just relax for a while";
        let tokens = tokenize(text);
        let result = language_style_matching(("a", &tokens), ("b", &tokens)).unwrap();
        assert!(result.overall > 0.99);
        assert!(result.asymmetry.abs() < 1e-9);
    }

    #[test]
    fn divergent_styles_score_lower() {
        let chatty = tokenize(
            "i really think that we should just go because it is the best and i am very sure about it honestly",
        );
        let terse = tokenize("park tomorrow nine sharp bring coffee snacks camera tripod jackets");
        let close = language_style_matching(("a", &chatty), ("b", &chatty)).unwrap();
        let far = language_style_matching(("a", &chatty), ("b", &terse));
        if let Some(far) = far {
            assert!(far.overall < close.overall);
        }
    }

    #[test]
    fn empty_side_yields_none() {
        let tokens = tokenize("we are here");
        assert!(language_style_matching(("a", &tokens), ("b", &[])).is_none());
    }
}
