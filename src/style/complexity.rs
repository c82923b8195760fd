use serde::Serialize;

/// Markers that acknowledge another perspective or qualify a claim.
const DIFFERENTIATION_PHRASES: &[&str] = &[
    "on the other hand",
    "but then again",
    "at the same time",
    "then again",
    "however",
    "although",
    "even though",
    "i see your point",
    "you have a point",
    "fair enough",
    "i guess it depends",
    "it depends",
    "maybe you're right",
    "not sure about that",
    "in a way",
    "to some extent",
];

/// Markers that combine perspectives into a joint view; weighted double.
const INTEGRATION_PHRASES: &[&str] = &[
    "taking into account",
    "all things considered",
    "considering everything",
    "putting it together",
    "on balance",
    "weighing it up",
    "both are true",
    "bit of both",
    "middle ground",
    "meet in the middle",
    "overall i think",
    "when you combine",
];

const INTEGRATION_WEIGHT: f64 = 2.0;

/// Empirical rescaling for informal chat, where complexity markers are far
/// rarer per message than in essay-style text the 1-7 scale was built on.
const CHAT_COMPRESSION: f64 = 14.0;

const SCALE_FLOOR: f64 = 1.0;
const SCALE_CEILING: f64 = 7.0;

/// Integrative-complexity heuristic on the usual 1-7 scale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrativeComplexity {
    pub score: f64,
    pub differentiation_hits: u32,
    pub integration_hits: u32,
    pub messages_considered: u32,
}

/// Scores one person's messages. `None` when there is no text to score.
pub fn integrative_complexity(message_texts: &[&str]) -> Option<IntegrativeComplexity> {
    if message_texts.is_empty() {
        return None;
    }
    let mut differentiation = 0u32;
    let mut integration = 0u32;
    for text in message_texts {
        let lowered = text.to_lowercase();
        differentiation += count_phrase_hits(&lowered, DIFFERENTIATION_PHRASES);
        integration += count_phrase_hits(&lowered, INTEGRATION_PHRASES);
    }
    let weighted = f64::from(differentiation) + INTEGRATION_WEIGHT * f64::from(integration);
    let per_message = weighted / message_texts.len() as f64;
    let score = (SCALE_FLOOR + per_message * CHAT_COMPRESSION).min(SCALE_CEILING);
    Some(IntegrativeComplexity {
        score,
        differentiation_hits: differentiation,
        integration_hits: integration,
        messages_considered: message_texts.len() as u32,
    })
}

fn count_phrase_hits(lowered: &str, phrases: &[&str]) -> u32 {
    phrases
        .iter()
        .map(|phrase| lowered.matches(phrase).count() as u32)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_assertions_score_the_floor() {
        let texts = vec!["no", "you are wrong", "end of story"];
        let result = integrative_complexity(&texts).unwrap();
        assert_eq!(result.score, SCALE_FLOOR);
        assert_eq!(result.differentiation_hits, 0);
    }

    #[test]
    fn integration_counts_double() {
        let mut diff_texts = vec!["however that may work"];
        let mut integ_texts = vec!["all things considered that may work"];
        for _ in 0..19 {
            diff_texts.push("sounds fine");
            integ_texts.push("sounds fine");
        }
        let diff_only = integrative_complexity(&diff_texts).unwrap();
        let integ_only = integrative_complexity(&integ_texts).unwrap();
        assert!(integ_only.score > diff_only.score);
        assert_eq!(diff_only.differentiation_hits, 1);
        assert_eq!(integ_only.integration_hits, 1);
    }

    #[test]
    fn score_is_capped_at_the_ceiling() {
        let dense = "on the other hand, all things considered, however, taking into account both";
        let result = integrative_complexity(&[dense]).unwrap();
        assert!(result.score <= SCALE_CEILING);
    }

    #[test]
    fn no_text_is_undefined() {
        assert!(integrative_complexity(&[]).is_none());
    }
}
