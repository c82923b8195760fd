use serde::Serialize;

/// A single earned badge, with the value that triggered it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeAward {
    pub id: String,
    pub label: String,
    /// `None` for conversation-level badges.
    pub participant_id: Option<String>,
    pub triggering_value: f64,
}

/// Per-person facts the badge rules look at.
#[derive(Debug, Clone, Default)]
pub struct BadgeInputs {
    pub participant_id: String,
    pub median_response_secs: Option<f64>,
    pub avg_words_per_message: Option<f64>,
    pub emoji_per_message: Option<f64>,
    pub initiation_share: Option<f64>,
    pub mtld: Option<f64>,
    pub peak_hour: Option<f64>,
    pub question_ratio: Option<f64>,
}

/// Conversation-level facts for shared badges.
#[derive(Debug, Clone, Default)]
pub struct ConversationBadgeInputs {
    pub longest_daily_streak: u32,
    pub messages_per_day: Option<f64>,
}

const RAPID_RESPONSE_SECS: f64 = 60.0;
const WORDSMITH_MTLD: f64 = 80.0;
const CONVERSATIONALIST_WORDS: f64 = 18.0;
const EMOJI_ENTHUSIAST_RATE: f64 = 0.5;
const INITIATOR_SHARE: f64 = 0.7;
const CURIOUS_QUESTION_RATIO: f64 = 0.3;
const STREAK_DAYS: u32 = 30;
const HIGH_VOLUME_PER_DAY: f64 = 60.0;

/// Evaluates every badge rule; absent metrics simply never trigger.
pub fn award_badges(
    people: &[BadgeInputs],
    conversation: &ConversationBadgeInputs,
) -> Vec<BadgeAward> {
    let mut awards = Vec::new();
    for person in people {
        let id = Some(person.participant_id.clone());
        if let Some(median) = person.median_response_secs {
            if median <= RAPID_RESPONSE_SECS {
                awards.push(badge("rapid_responder", "Rapid Responder", &id, median));
            }
        }
        if let Some(words) = person.avg_words_per_message {
            if words >= CONVERSATIONALIST_WORDS {
                awards.push(badge("conversationalist", "Conversationalist", &id, words));
            }
        }
        if let Some(rate) = person.emoji_per_message {
            if rate >= EMOJI_ENTHUSIAST_RATE {
                awards.push(badge("emoji_enthusiast", "Emoji Enthusiast", &id, rate));
            }
        }
        if let Some(share) = person.initiation_share {
            if share >= INITIATOR_SHARE {
                awards.push(badge("initiator", "The Initiator", &id, share));
            }
        }
        if let Some(mtld) = person.mtld {
            if mtld >= WORDSMITH_MTLD {
                awards.push(badge("wordsmith", "Wordsmith", &id, mtld));
            }
        }
        if let Some(ratio) = person.question_ratio {
            if ratio >= CURIOUS_QUESTION_RATIO {
                awards.push(badge("curious_mind", "Curious Mind", &id, ratio));
            }
        }
        if let Some(peak) = person.peak_hour {
            if peak >= 22.0 || peak < 4.0 {
                awards.push(badge("night_owl", "Night Owl", &id, peak));
            } else if (5.0..9.0).contains(&peak) {
                awards.push(badge("early_bird", "Early Bird", &id, peak));
            }
        }
    }

    if conversation.longest_daily_streak >= STREAK_DAYS {
        awards.push(badge(
            "streak_keepers",
            "Streak Keepers",
            &None,
            f64::from(conversation.longest_daily_streak),
        ));
    }
    if let Some(rate) = conversation.messages_per_day {
        if rate >= HIGH_VOLUME_PER_DAY {
            awards.push(badge("inseparable", "Inseparable", &None, rate));
        }
    }
    awards
}

fn badge(id: &str, label: &str, participant_id: &Option<String>, value: f64) -> BadgeAward {
    BadgeAward {
        id: id.to_string(),
        label: label.to_string(),
        participant_id: participant_id.clone(),
        triggering_value: value,
    }
}
