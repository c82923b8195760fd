//! Pipeline orchestration: owns all intermediate state for one invocation,
//! runs the stages in dependency order and assembles the final report.
//! Re-running on updated data builds a fresh result set; nothing published
//! earlier is ever mutated.

mod intermediates;
mod report;

pub use intermediates::Intermediates;
pub use report::{
    AnalysisDiagnostics, PairwisePolicy, QuantitativeAnalysis, TimingStats,
};

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rayon::ThreadPoolBuilder;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::accumulator::{PersonAccumulator, PersonSummary};
use crate::config::AnalysisSettings;
use crate::engagement::{engagement_stats, EngagementStats};
use crate::model::{sanitize_conversation, ParsedConversation, UnifiedMessage};
use crate::patterns::{
    bid_response_stats, chronotype_report, detect_bursts, detect_conflicts,
    detect_pursuit_withdrawal, fingerprint_conflicts, reciprocity_index, ConflictSignal,
    PatternResults, ReciprocityInputs,
};
use crate::scores::{
    award_badges, damage_score, health_score, rank_against_population, threat_meter, viral_score,
    BadgeInputs, CompositeInputs, CompositeScores, ConversationBadgeInputs, PercentileRanking,
};
use crate::sentiment::{aggregate_sentiment, score_messages, LexiconCache, SentimentReport};
use crate::stats;
use crate::style::{
    integrative_complexity, language_style_matching, mtld, pronoun_rates, time_orientation,
    PersonStyle, StyleMetrics,
};
use crate::text::detect_conversation_language;
use crate::timing::{detect_sessions, response_time_stats, ResponseTimeStats};

/// Convenience entry point with default settings and a throwaway lexicon
/// cache.
pub fn analyze(conversation: &ParsedConversation) -> Result<QuantitativeAnalysis> {
    let mut cache = LexiconCache::new();
    analyze_with(conversation, &AnalysisSettings::default(), &mut cache)
}

/// Full entry point. The caller owns the settings and the lexicon cache;
/// passing the same cache across invocations reuses the merged dictionaries.
pub fn analyze_with(
    conversation: &ParsedConversation,
    settings: &AnalysisSettings,
    cache: &mut LexiconCache,
) -> Result<QuantitativeAnalysis> {
    AnalysisPipeline::new(settings.clone()).run(conversation, cache)
}

/// One-invocation orchestrator. All intermediate state lives and dies here.
pub struct AnalysisPipeline {
    settings: AnalysisSettings,
}

impl AnalysisPipeline {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn run(
        &self,
        conversation: &ParsedConversation,
        cache: &mut LexiconCache,
    ) -> Result<QuantitativeAnalysis> {
        let started = Utc::now();
        let participant_ids = conversation.participant_ids();
        if participant_ids.is_empty() {
            bail!("Conversation has no participants to analyze");
        }
        let sanitized = sanitize_conversation(conversation);
        if sanitized.messages.is_empty() {
            bail!(
                "Conversation has no usable messages ({} skipped during validation)",
                sanitized.skipped.total()
            );
        }
        let messages = &sanitized.messages;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.settings.runtime.max_parallel_stages.max(1))
            .build()
            .context("Failed to configure analysis thread pool")?;

        // Language and lexicon are picked before the parallel stages so the
        // cache borrow stays out of the pool closures.
        let detected_language =
            detect_conversation_language(messages.iter().filter_map(|m| m.text()));
        let language_code = detected_language
            .as_ref()
            .map(|l| l.code.as_str())
            .unwrap_or("eng");
        let lexicon = cache.get_or_build(language_code);

        let mut intermediates = pool.install(|| {
            Intermediates::build(messages, self.settings.timing.turn_merge_gap_secs)
        });
        intermediates.message_scores = pool.install(|| {
            score_messages(
                messages,
                &intermediates.tokens,
                &lexicon,
                &self.settings.sentiment,
            )
        });

        let persons = self.accumulate_persons(messages, &intermediates, &participant_ids);
        let sessions = detect_sessions(messages, &self.settings.timing);
        let response_times: Vec<ResponseTimeStats> = participant_ids
            .iter()
            .map(|id| {
                response_time_stats(id, &intermediates.response_samples, &self.settings.timing)
            })
            .collect();
        let engagement =
            engagement_stats(messages, &participant_ids, intermediates.daily.as_ref());
        let sentiment = aggregate_sentiment(
            &intermediates.message_scores,
            &participant_ids,
            &self.settings.sentiment,
            self.settings.timing.trend_min_months,
        );
        let style = self.style_metrics(messages, &intermediates, &participant_ids, &persons);

        let pair = most_active_pair(&persons);
        let patterns = self.pattern_results(
            messages,
            &intermediates,
            &participant_ids,
            &persons,
            &sessions,
            &response_times,
            pair.as_ref(),
        );
        let composites = self.composite_scores(
            &persons,
            &sentiment,
            &engagement,
            &patterns,
            &intermediates,
            pair.as_ref(),
        );
        let badges = self.badge_awards(
            &persons,
            &response_times,
            &sessions,
            &style,
            &patterns,
            &engagement,
        );
        let percentiles = self.percentile_rankings(&persons, &engagement, &intermediates);

        let diagnostics = AnalysisDiagnostics {
            analysis_id: Uuid::new_v4(),
            source_fingerprint: fingerprint(messages),
            skipped: sanitized.skipped.clone(),
            detected_language,
            pairwise_policy: pair.as_ref().map(|(a, b)| PairwisePolicy {
                participant_a: a.clone(),
                participant_b: b.clone(),
                policy: "two_most_active".to_string(),
            }),
            generated_at: started,
            elapsed_ms: (Utc::now() - started).num_milliseconds(),
        };

        Ok(QuantitativeAnalysis {
            persons,
            timing: TimingStats {
                response_times,
                sessions,
            },
            engagement,
            sentiment,
            style,
            patterns,
            composites,
            badges,
            percentiles,
            diagnostics,
        })
    }

    fn accumulate_persons(
        &self,
        messages: &[UnifiedMessage],
        intermediates: &Intermediates,
        participant_ids: &[String],
    ) -> Vec<PersonSummary> {
        let mut accumulators: HashMap<&str, PersonAccumulator> = participant_ids
            .iter()
            .map(|id| (id.as_str(), PersonAccumulator::default()))
            .collect();
        for (index, message) in messages.iter().enumerate() {
            if let Some(acc) = accumulators.get_mut(message.sender.as_str()) {
                acc.record_message(
                    message.text(),
                    &intermediates.tokens[index],
                    message.timestamp_ms,
                    message.has_media,
                    message.has_link,
                    message.is_unsent,
                );
            }
            for reaction in &message.reactions {
                if let Some(actor) = accumulators.get_mut(reaction.actor.as_str()) {
                    actor.record_reaction_given();
                }
                if let Some(sender) = accumulators.get_mut(message.sender.as_str()) {
                    sender.record_reaction_received();
                }
            }
        }
        let total = messages.len() as u32;
        participant_ids
            .iter()
            .map(|id| {
                accumulators
                    .remove(id.as_str())
                    .unwrap_or_default()
                    .finalize(id, total)
            })
            .collect()
    }

    fn style_metrics(
        &self,
        messages: &[UnifiedMessage],
        intermediates: &Intermediates,
        participant_ids: &[String],
        persons: &[PersonSummary],
    ) -> StyleMetrics {
        let mut tokens_by_person: HashMap<&str, Vec<String>> = participant_ids
            .iter()
            .map(|id| (id.as_str(), Vec::new()))
            .collect();
        let mut texts_by_person: HashMap<&str, Vec<&str>> = participant_ids
            .iter()
            .map(|id| (id.as_str(), Vec::new()))
            .collect();
        for (index, message) in messages.iter().enumerate() {
            let Some(text) = message.text() else { continue };
            if let Some(tokens) = tokens_by_person.get_mut(message.sender.as_str()) {
                tokens.extend(intermediates.tokens[index].iter().cloned());
            }
            if let Some(texts) = texts_by_person.get_mut(message.sender.as_str()) {
                texts.push(text);
            }
        }

        let per_person = participant_ids
            .iter()
            .map(|id| {
                let tokens = &tokens_by_person[id.as_str()];
                let texts = &texts_by_person[id.as_str()];
                PersonStyle {
                    participant_id: id.clone(),
                    mtld: mtld(
                        tokens,
                        self.settings.style.mtld_ttr_threshold,
                        self.settings.style.mtld_min_words,
                    ),
                    pronouns: pronoun_rates(tokens, self.settings.style.pronoun_min_words),
                    time_orientation: time_orientation(
                        tokens,
                        self.settings.style.orientation_min_words,
                    ),
                    integrative_complexity: integrative_complexity(texts),
                }
            })
            .collect();

        let lsm = most_active_pair(persons).and_then(|(a, b)| {
            language_style_matching(
                (a.as_str(), &tokens_by_person[a.as_str()]),
                (b.as_str(), &tokens_by_person[b.as_str()]),
            )
        });

        StyleMetrics { per_person, lsm }
    }

    #[allow(clippy::too_many_arguments)]
    fn pattern_results(
        &self,
        messages: &[UnifiedMessage],
        intermediates: &Intermediates,
        participant_ids: &[String],
        persons: &[PersonSummary],
        sessions: &crate::timing::SessionStats,
        response_times: &[ResponseTimeStats],
        pair: Option<&(String, String)>,
    ) -> PatternResults {
        let bursts = intermediates
            .daily
            .as_ref()
            .map(|daily| detect_bursts(daily, &self.settings.patterns))
            .unwrap_or_default();
        let conflicts = detect_conflicts(messages, &self.settings.patterns);

        let conflict_fingerprints = pair.and_then(|(a, b)| {
            fingerprint_conflicts(
                messages,
                &conflicts,
                &intermediates.response_samples,
                (a.as_str(), b.as_str()),
                &self.settings.patterns,
            )
        });

        let pursuit_withdrawal = pair.map(|(a, b)| {
            detect_pursuit_withdrawal(messages, (a.as_str(), b.as_str()), &self.settings.patterns)
        });

        let reciprocity = pair.and_then(|(a, b)| {
            let summary = |id: &str| persons.iter().find(|p| p.participant_id == id);
            let median = |id: &str| {
                response_times
                    .iter()
                    .find(|r| r.participant_id == id)
                    .and_then(|r| r.median_secs)
            };
            let (sa, sb) = (summary(a)?, summary(b)?);
            let inputs = ReciprocityInputs {
                messages_a: sa.message_count,
                messages_b: sb.message_count,
                initiations_a: sessions.initiations.get(a).copied().unwrap_or(0),
                initiations_b: sessions.initiations.get(b).copied().unwrap_or(0),
                median_response_secs_a: median(a),
                median_response_secs_b: median(b),
                reactions_given_a: sa.reactions_given,
                reactions_given_b: sb.reactions_given,
            };
            reciprocity_index((a.as_str(), b.as_str()), &inputs, &self.settings.patterns)
        });

        let bids = bid_response_stats(messages, &self.settings.patterns);
        let chronotype = chronotype_report(
            messages,
            participant_ids,
            pair.map(|(a, b)| (a.as_str(), b.as_str())),
        );

        PatternResults {
            bursts,
            conflicts,
            conflict_fingerprints,
            pursuit_withdrawal,
            reciprocity,
            bids,
            chronotype,
        }
    }

    fn composite_scores(
        &self,
        persons: &[PersonSummary],
        sentiment: &SentimentReport,
        engagement: &EngagementStats,
        patterns: &PatternResults,
        intermediates: &Intermediates,
        pair: Option<&(String, String)>,
    ) -> CompositeScores {
        let message_balance = pair.and_then(|(a, b)| {
            let count = |id: &str| {
                persons
                    .iter()
                    .find(|p| p.participant_id == id)
                    .map(|p| p.message_count)
            };
            let (ca, cb) = (count(a)?, count(b)?);
            let total = ca + cb;
            if total == 0 {
                None
            } else {
                Some(f64::from(ca) / f64::from(total) * 100.0)
            }
        });

        let mut all_responses: Vec<f64> = intermediates
            .response_samples
            .iter()
            .map(|s| s.response_secs)
            .collect();
        all_responses.sort_by(f64::total_cmp);
        let filtered = stats::iqr_filter(&all_responses, self.settings.timing.iqr_multiplier);

        let volatilities: Vec<f64> = sentiment
            .per_person
            .iter()
            .filter_map(|p| p.volatility)
            .collect();

        let months = (f64::from(engagement.span_days) / 30.0).max(1.0);
        let total_messages = engagement.total_messages;
        let total_emoji: u32 = persons.iter().map(|p| p.emoji_count).sum();

        let inputs = CompositeInputs {
            message_balance,
            reciprocity_overall: patterns.reciprocity.as_ref().map(|r| r.overall),
            median_response_secs: stats::median(&filtered),
            p90_response_secs: stats::percentile(&filtered, 90.0),
            overall_sentiment: sentiment.overall_average,
            mean_volatility: stats::mean(&volatilities),
            sentiment_trend_slope: sentiment.trend_slope_per_month,
            toward_rate: patterns.bids.toward_rate,
            conflicts_per_month: Some(patterns.conflicts.len() as f64 / months),
            cold_silence_count: patterns
                .conflicts
                .iter()
                .filter(|c| c.signals.contains(&ConflictSignal::ColdSilence))
                .count() as u32,
            pursuit_cycles: patterns
                .pursuit_withdrawal
                .as_ref()
                .map_or(0, |p| p.cycle_count),
            messages_per_day: if engagement.span_days == 0 {
                None
            } else {
                Some(f64::from(total_messages) / f64::from(engagement.span_days))
            },
            emoji_per_message: if total_messages == 0 {
                None
            } else {
                Some(f64::from(total_emoji) / f64::from(total_messages))
            },
            burst_count: patterns.bursts.len() as u32,
            span_days: engagement.span_days,
        };

        CompositeScores {
            health: health_score(&inputs),
            damage: damage_score(&inputs),
            threat: threat_meter(&inputs),
            viral: viral_score(&inputs),
        }
    }

    fn badge_awards(
        &self,
        persons: &[PersonSummary],
        response_times: &[ResponseTimeStats],
        sessions: &crate::timing::SessionStats,
        style: &StyleMetrics,
        patterns: &PatternResults,
        engagement: &EngagementStats,
    ) -> Vec<crate::scores::BadgeAward> {
        let total_initiations: u32 = sessions.initiations.values().sum();
        let people: Vec<BadgeInputs> = persons
            .iter()
            .map(|person| {
                let id = person.participant_id.as_str();
                BadgeInputs {
                    participant_id: person.participant_id.clone(),
                    median_response_secs: response_times
                        .iter()
                        .find(|r| r.participant_id == id)
                        .and_then(|r| r.median_secs),
                    avg_words_per_message: person.avg_words_per_message,
                    emoji_per_message: if person.message_count == 0 {
                        None
                    } else {
                        Some(f64::from(person.emoji_count) / f64::from(person.message_count))
                    },
                    initiation_share: if total_initiations == 0 {
                        None
                    } else {
                        sessions
                            .initiations
                            .get(id)
                            .map(|count| f64::from(*count) / f64::from(total_initiations))
                    },
                    mtld: style
                        .per_person
                        .iter()
                        .find(|s| s.participant_id == id)
                        .and_then(|s| s.mtld),
                    peak_hour: patterns
                        .chronotype
                        .per_person
                        .iter()
                        .find(|c| c.participant_id == id)
                        .and_then(|c| c.peak_hour),
                    question_ratio: person.question_ratio,
                }
            })
            .collect();

        let conversation = ConversationBadgeInputs {
            longest_daily_streak: engagement.longest_daily_streak,
            messages_per_day: if engagement.span_days == 0 {
                None
            } else {
                Some(f64::from(engagement.total_messages) / f64::from(engagement.span_days))
            },
        };
        award_badges(&people, &conversation)
    }

    fn percentile_rankings(
        &self,
        persons: &[PersonSummary],
        engagement: &EngagementStats,
        intermediates: &Intermediates,
    ) -> Vec<PercentileRanking> {
        let mut rankings = Vec::new();
        if engagement.span_days > 0 {
            rankings.extend(rank_against_population(
                "messages_per_day",
                f64::from(engagement.total_messages) / f64::from(engagement.span_days),
            ));
        }
        let mut all_responses: Vec<f64> = intermediates
            .response_samples
            .iter()
            .map(|s| s.response_secs)
            .collect();
        all_responses.sort_by(f64::total_cmp);
        if let Some(median) = stats::median(&all_responses) {
            rankings.extend(rank_against_population("median_response_secs", median));
        }
        let total_words: u64 = persons.iter().map(|p| p.word_count).sum();
        let text_messages: u32 = persons.iter().map(|p| p.message_count).sum();
        if text_messages > 0 {
            rankings.extend(rank_against_population(
                "avg_words_per_message",
                total_words as f64 / f64::from(text_messages),
            ));
        }
        let total_emoji: u32 = persons.iter().map(|p| p.emoji_count).sum();
        if engagement.total_messages > 0 {
            rankings.extend(rank_against_population(
                "emoji_per_message",
                f64::from(total_emoji) / f64::from(engagement.total_messages),
            ));
        }
        let combined_vocabulary: HashSet<&str> = intermediates
            .tokens
            .iter()
            .flatten()
            .map(|t| t.as_str())
            .collect();
        rankings.extend(rank_against_population(
            "vocabulary_size",
            combined_vocabulary.len() as f64,
        ));
        if engagement.longest_daily_streak > 0 {
            rankings.extend(rank_against_population(
                "daily_streak_days",
                f64::from(engagement.longest_daily_streak),
            ));
        }
        rankings
    }
}

/// Pairwise metrics degrade to the two most active participants; ties break
/// by participant order so the result is deterministic.
fn most_active_pair(persons: &[PersonSummary]) -> Option<(String, String)> {
    if persons.len() < 2 {
        return None;
    }
    let mut ranked: Vec<(usize, &PersonSummary)> = persons.iter().enumerate().collect();
    ranked.sort_by(|(ia, a), (ib, b)| {
        b.message_count
            .cmp(&a.message_count)
            .then_with(|| ia.cmp(ib))
    });
    Some((
        ranked[0].1.participant_id.clone(),
        ranked[1].1.participant_id.clone(),
    ))
}

fn fingerprint(messages: &[UnifiedMessage]) -> String {
    let mut hasher = Sha256::new();
    for message in messages {
        hasher.update(message.sender.as_bytes());
        hasher.update(message.timestamp_ms.to_le_bytes());
        if let Some(content) = &message.content {
            hasher.update(content.as_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}
