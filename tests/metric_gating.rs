mod common;

use chatmetrics::analyze;
use common::{ConversationBuilder, HOUR_MS, MINUTE_MS};

#[test]
fn tiny_conversation_gates_every_thresholded_metric() {
    let analysis = analyze(
        &ConversationBuilder::new(&["a", "b"])
            .say("a", MINUTE_MS, "hey you around")
            .say("b", 2 * MINUTE_MS, "yes what's up")
            .build(),
    )
    .unwrap();

    let a_style = &analysis.style.per_person[0];
    assert!(a_style.mtld.is_none());
    assert!(a_style.pronouns.is_none());
    assert!(a_style.time_orientation.is_none());

    assert!(analysis.patterns.reciprocity.is_none());
    assert!(analysis.patterns.bids.toward_rate.is_none());
    assert!(analysis.patterns.conflict_fingerprints.is_none());
    for person in &analysis.sentiment.per_person {
        assert!(person.volatility.is_none());
    }
    for stats in &analysis.timing.response_times {
        assert!(stats.trend_direction.is_none());
    }
}

#[test]
fn mtld_defined_once_the_word_minimum_is_met() {
    // One speaker with a long, varied vocabulary; the other stays terse.
    let mut builder = ConversationBuilder::new(&["a", "b"]);
    let chunks = [
        "we wandered through the old market tasting olives and bread",
        "later the harbor lights turned everything amber and quiet",
        "a stray cat followed us past the closed bookshop door",
        "the ferry horn echoed while gulls argued over scraps",
        "we climbed narrow stairs to watch the storm roll in",
        "your umbrella lost a fight with the wind near the pier",
        "someone played an accordion badly and it was perfect",
        "we promised to come back before the season turns cold",
        "the bakery on the corner still owes us two croissants",
        "my shoes are soaked but honestly it was worth every step",
        "tomorrow we should map the rest of the coastal path",
        "bring the camera because the cliffs looked unreal at dusk",
    ];
    for (i, chunk) in chunks.iter().enumerate() {
        builder = builder
            .say("a", (i as i64) * 5 * MINUTE_MS, chunk)
            .say("b", (i as i64) * 5 * MINUTE_MS + MINUTE_MS, "ok");
    }
    let analysis = analyze(&builder.build()).unwrap();

    let a_style = &analysis.style.per_person[0];
    let b_style = &analysis.style.per_person[1];
    assert!(a_style.mtld.is_some(), "a wrote >50 words");
    assert!(b_style.mtld.is_none(), "b wrote far fewer than 50 words");
}

#[test]
fn no_reactions_means_null_reaction_ratio_not_zero_division() {
    let mut builder = ConversationBuilder::new(&["a", "b"]);
    for i in 0..40 {
        let sender = if i % 2 == 0 { "a" } else { "b" };
        builder = builder.say(sender, i * MINUTE_MS, "steady chatting along here");
    }
    let analysis = analyze(&builder.build()).unwrap();

    let reciprocity = analysis.patterns.reciprocity.unwrap();
    assert!(reciprocity.reaction_balance.is_none());
    assert!(reciprocity.message_balance.is_some());
    for person in &analysis.persons {
        assert_eq!(person.reactions_received, 0);
        assert!(person.reactions_received_per_message.is_some());
    }
}

#[test]
fn solo_conversation_has_no_pairwise_block() {
    let mut builder = ConversationBuilder::new(&["a"]);
    for i in 0..20 {
        builder = builder.say("a", i * HOUR_MS, "notes to self about the week ahead");
    }
    let analysis = analyze(&builder.build()).unwrap();

    assert!(analysis.diagnostics.pairwise_policy.is_none());
    assert!(analysis.style.lsm.is_none());
    assert!(analysis.patterns.reciprocity.is_none());
    assert!(analysis.patterns.pursuit_withdrawal.is_none());
    assert!(analysis.patterns.chronotype.compatibility.is_none());
}

#[test]
fn unmatched_text_leaves_sentiment_unscored() {
    let mut builder = ConversationBuilder::new(&["a", "b"]);
    for i in 0..10 {
        let sender = if i % 2 == 0 { "a" } else { "b" };
        builder = builder.say(sender, i * MINUTE_MS, "the ledger column forty seven");
    }
    let analysis = analyze(&builder.build()).unwrap();

    assert_eq!(analysis.sentiment.scored_message_count, 0);
    assert!(analysis.sentiment.overall_average.is_none());
    for person in &analysis.sentiment.per_person {
        assert!(person.average.is_none());
    }
}
