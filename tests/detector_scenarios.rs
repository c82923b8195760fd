mod common;

use chatmetrics::analyze;
use common::{ConversationBuilder, DAY_MS, HOUR_MS, MINUTE_MS};

/// Baseline chatter of `per_day` messages for `days` days, alternating
/// senders, starting at 09:00 each day.
fn baseline_days(mut builder: ConversationBuilder, days: i64, per_day: i64) -> ConversationBuilder {
    for day in 0..days {
        for slot in 0..per_day {
            let sender = if slot % 2 == 0 { "a" } else { "b" };
            let ts = day * DAY_MS + 9 * HOUR_MS + slot * 20 * MINUTE_MS;
            builder = builder.say(sender, ts, "the usual catch up about our day");
        }
    }
    builder
}

#[test]
fn injected_spike_day_produces_exactly_one_burst() {
    let mut builder = baseline_days(ConversationBuilder::new(&["a", "b"]), 30, 20);
    // Day 20 explodes to 200 messages.
    for slot in 0..180 {
        let sender = if slot % 2 == 0 { "a" } else { "b" };
        let ts = 20 * DAY_MS + 9 * HOUR_MS + slot * MINUTE_MS;
        builder = builder.say(sender, ts, "so much to talk about today");
    }
    let analysis = analyze(&builder.build()).unwrap();

    let bursts = &analysis.patterns.bursts;
    assert_eq!(bursts.len(), 1, "expected exactly one burst");
    assert_eq!(bursts[0].start_ms, 20 * DAY_MS);
    assert_eq!(bursts[0].end_ms, 21 * DAY_MS);
    assert_eq!(bursts[0].total_messages, 200);
}

#[test]
fn unanswered_run_then_silence_registers_one_pursuit_cycle() {
    let mut builder = ConversationBuilder::new(&["a", "b"])
        .say("a", 0, "night!")
        .say("b", HOUR_MS, "good night");
    // Six unanswered messages from a, one per minute.
    for i in 0..6 {
        builder = builder.say("a", 2 * HOUR_MS + i * MINUTE_MS, "are we still on for tomorrow");
    }
    // b withdraws for five hours, then replies.
    builder = builder.say("b", 2 * HOUR_MS + 5 * MINUTE_MS + 5 * HOUR_MS, "sorry, fell asleep");
    let analysis = analyze(&builder.build()).unwrap();

    let pursuit = analysis.patterns.pursuit_withdrawal.unwrap();
    assert_eq!(pursuit.cycle_count, 1);
    assert_eq!(pursuit.cycles[0].pursuer, "a");
    assert_eq!(pursuit.cycles[0].withdrawer, "b");
    assert_eq!(pursuit.cycles[0].messages_in_run, 6);
}

#[test]
fn symmetric_conversation_scores_even_reciprocity_and_high_lsm() {
    let line = "i think we should go to the park because it is really nice there";
    let mut builder = ConversationBuilder::new(&["a", "b"]);
    // Session one: a initiates, strict alternation at one-minute intervals.
    for i in 0..16 {
        let sender = if i % 2 == 0 { "a" } else { "b" };
        builder = builder.say(sender, i * MINUTE_MS, line);
    }
    // Session two after an 8h silence: b initiates, mirror alternation.
    let base = 16 * MINUTE_MS + 8 * HOUR_MS;
    for i in 0..16 {
        let sender = if i % 2 == 0 { "b" } else { "a" };
        builder = builder.say(sender, base + i * MINUTE_MS, line);
    }
    // Identical reactions both ways.
    builder = builder
        .say_with_reaction("a", base + 17 * MINUTE_MS, line, "b")
        .say_with_reaction("b", base + 18 * MINUTE_MS, line, "a");
    let analysis = analyze(&builder.build()).unwrap();

    let reciprocity = analysis.patterns.reciprocity.unwrap();
    assert!(
        (reciprocity.overall - 50.0).abs() < 1.0,
        "overall={}",
        reciprocity.overall
    );
    let lsm = analysis.style.lsm.unwrap();
    assert!(lsm.overall >= 0.95, "lsm={}", lsm.overall);
    assert!(lsm.asymmetry.abs() < 0.05);
}

#[test]
fn opposed_chronotypes_are_incompatible() {
    let mut builder = ConversationBuilder::new(&["owl", "lark"]);
    for day in 0..14 {
        for hour in [20, 21, 22, 23] {
            builder = builder.say("owl", day * DAY_MS + hour * HOUR_MS, "still up");
        }
        for hour in [6, 7, 8, 9] {
            builder = builder.say("lark", day * DAY_MS + hour * HOUR_MS, "morning here");
        }
    }
    let analysis = analyze(&builder.build()).unwrap();

    let compatibility = analysis.patterns.chronotype.compatibility.unwrap();
    assert!(compatibility.circular_distance_hours > 9.0);
    assert!(compatibility.score < 5.0);
}

#[test]
fn identical_clocks_are_fully_compatible() {
    let mut builder = ConversationBuilder::new(&["a", "b"]);
    for day in 0..10 {
        for hour in [12, 13, 14] {
            builder = builder
                .say("a", day * DAY_MS + hour * HOUR_MS, "lunch chat")
                .say("b", day * DAY_MS + hour * HOUR_MS + MINUTE_MS, "lunch chat");
        }
    }
    let analysis = analyze(&builder.build()).unwrap();
    let compatibility = analysis.patterns.chronotype.compatibility.unwrap();
    assert!(compatibility.score > 99.0);
}

#[test]
fn heated_exchange_is_detected_as_conflict() {
    let mut builder = baseline_days(ConversationBuilder::new(&["a", "b"]), 5, 10);
    let ts = 5 * DAY_MS + 9 * HOUR_MS;
    builder = builder
        .say("a", ts, "you never tell me anything anymore")
        .say("b", ts + MINUTE_MS, "are you serious right now")
        .say("a", ts + 2 * MINUTE_MS, "i'm done with this");
    let analysis = analyze(&builder.build()).unwrap();

    assert_eq!(analysis.patterns.conflicts.len(), 1);
    let event = &analysis.patterns.conflicts[0];
    assert!(event.trigger_preview.is_some());
    // Only one conflict: fingerprints stay gated.
    assert!(analysis.patterns.conflict_fingerprints.is_none());
}
