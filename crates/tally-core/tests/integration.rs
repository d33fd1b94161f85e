//! Integration tests exercising the full progression pipeline:
//! eligibility → rollover → clamp → level → reward, over event sequences.

use proptest::prelude::*;
use tally_core::{
    ActivityEvent, ChatContext, Outcome, QuotaConfig, Role, UserProgress, level_for, process_event,
};

const T0: u64 = 1704067200; // 2024-01-01T00:00:00Z

fn fresh_user() -> UserProgress {
    UserProgress::new(1, "test", Role::User)
}

fn event_at(text: &str, at: u64) -> ActivityEvent {
    ActivityEvent {
        user_id: 1,
        username: Some("test".to_string()),
        text: Some(text.to_string()),
        caption: None,
        context: ChatContext::Group,
        is_bot: false,
        at,
    }
}

/// Run a sequence of events through the coordinator, each at its own
/// timestamp, accumulating the snapshot the way a persisting caller would.
fn drive(user: UserProgress, events: &[ActivityEvent]) -> UserProgress {
    events.iter().fold(user, |snapshot, ev| {
        process_event(&snapshot, ev, &QuotaConfig::default(), ev.at).user
    })
}

/// A burst of messages inside one minute never earns more than the
/// minute limit, no matter how many arrive or how long they are.
#[test]
fn minute_quota_bounds_a_burst() {
    let events: Vec<ActivityEvent> = (0..20)
        .map(|i| {
            let text = if i % 2 == 0 {
                "a short message".to_string()
            } else {
                "x".repeat(80) // long: would request 2 XP
            };
            event_at(&text, T0 + i) // all within 2024-01-01T00:00
        })
        .collect();

    let user = drive(fresh_user(), &events);
    assert_eq!(user.minute_xp, 5);
    assert_eq!(user.total_xp, 5);
    assert_eq!(user.message_count, 20, "every event counts as a message");
}

/// Spreading messages across minutes re-opens the minute window each time
/// while the day window keeps accumulating.
#[test]
fn minute_rollover_reopens_the_window() {
    let mut events = Vec::new();
    for minute in 0..3 {
        for i in 0..8 {
            events.push(event_at("hello world", T0 + minute * 60 + i));
        }
    }

    let user = drive(fresh_user(), &events);
    assert_eq!(user.minute_xp, 5, "last minute clamped at the limit");
    assert_eq!(user.day_xp, 15, "three full minute windows");
    assert_eq!(user.total_xp, 15);
}

/// Spec rollover property: a full minute window plus an event in the next
/// minute yields minute_xp == grant, not zero and not blocked.
#[test]
fn rollover_grants_into_fresh_window() {
    let warmup: Vec<ActivityEvent> = (0..5).map(|i| event_at("hello world", T0 + i)).collect();
    let user = drive(fresh_user(), &warmup);
    assert_eq!(user.minute_xp, 5);

    let result = process_event(
        &user,
        &event_at("hello world", T0 + 60),
        &QuotaConfig::default(),
        T0 + 60,
    );
    assert_eq!(result.outcome, Outcome::Granted { gain: 1 });
    assert_eq!(result.user.minute_xp, 1);
}

/// An event that crosses minute and day boundaries at once resets both
/// windows before granting.
#[test]
fn midnight_crossing_resets_both_windows() {
    let last_of_day = T0 + 86399;
    let warmup: Vec<ActivityEvent> = (0..5)
        .map(|_| event_at("hello world", last_of_day))
        .collect();
    let user = drive(fresh_user(), &warmup);
    assert_eq!(user.minute_xp, 5);
    assert_eq!(user.day_key, "2024-01-01");

    let result = process_event(
        &user,
        &event_at("hello world", last_of_day + 1),
        &QuotaConfig::default(),
        last_of_day + 1,
    );
    assert_eq!(result.outcome, Outcome::Granted { gain: 1 });
    assert_eq!(result.user.day_key, "2024-01-02");
    assert_eq!(result.user.day_xp, 1);
    assert_eq!(result.user.minute_xp, 1);
}

/// Grinding to level 2 (20 XP at 5 XP/minute) pays exactly one 50-coin
/// level reward along the way.
#[test]
fn leveling_trajectory_pays_once() {
    let mut events = Vec::new();
    for minute in 0..4 {
        for i in 0..5 {
            events.push(event_at("hello world", T0 + minute * 60 + i));
        }
    }

    let mut user = fresh_user();
    let mut level_ups = 0;
    for ev in &events {
        let result = process_event(&user, ev, &QuotaConfig::default(), ev.at);
        if let Outcome::LeveledUp { new_level, .. } = &result.outcome {
            level_ups += 1;
            assert_eq!(*new_level, 2);
        }
        user = result.user;
    }

    assert_eq!(user.total_xp, 20);
    assert_eq!(user.level, 2);
    assert_eq!(user.coins, 50);
    assert_eq!(level_ups, 1);
}

/// A ban in the middle of a stream freezes XP but not bookkeeping.
#[test]
fn ban_freezes_xp_mid_stream() {
    let warmup: Vec<ActivityEvent> = (0..3).map(|i| event_at("hello world", T0 + i)).collect();
    let mut user = drive(fresh_user(), &warmup);
    assert_eq!(user.total_xp, 3);

    user.banned = true;
    let result = process_event(
        &user,
        &event_at("hello world", T0 + 10),
        &QuotaConfig::default(),
        T0 + 10,
    );
    assert!(matches!(result.outcome, Outcome::Rejected { .. }));
    assert_eq!(result.user.total_xp, 3);
    assert_eq!(result.user.message_count, 4);
    assert_eq!(result.user.last_message_at, Some(T0 + 10));
}

/// Ineligible payloads are skipped no matter where they land in a stream.
#[test]
fn ineligible_events_never_consume_quota() {
    let events = vec![
        event_at("hi", T0),         // too short
        event_at("!!!!!", T0 + 1),  // no substance
        event_at("hello world", T0 + 2),
    ];
    let user = drive(fresh_user(), &events);
    assert_eq!(user.total_xp, 1);
    assert_eq!(user.minute_xp, 1);
    assert_eq!(user.message_count, 3);
}

proptest! {
    /// Quota bound: any event burst within a single minute grants at most
    /// the minute limit, and the cached level always matches the curve.
    #[test]
    fn prop_minute_quota_never_exceeded(
        texts in prop::collection::vec("[a-z ]{0,90}", 1..40),
        offsets in prop::collection::vec(0u64..60, 1..40),
    ) {
        let mut user = fresh_user();
        for (text, offset) in texts.iter().zip(offsets.iter()) {
            let ev = event_at(text, T0 + offset);
            user = process_event(&user, &ev, &QuotaConfig::default(), ev.at).user;
            prop_assert!(user.minute_xp <= 5);
            prop_assert!(user.day_xp <= 500);
            prop_assert_eq!(user.level, level_for(user.total_xp));
        }
        prop_assert!(user.total_xp <= 5, "one minute window caps lifetime gain");
    }

    /// Lifetime XP is non-decreasing across arbitrary event streams, and
    /// the windowed aggregates never outrun it.
    #[test]
    fn prop_total_xp_monotone(
        steps in prop::collection::vec((0u64..200_000, "[a-z !?]{0,80}"), 1..60),
    ) {
        let mut user = fresh_user();
        let mut at = T0;
        let mut last_total = 0;
        for (advance, text) in &steps {
            at += advance;
            let ev = event_at(text, at);
            user = process_event(&user, &ev, &QuotaConfig::default(), at).user;
            prop_assert!(user.total_xp >= last_total);
            prop_assert!(user.week_xp <= user.total_xp);
            prop_assert!(user.month_xp <= user.total_xp);
            prop_assert!(user.day_xp <= 500);
            prop_assert!(user.minute_xp <= 5);
            last_total = user.total_xp;
        }
    }
}
